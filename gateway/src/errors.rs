use bonus_engine::{DistributionError, StoreError};
use thiserror::Error;

/// Result type for gateway operations
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Failures of the payment ingestion boundary
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The supplied signature does not match the recomputed digest
    #[error("gateway signature mismatch, callback rejected")]
    InvalidSignature,

    /// The payload is not valid base64-wrapped JSON of the expected shape
    #[error("malformed gateway payload: {0}")]
    MalformedPayload(String),

    /// A payment with this order id and status was already ingested
    #[error("duplicate delivery for order {order_id}")]
    DuplicatePayment { order_id: String },

    /// No subscribed payment is recorded under this order id
    #[error("no subscribed payment recorded for order {order_id}")]
    SubscriptionNotFound { order_id: String },

    /// The subscription under this order id belongs to another customer
    #[error("subscription for order {order_id} belongs to another customer")]
    ForeignSubscription { order_id: String },

    /// The callback names a customer that was never registered
    #[error("unknown customer account: {0}")]
    UnknownCustomer(bonus_engine::AccountId),

    /// The callback amount is not representable in minor units
    #[error("unrepresentable payment amount: {0}")]
    InvalidAmount(f64),

    /// Bonus distribution failed; the payment record stays for
    /// reconciliation
    #[error(transparent)]
    Distribution(#[from] DistributionError),

    /// Store failure outside distribution
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedPayload(err.to_string())
    }
}

impl From<base64::DecodeError> for GatewayError {
    fn from(err: base64::DecodeError) -> Self {
        Self::MalformedPayload(err.to_string())
    }
}
