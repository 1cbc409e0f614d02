//! Payment ingestion boundary for the referral bonus engine
//!
//! Thin plumbing between the payment gateway and
//! [`bonus_engine::DistributionEngine`]: the shared-secret digest scheme,
//! the base64/JSON payload codec, checkout and unsubscribe envelope
//! construction, duplicate-delivery rejection, and exactly-one dispatch of
//! each successful payment into distribution.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod errors;
pub mod ingest;
pub mod payload;
pub mod signature;

pub use config::GatewayConfig;
pub use errors::{GatewayError, GatewayResult};
pub use ingest::{IngestOutcome, PaymentProcessor};
pub use payload::{
    build_checkout, build_unsubscribe, decode_callback, CallbackPayload, CheckoutParams,
    SignedEnvelope,
};
pub use signature::{sign_payload, verify_signature};
