//! Confirmation callback ingestion
//!
//! The only caller of the distribution engine. A callback is accepted at
//! most once per `(order_id, status)` pair, recorded as a payment, and, for
//! a successful payment by a non-root customer, distributed exactly once.

use crate::errors::{GatewayError, GatewayResult};
use crate::payload::{
    build_unsubscribe, decode_callback, to_minor_units, CallbackPayload, SignedEnvelope,
};
use crate::signature::verify_signature;
use crate::GatewayConfig;
use bonus_engine::store::{AccountStore, PaymentStore, SupportOracle};
use bonus_engine::{
    AccountId, DistributionEngine, DistributionReceipt, Payment, PaymentId, PaymentStatus,
    StoreError,
};
use std::sync::Arc;
use tracing::{info, warn};

/// What ingestion did with a verified callback
#[derive(Clone, Debug)]
pub enum IngestOutcome {
    /// Payment recorded; no distribution applies to this status or payer
    Recorded { payment: Payment },
    /// Payment recorded and its bonus pool fully distributed
    Distributed {
        payment: Payment,
        receipt: DistributionReceipt,
    },
}

/// Payment ingestion boundary
///
/// Owns the gateway credentials and shares the stores with the engine it
/// dispatches into.
#[derive(Debug)]
pub struct PaymentProcessor<A, P, O> {
    config: GatewayConfig,
    accounts: Arc<A>,
    payments: Arc<P>,
    engine: DistributionEngine<A, P, O>,
}

impl<A, P, O> PaymentProcessor<A, P, O>
where
    A: AccountStore,
    P: PaymentStore,
    O: SupportOracle,
{
    #[must_use]
    pub const fn new(
        config: GatewayConfig,
        accounts: Arc<A>,
        payments: Arc<P>,
        engine: DistributionEngine<A, P, O>,
    ) -> Self {
        Self {
            config,
            accounts,
            payments,
            engine,
        }
    }

    /// The processor's gateway configuration.
    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Handles one gateway confirmation callback.
    ///
    /// Verifies the digest, decodes the payload, rejects duplicate
    /// deliveries, records the payment, and dispatches successful payments
    /// into the distribution engine. A distribution failure propagates to
    /// the caller while the payment record stays behind for
    /// reconciliation.
    ///
    /// # Errors
    /// Any [`GatewayError`]; see the variants for the rejection reasons.
    pub fn process_callback(&self, data: &str, signature: &str) -> GatewayResult<IngestOutcome> {
        if !verify_signature(&self.config.private_key, data, signature) {
            warn!("callback with bad signature rejected");
            return Err(GatewayError::InvalidSignature);
        }

        let payload = decode_callback(data)?;
        let amount = to_minor_units(payload.amount)?;

        // Duplicate-delivery guard: one payment per (order_id, status).
        if self
            .payments
            .find_by_order(&payload.order_id, &payload.status)?
            .is_some()
        {
            return Err(GatewayError::DuplicatePayment {
                order_id: payload.order_id,
            });
        }

        let payment = self.record_payment(&payload, amount)?;
        info!(
            order_id = %payment.order_id,
            customer = %payment.customer_id,
            amount,
            status = ?payment.status,
            "payment recorded"
        );

        if payment.status != PaymentStatus::Success {
            return Ok(IngestOutcome::Recorded { payment });
        }
        if payment.customer_id == self.engine.config().root_account {
            // The root's own donations have no chain above them.
            return Ok(IngestOutcome::Recorded { payment });
        }

        let customer = self
            .accounts
            .get(&payment.customer_id)
            .map_err(|err| match err {
                StoreError::AccountNotFound(id) => GatewayError::UnknownCustomer(id),
                other => GatewayError::Store(other),
            })?;

        // A customer without a recorded inviter routes the whole pool to
        // the root account.
        let start = customer
            .inviter_id
            .clone()
            .unwrap_or_else(|| self.engine.config().root_account.clone());

        let receipt = self
            .engine
            .distribute(&start, &customer.email, amount, &payment.id)?;

        Ok(IngestOutcome::Distributed { payment, receipt })
    }

    /// Builds the signed unsubscribe envelope for a recurring donation,
    /// but only after checking the subscription against the store.
    ///
    /// The gateway would accept an unsubscribe for any order id it knows;
    /// the store-side check keeps customers from cancelling orders that
    /// were never subscriptions, or that belong to someone else.
    ///
    /// # Errors
    /// [`GatewayError::SubscriptionNotFound`] when no `(order_id,
    /// subscribed)` payment is recorded; [`GatewayError::ForeignSubscription`]
    /// when the recorded subscription names a different customer.
    pub fn cancel_subscription(
        &self,
        order_id: &str,
        customer: &AccountId,
    ) -> GatewayResult<SignedEnvelope> {
        let subscription = self
            .payments
            .find_by_order(order_id, &PaymentStatus::Subscribed)?
            .ok_or_else(|| GatewayError::SubscriptionNotFound {
                order_id: order_id.to_owned(),
            })?;

        if subscription.customer_id != *customer {
            warn!(
                order_id,
                requester = %customer,
                owner = %subscription.customer_id,
                "unsubscribe rejected, subscription belongs to another customer"
            );
            return Err(GatewayError::ForeignSubscription {
                order_id: order_id.to_owned(),
            });
        }

        info!(order_id, customer = %customer, "subscription cancellation issued");
        build_unsubscribe(&self.config, order_id)
    }

    fn record_payment(&self, payload: &CallbackPayload, amount: u64) -> GatewayResult<Payment> {
        // Deterministic record id: one payment may exist per order+status.
        let payment_id = PaymentId::new(format!(
            "{}:{}",
            payload.order_id,
            status_tag(&payload.status)
        ));
        let payment = Payment::new(
            payment_id,
            payload.order_id.clone(),
            payload.status.clone(),
            payload.customer.clone(),
            amount,
        );
        match self.payments.create(payment) {
            Ok(created) => Ok(created),
            Err(StoreError::DuplicatePayment { order_id }) => {
                Err(GatewayError::DuplicatePayment { order_id })
            }
            Err(other) => Err(other.into()),
        }
    }
}

const fn status_tag(status: &PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Success => "success",
        PaymentStatus::Subscribed => "subscribed",
        PaymentStatus::Other => "other",
    }
}
