//! Gateway payload codec
//!
//! Payloads travel as base64-wrapped JSON. Inbound callbacks decode to
//! [`CallbackPayload`]; outbound checkout and unsubscribe requests are
//! built here and signed by [`crate::signature`]. Gateway amounts are
//! decimal currency units; everything past this module is integer minor
//! units.

use crate::config::GatewayConfig;
use crate::errors::{GatewayError, GatewayResult};
use crate::signature::sign_payload;
use base64::prelude::*;
use bonus_engine::{AccountId, PaymentStatus};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Gateway API protocol version
const PROTOCOL_VERSION: &str = "3";

/// Confirmed-payment callback, already verified upstream of the engine
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CallbackPayload {
    /// Order id generated at checkout, unique per gateway transaction
    pub order_id: String,
    pub status: PaymentStatus,
    /// The paying customer's account id
    pub customer: AccountId,
    /// Amount in decimal currency units as the gateway reports it
    pub amount: f64,
}

/// Decodes a base64 callback payload into its JSON form.
///
/// # Errors
/// [`GatewayError::MalformedPayload`] when the base64 wrapping or the JSON
/// inside it is invalid.
pub fn decode_callback(data: &str) -> GatewayResult<CallbackPayload> {
    let raw = BASE64_STANDARD.decode(data)?;
    let payload = serde_json::from_slice(&raw)?;
    Ok(payload)
}

/// Converts a gateway decimal amount to integer minor units (2 decimals),
/// rounding to the nearest minor unit.
///
/// # Errors
/// [`GatewayError::InvalidAmount`] for non-finite, negative, or
/// out-of-range values.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_minor_units(amount: f64) -> GatewayResult<u64> {
    let scaled = (amount * 100.0).round();
    if !scaled.is_finite() || scaled < 0.0 || scaled >= 9e15 {
        return Err(GatewayError::InvalidAmount(amount));
    }
    Ok(scaled as u64)
}

/// Converts minor units back to the gateway's decimal representation.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn to_major_units(minor: u64) -> f64 {
    (minor as f64) / 100.0
}

/// Signed request envelope handed to the client for the gateway redirect
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignedEnvelope {
    /// Base64-wrapped JSON request
    pub data: String,
    /// `base64(SHA1(secret || data || secret))`
    pub signature: String,
}

/// Checkout parameters collected from the donating customer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutParams {
    /// Caller-generated order id, unique per transaction
    pub order_id: String,
    /// The paying customer's account id
    pub customer: AccountId,
    /// Donation amount in minor units
    pub amount: u64,
    /// Free-form donor comment forwarded to the gateway
    pub comment: Option<String>,
    /// Monthly recurring donation instead of a one-off
    pub subscribe: bool,
}

#[derive(Debug, Serialize)]
struct CheckoutRequest<'a> {
    public_key: &'a str,
    version: &'a str,
    action: &'a str,
    amount: f64,
    currency: &'a str,
    description: &'a str,
    order_id: &'a str,
    result_url: &'a str,
    server_url: &'a str,
    customer: &'a AccountId,
    #[serde(skip_serializing_if = "Option::is_none")]
    info: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subscribe: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subscribe_date_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subscribe_periodicity: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct UnsubscribeRequest<'a> {
    public_key: &'a str,
    version: &'a str,
    action: &'a str,
    order_id: &'a str,
}

/// Builds the signed checkout envelope for a one-off or monthly donation.
///
/// # Errors
/// [`GatewayError::MalformedPayload`] only on JSON encoding failure, which
/// would indicate a bug in the request shape.
pub fn build_checkout(
    config: &GatewayConfig,
    params: &CheckoutParams,
) -> GatewayResult<SignedEnvelope> {
    let subscribe_start = params
        .subscribe
        .then(|| Utc::now().format("%Y-%m-%d %H:%M:%S").to_string());

    let request = CheckoutRequest {
        public_key: &config.public_key,
        version: PROTOCOL_VERSION,
        action: if params.subscribe { "subscribe" } else { "pay" },
        amount: to_major_units(params.amount),
        currency: &config.currency,
        description: &config.description,
        order_id: &params.order_id,
        result_url: &config.result_url,
        server_url: &config.server_url,
        customer: &params.customer,
        info: params.comment.as_deref(),
        subscribe: params.subscribe.then_some(1),
        subscribe_date_start: subscribe_start,
        subscribe_periodicity: params.subscribe.then_some("month"),
    };

    seal(config, &request)
}

/// Builds the signed envelope cancelling a recurring donation.
///
/// # Errors
/// [`GatewayError::MalformedPayload`] only on JSON encoding failure.
pub fn build_unsubscribe(config: &GatewayConfig, order_id: &str) -> GatewayResult<SignedEnvelope> {
    let request = UnsubscribeRequest {
        public_key: &config.public_key,
        version: PROTOCOL_VERSION,
        action: "unsubscribe",
        order_id,
    };
    seal(config, &request)
}

fn seal<T: Serialize>(config: &GatewayConfig, request: &T) -> GatewayResult<SignedEnvelope> {
    let json = serde_json::to_string(request)?;
    let data = BASE64_STANDARD.encode(json);
    let signature = sign_payload(&config.private_key, &data);
    Ok(SignedEnvelope { data, signature })
}
