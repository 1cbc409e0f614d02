use serde::{Deserialize, Serialize};

/// Immutable gateway credentials and callback endpoints
///
/// Injected at construction; the private key is the shared secret of the
/// digest scheme and never appears inside a payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Merchant public key, embedded in every outbound request
    pub public_key: String,
    /// Shared secret used to sign and verify payloads
    pub private_key: String,
    /// Where the gateway redirects the payer after checkout
    pub result_url: String,
    /// Where the gateway posts the signed confirmation callback
    pub server_url: String,
    /// ISO currency code sent with checkout requests
    pub currency: String,
    /// Human-readable purpose line attached to donations
    pub description: String,
}
