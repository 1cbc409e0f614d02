//! Shared-secret digest scheme
//!
//! The gateway signs the base64 payload with
//! `base64(SHA1(secret || payload || secret))` and the same construction is
//! recomputed here for outbound requests and inbound callback checks.

use base64::prelude::*;
use sha1::{Digest, Sha1};

/// Computes the payload signature with the shared secret.
#[must_use]
pub fn sign_payload(private_key: &str, payload: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(private_key.as_bytes());
    hasher.update(payload.as_bytes());
    hasher.update(private_key.as_bytes());
    BASE64_STANDARD.encode(hasher.finalize())
}

/// Byte-for-byte check of a supplied signature against the recomputed one.
#[must_use]
pub fn verify_signature(private_key: &str, payload: &str, signature: &str) -> bool {
    sign_payload(private_key, payload) == signature
}
