//! Signing key derivation.

use sauthc1_core::hash::hmac_sha256;

use crate::constants::{AUTHENTICATION_SCHEME, ID_TERMINATOR};

/// Derive the per request signing key.
///
/// ```text
/// kSecret  = "SAuthc1" + secret
/// kDate    = HMAC-SHA256(kSecret, date_stamp)
/// kNonce   = HMAC-SHA256(kDate, nonce)
/// kSigning = HMAC-SHA256(kNonce, "sauthc1_request")
/// ```
///
/// The key is bound to one date and one nonce. It must never be cached.
pub fn derive_signing_key(secret: &str, date_stamp: &str, nonce: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("{AUTHENTICATION_SCHEME}{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), date_stamp.as_bytes());
    // Sign nonce
    let sign_nonce = hmac_sha256(sign_date.as_slice(), nonce.as_bytes());
    // Sign request
    hmac_sha256(sign_nonce.as_slice(), ID_TERMINATOR.as_bytes())
}
