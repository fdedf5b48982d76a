//! HMAC-SHA256 request signing.
//!
//! Every request to the Yellow API, and every IPN callback from it, carries an
//! `API-Sign` header computed as:
//!
//! ```text
//! lowercase_hex(HMAC-SHA256(key = secret, data = nonce ‖ url ‖ body))
//! ```
//!
//! Both the secret and the message are encoded as UTF-8. For ASCII messages this
//! is byte-identical to a single-byte encoding.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded signature (32-byte digest).
pub const SIGNATURE_HEX_LEN: usize = 64;

/// Errors raised by the signing primitive.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// The HMAC implementation refused the key.
    #[error("HMAC-SHA256 rejected the signing key: {0}")]
    KeyRejected(String),
}

/// A lowercase hex HMAC-SHA256 signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    /// Returns the hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the signature, returning the hex string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Compares against a caller-supplied signature in constant time.
    ///
    /// The comparison is exact: an uppercase rendering of the same digest
    /// does not match.
    pub fn matches(&self, candidate: &str) -> bool {
        constant_time_compare(self.0.as_bytes(), candidate.as_bytes())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Signs `message` with `secret`.
///
/// # Errors
///
/// Returns `SigningError::KeyRejected` if the HMAC primitive refuses the key.
/// HMAC accepts keys of any length, so this only surfaces a broken primitive.
pub fn sign_message(message: &str, secret: &str) -> Result<Signature, SigningError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| SigningError::KeyRejected(e.to_string()))?;
    mac.update(message.as_bytes());
    Ok(Signature(hex::encode(mac.finalize().into_bytes())))
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
