//! Request envelope: the (nonce, url, body) triple that gets signed.

use std::fmt;

use super::signing::{sign_message, Signature, SigningError};

/// A single-use request nonce.
///
/// Outbound nonces are the current Unix time in milliseconds. They increase
/// in practice but nothing here enforces it; inbound nonces are taken as-is
/// from the `API-Nonce` header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nonce(String);

impl Nonce {
    /// Creates a nonce from the current wall-clock time.
    pub fn now() -> Self {
        Self::from_millis(chrono::Utc::now().timestamp_millis())
    }

    /// Creates a nonce from a millisecond timestamp.
    pub fn from_millis(millis: i64) -> Self {
        Self(millis.to_string())
    }

    /// Wraps an existing nonce value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The signed parts of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEnvelope {
    nonce: Nonce,
    url: String,
    body: String,
}

impl RequestEnvelope {
    /// Creates an envelope. `body` is empty for requests without a payload.
    pub fn new(nonce: Nonce, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            nonce,
            url: url.into(),
            body: body.into(),
        }
    }

    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }

    /// Canonical message: `nonce ‖ url ‖ body`, no delimiters.
    pub fn message(&self) -> String {
        let mut message =
            String::with_capacity(self.nonce.0.len() + self.url.len() + self.body.len());
        message.push_str(&self.nonce.0);
        message.push_str(&self.url);
        message.push_str(&self.body);
        message
    }

    /// Signs the canonical message with `secret`.
    pub fn sign(&self, secret: &str) -> Result<Signature, SigningError> {
        sign_message(&self.message(), secret)
    }
}
