//! Invoice gateway port for the Yellow payment API.
//!
//! Defines the contract the HTTP client implements. Applications depend on
//! the trait so a `MockInvoiceGateway` can stand in during tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{DecodeError, InvoicePayload, InvoiceResponse, SigningError};

/// Port for invoice operations against the payment API.
#[async_trait]
pub trait InvoiceGateway: Send + Sync {
    /// Create an invoice.
    ///
    /// Sends a signed `POST {server_root}/invoice/` with the payload as a JSON
    /// body (empty when the payload is empty).
    async fn create_invoice(&self, payload: &InvoicePayload)
        -> Result<InvoiceResponse, YellowError>;

    /// Get the current state of an invoice.
    ///
    /// Sends a signed `GET {server_root}/invoice/{id}/` with an empty body.
    async fn check_invoice_status(&self, id: &str) -> Result<InvoiceResponse, YellowError>;
}

/// Errors from invoice operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum YellowError {
    /// Connection, timeout or malformed HTTP.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Signing primitive unavailable or key rejected.
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Request payload could not be encoded.
    #[error("Encode error: {0}")]
    Encode(String),

    /// API answered with a non-success status.
    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// Request rejected before any I/O.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl YellowError {
    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        YellowError::Transport(message.into())
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        YellowError::InvalidRequest(message.into())
    }

    /// Returns true if the same call may succeed later.
    ///
    /// The SDK never retries on its own; this only informs the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            YellowError::Transport(_) => true,
            YellowError::Api { status, .. } => *status == 429 || *status >= 500,
            YellowError::Crypto(_)
            | YellowError::Decode(_)
            | YellowError::Encode(_)
            | YellowError::InvalidRequest(_) => false,
        }
    }

    /// HTTP status returned by the API, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            YellowError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<SigningError> for YellowError {
    fn from(err: SigningError) -> Self {
        YellowError::Crypto(err.to_string())
    }
}

impl From<DecodeError> for YellowError {
    fn from(err: DecodeError) -> Self {
        YellowError::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for YellowError {
    fn from(err: serde_json::Error) -> Self {
        YellowError::Encode(err.to_string())
    }
}
