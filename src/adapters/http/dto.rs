//! Response DTOs for the IPN endpoint.

use serde::{Deserialize, Serialize};

/// Error body returned by the IPN endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

/// Acknowledgement body for accepted notifications.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IpnAck {
    /// `processed` or `ignored`.
    pub result: String,
    /// Invoice the notification referred to, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
}
