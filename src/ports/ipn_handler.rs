//! Port for application code that consumes verified IPN callbacks.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::IpnNotification;

/// Receives notifications that passed signature verification.
///
/// Implementations should be idempotent: the payment service may deliver the
/// same notification more than once.
#[async_trait]
pub trait IpnHandler: Send + Sync {
    async fn handle(&self, notification: IpnNotification) -> Result<(), IpnHandlerError>;
}

/// Errors returned by an `IpnHandler`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IpnHandlerError {
    /// Notification was intentionally ignored (acknowledged, not an error).
    #[error("Notification ignored: {0}")]
    Ignored(String),

    /// Processing failed; the sender should deliver it again.
    #[error("Notification processing failed: {0}")]
    Failed(String),
}

impl IpnHandlerError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, IpnHandlerError::Failed(_))
    }
}
