//! Axum endpoint for Yellow IPN callbacks.
//!
//! The SDK does not run a server. Applications mount [`ipn_routes`] in their
//! own router; the handler verifies the `API-Sign`/`API-Nonce` headers against
//! the public callback URL before anything reaches the `IpnHandler`.
//!
//! ```ignore
//! let state = IpnAppState::new(client.ipn_verifier(), "https://shop.example.com/ipn", handler);
//! let app = Router::new()
//!     .nest("/ipn", ipn_routes())
//!     .with_state(state);
//! ```

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use http::{HeaderMap, StatusCode};

use crate::adapters::yellow::headers;
use crate::domain::{IpnNotification, IpnVerification, IpnVerifier};
use crate::ports::{IpnHandler, IpnHandlerError};

use super::dto::{ErrorResponse, IpnAck};

/// Shared state for the IPN endpoint.
#[derive(Clone)]
pub struct IpnAppState {
    verifier: IpnVerifier,
    /// URL the payment service delivers callbacks to (the signed URL).
    callback_url: Arc<str>,
    handler: Arc<dyn IpnHandler>,
}

impl IpnAppState {
    pub fn new(
        verifier: IpnVerifier,
        callback_url: impl Into<String>,
        handler: Arc<dyn IpnHandler>,
    ) -> Self {
        Self {
            verifier,
            callback_url: Arc::from(callback_url.into()),
            handler,
        }
    }

    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }
}

/// Create the IPN router.
///
/// # Routes
/// - `POST /` - Verify and dispatch an IPN callback
pub fn ipn_routes() -> Router<IpnAppState> {
    Router::new().route("/", post(handle_ipn))
}

/// Verifies an IPN callback and hands it to the application.
pub async fn handle_ipn(
    State(state): State<IpnAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, IpnApiError> {
    let signature = header_str(&headers, headers::API_SIGN);
    let nonce = header_str(&headers, headers::API_NONCE);
    let body = std::str::from_utf8(&body).map_err(|_| IpnApiError::InvalidBody)?;

    let verification = state
        .verifier
        .check(&state.callback_url, signature, nonce, body);
    if !verification.is_valid() {
        return Err(IpnApiError::Rejected(verification));
    }

    let notification =
        IpnNotification::parse(nonce, body).map_err(|e| IpnApiError::Decode(e.to_string()))?;
    let invoice_id = notification.invoice_id().map(str::to_string);

    tracing::info!(
        nonce = %nonce,
        invoice_id = invoice_id.as_deref().unwrap_or("-"),
        status = notification.status().unwrap_or("-"),
        "Verified IPN callback"
    );

    let result = match state.handler.handle(notification).await {
        Ok(()) => "processed",
        Err(IpnHandlerError::Ignored(reason)) => {
            tracing::debug!(reason = %reason, "IPN callback ignored by handler");
            "ignored"
        }
        Err(err @ IpnHandlerError::Failed(_)) => return Err(IpnApiError::Handler(err)),
    };

    Ok((
        StatusCode::OK,
        Json(IpnAck {
            result: result.to_string(),
            invoice_id,
        }),
    ))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts IPN failures to HTTP responses.
#[derive(Debug)]
pub enum IpnApiError {
    /// Verification failed or inputs were missing.
    Rejected(IpnVerification),
    /// Body is not UTF-8.
    InvalidBody,
    /// Body verified but is not a JSON object.
    Decode(String),
    /// Application handler failed.
    Handler(IpnHandlerError),
}

impl IntoResponse for IpnApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code, message) = match &self {
            IpnApiError::Rejected(IpnVerification::SignatureMismatch) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_IPN_SIGNATURE",
                "IPN signature mismatch".to_string(),
            ),
            IpnApiError::Rejected(verification) => (
                StatusCode::BAD_REQUEST,
                "INCOMPLETE_IPN",
                format!("IPN rejected: {}", verification),
            ),
            IpnApiError::InvalidBody => (
                StatusCode::BAD_REQUEST,
                "INVALID_IPN_BODY",
                "IPN body is not valid UTF-8".to_string(),
            ),
            IpnApiError::Decode(message) => (
                StatusCode::BAD_REQUEST,
                "INVALID_IPN_BODY",
                message.clone(),
            ),
            IpnApiError::Handler(err) => {
                tracing::error!(error = %err, "IPN handler failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IPN_HANDLER_FAILED",
                    err.to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(error_code, message))).into_response()
    }
}
