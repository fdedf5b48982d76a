//! Yellow payment API adapter.
//!
//! Implements the `InvoiceGateway` port for the Yellow API, including:
//! - Invoice creation (`POST /invoice/`)
//! - Invoice status polling (`GET /invoice/{id}/`)
//! - IPN signature verification
//!
//! # Security
//!
//! - Requests and IPN callbacks are signed with HMAC-SHA256
//! - IPN signatures are compared in constant time
//! - The API secret is handled via `secrecy::SecretString`

mod client;
pub mod headers;
mod mock_gateway;

pub use client::{ClientConfig, YellowClient};
pub use mock_gateway::{GatewayCall, MockInvoiceGateway};
