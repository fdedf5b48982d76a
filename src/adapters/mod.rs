//! Adapters - Implementations of port interfaces.
//!
//! - `yellow` - HTTPS client for the Yellow invoice API, plus a mock gateway
//! - `http` - axum endpoint receiving IPN callbacks

pub mod http;
pub mod yellow;

pub use http::{ipn_routes, IpnAppState};
pub use yellow::{ClientConfig, GatewayCall, MockInvoiceGateway, YellowClient};
