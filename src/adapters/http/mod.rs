//! HTTP adapters - endpoints applications mount in their own axum router.

mod dto;
pub mod ipn;

pub use dto::{ErrorResponse, IpnAck};
pub use ipn::{ipn_routes, IpnApiError, IpnAppState};
