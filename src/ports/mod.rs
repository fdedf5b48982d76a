//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `InvoiceGateway` - invoice creation and status polling against the API
//! - `IpnHandler` - application callback for verified payment notifications

mod invoice_gateway;
mod ipn_handler;

pub use invoice_gateway::{InvoiceGateway, YellowError};
pub use ipn_handler::{IpnHandler, IpnHandlerError};
