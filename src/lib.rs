//! Yellow Pay SDK - client for the Yellow invoice API.
//!
//! Creates invoices, queries their status, and verifies the signed IPN
//! callbacks the payment service sends when an invoice changes state.
//!
//! ```ignore
//! let client = YellowClient::new(ClientConfig::new(api_key, api_secret))?;
//! let invoice = client
//!     .create_invoice(&InvoicePayload::new().with("base_price", "10").with("base_ccy", "USD"))
//!     .await?;
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;

pub use adapters::{ClientConfig, YellowClient};
pub use config::YellowConfig;
pub use domain::{InvoicePayload, InvoiceResponse, IpnNotification, IpnVerification, IpnVerifier};
pub use ports::{InvoiceGateway, IpnHandler, IpnHandlerError, YellowError};
