//! Domain layer - signing, envelopes, invoices and IPN verification.
//!
//! Nothing here performs I/O. The HTTP client in `adapters::yellow` and the
//! webhook router in `adapters::http` are built on these types.

mod envelope;
mod invoice;
mod ipn;
mod signing;

pub use envelope::{Nonce, RequestEnvelope};
pub use invoice::{DecodeError, InvoicePayload, InvoiceResponse};
pub use ipn::{IpnNotification, IpnVerification, IpnVerifier};
pub use signing::{sign_message, Signature, SigningError, SIGNATURE_HEX_LEN};

#[cfg(test)]
pub(crate) use ipn::compute_test_signature;
