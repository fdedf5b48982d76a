//! Mock invoice gateway for testing.
//!
//! Provides a configurable `InvoiceGateway` for application tests. Supports:
//! - Pre-configured invoices by id
//! - Error injection
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{InvoicePayload, InvoiceResponse};
use crate::ports::{InvoiceGateway, YellowError};

/// Mock invoice gateway.
///
/// # Example
///
/// ```ignore
/// let mock = MockInvoiceGateway::new();
/// mock.set_next_invoice(InvoiceResponse::from_iter([("id", "inv_1")]));
/// mock.set_error(YellowError::transport("offline"));
/// ```
#[derive(Clone, Default)]
pub struct MockInvoiceGateway {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Invoices returned by `check_invoice_status`, keyed by id.
    invoices: HashMap<String, InvoiceResponse>,

    /// Response for the next `create_invoice` call.
    next_invoice: Option<InvoiceResponse>,

    /// Error to return on the next call.
    next_error: Option<YellowError>,

    /// Recorded calls.
    call_log: Vec<GatewayCall>,
}

/// A recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    CreateInvoice(InvoicePayload),
    CheckInvoiceStatus(String),
}

impl MockInvoiceGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an invoice for `check_invoice_status`.
    pub fn add_invoice(&self, id: impl Into<String>, invoice: InvoiceResponse) {
        self.state().invoices.insert(id.into(), invoice);
    }

    /// Sets the response of the next `create_invoice` call.
    pub fn set_next_invoice(&self, invoice: InvoiceResponse) {
        self.state().next_invoice = Some(invoice);
    }

    /// Makes the next call fail.
    pub fn set_error(&self, error: YellowError) {
        self.state().next_error = Some(error);
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state().call_log.clone()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the log from the others.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl InvoiceGateway for MockInvoiceGateway {
    async fn create_invoice(
        &self,
        payload: &InvoicePayload,
    ) -> Result<InvoiceResponse, YellowError> {
        let mut state = self.state();
        state
            .call_log
            .push(GatewayCall::CreateInvoice(payload.clone()));

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        let invoice = match state.next_invoice.take() {
            Some(invoice) => invoice,
            None => {
                let id = format!("inv_mock_{}", state.invoices.len() + 1);
                let mut fields: Vec<(String, String)> = payload
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                fields.push(("id".to_string(), id));
                fields.push(("status".to_string(), "unpaid".to_string()));
                fields.into_iter().collect()
            }
        };

        if let Some(id) = invoice.id() {
            state.invoices.insert(id.to_string(), invoice.clone());
        }

        Ok(invoice)
    }

    async fn check_invoice_status(&self, id: &str) -> Result<InvoiceResponse, YellowError> {
        let mut state = self.state();
        state
            .call_log
            .push(GatewayCall::CheckInvoiceStatus(id.to_string()));

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        state
            .invoices
            .get(id)
            .cloned()
            .ok_or_else(|| YellowError::Api {
                status: 404,
                body: format!("invoice {} not found", id),
            })
    }
}
