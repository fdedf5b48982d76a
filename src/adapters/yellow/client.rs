//! Yellow API client.
//!
//! Implements the `InvoiceGateway` port over reqwest. Every request is signed
//! with HMAC-SHA256 over `nonce ‖ url ‖ body` and carries the signature in
//! the `API-Sign` header.
//!
//! # Security
//!
//! - The API secret is held in a `secrecy::SecretString` and never logged
//! - IPN signatures are compared in constant time
//!
//! # Configuration
//!
//! ```ignore
//! let config = ClientConfig::new(api_key, api_secret)
//!     .with_server_root("http://localhost:9000/v1")
//!     .with_timeout(Duration::from_secs(10));
//! let client = YellowClient::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};

use crate::config::{YellowConfig, DEFAULT_SERVER_ROOT};
use crate::domain::{
    InvoicePayload, InvoiceResponse, IpnVerification, IpnVerifier, Nonce, RequestEnvelope,
};
use crate::ports::{InvoiceGateway, YellowError};

use super::headers;

/// Path of the create-invoice endpoint, relative to the server root.
const INVOICE_PATH: &str = "/invoice/";

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Public API key.
    api_key: String,

    /// Shared API secret.
    api_secret: SecretString,

    /// API root (default: https://api.yellowpay.co/v1).
    server_root: String,

    /// Per-request timeout.
    timeout: Duration,

    /// `API-Platform` header value.
    platform: String,
}

impl ClientConfig {
    /// Create a new configuration with default server root and timeout.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self::with_secret(api_key, SecretString::new(api_secret.into()))
    }

    fn with_secret(api_key: impl Into<String>, api_secret: SecretString) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret,
            server_root: DEFAULT_SERVER_ROOT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            platform: headers::default_platform(),
        }
    }

    /// Set a custom API server root (for testing or staging).
    pub fn with_server_root(mut self, root: impl Into<String>) -> Self {
        self.server_root = root.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the `API-Platform` header.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn server_root(&self) -> &str {
        &self.server_root
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }
}

impl From<&YellowConfig> for ClientConfig {
    fn from(config: &YellowConfig) -> Self {
        let mut client_config =
            ClientConfig::with_secret(config.api_key.clone(), config.api_secret.clone())
                .with_server_root(config.server_root())
                .with_timeout(Duration::from_secs(config.request_timeout_secs));

        if let Some(platform) = &config.platform {
            client_config = client_config.with_platform(platform.clone());
        }

        client_config
    }
}

/// Signed request client for the Yellow API.
///
/// Holds one reqwest client for its lifetime; it is `Send + Sync` and can be
/// shared behind an `Arc`.
pub struct YellowClient {
    config: ClientConfig,
    http_client: reqwest::Client,
    verifier: IpnVerifier,
}

impl YellowClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `YellowError::Transport` if the HTTP client cannot be built
    /// (e.g. no TLS backend).
    pub fn new(config: ClientConfig) -> Result<Self, YellowError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| YellowError::transport(format!("Failed to build HTTP client: {}", e)))?;

        let verifier = IpnVerifier::from_secret(config.api_secret.clone());

        Ok(Self {
            config,
            http_client,
            verifier,
        })
    }

    /// Create a client from loaded application configuration.
    pub fn from_config(config: &YellowConfig) -> Result<Self, YellowError> {
        Self::new(ClientConfig::from(config))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `{server_root}/invoice/`
    pub fn create_invoice_url(&self) -> String {
        format!("{}{}", self.config.server_root, INVOICE_PATH)
    }

    /// `{server_root}/invoice/{urlencoded id}/`
    pub fn invoice_status_url(&self, id: &str) -> String {
        format!(
            "{}{}{}/",
            self.config.server_root,
            INVOICE_PATH,
            urlencoding::encode(id)
        )
    }

    /// Checks an inbound IPN, reporting why it was rejected.
    pub fn check_ipn(
        &self,
        url: &str,
        signature: &str,
        nonce: &str,
        body: &str,
    ) -> IpnVerification {
        self.verifier.check(url, signature, nonce, body)
    }

    /// Returns true only for a correctly signed, complete IPN.
    pub fn verify_ipn(&self, url: &str, signature: &str, nonce: &str, body: &str) -> bool {
        self.verifier.verify(url, signature, nonce, body)
    }

    /// Verifier sharing this client's secret, for mounting `ipn_routes`.
    pub fn ipn_verifier(&self) -> IpnVerifier {
        self.verifier.clone()
    }

    /// Signs the envelope, sends it, and decodes the JSON response.
    async fn send_signed(
        &self,
        method: Method,
        envelope: RequestEnvelope,
    ) -> Result<InvoiceResponse, YellowError> {
        let signature = envelope.sign(self.config.api_secret.expose_secret())?;

        tracing::debug!(
            method = %method,
            url = %envelope.url(),
            nonce = %envelope.nonce(),
            has_body = envelope.has_body(),
            "Sending signed Yellow API request"
        );

        let mut request = self
            .http_client
            .request(method.clone(), envelope.url())
            .header(headers::API_KEY, self.config.api_key.as_str())
            .header(headers::API_NONCE, envelope.nonce().as_str())
            .header(headers::API_SIGN, signature.as_str())
            .header(headers::API_PLATFORM, self.config.platform.as_str())
            .header(headers::API_PLUGIN, headers::SDK_VERSION)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if envelope.has_body() {
            request = request.body(envelope.body().to_string());
        }

        let response = request.send().await.map_err(|e| {
            let err = self.transport_error(&e);
            tracing::error!(method = %method, url = %envelope.url(), error = %err, "Yellow API request failed");
            err
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e))?;

        if !status.is_success() {
            tracing::warn!(
                method = %method,
                url = %envelope.url(),
                status = status.as_u16(),
                "Yellow API returned an error status"
            );
            return Err(YellowError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        InvoiceResponse::from_json(&text).map_err(|e| {
            tracing::warn!(url = %envelope.url(), error = %e, "Failed to decode Yellow API response");
            YellowError::from(e)
        })
    }

    fn transport_error(&self, e: &reqwest::Error) -> YellowError {
        if e.is_timeout() {
            YellowError::transport(format!(
                "request timed out after {}ms",
                self.config.timeout.as_millis()
            ))
        } else if e.is_connect() {
            YellowError::transport(format!("connection failed: {}", e))
        } else {
            YellowError::transport(e.to_string())
        }
    }
}

impl std::fmt::Debug for YellowClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YellowClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl InvoiceGateway for YellowClient {
    async fn create_invoice(
        &self,
        payload: &InvoicePayload,
    ) -> Result<InvoiceResponse, YellowError> {
        let body = payload.to_body()?;
        let envelope = RequestEnvelope::new(Nonce::now(), self.create_invoice_url(), body);

        self.send_signed(Method::POST, envelope).await
    }

    async fn check_invoice_status(&self, id: &str) -> Result<InvoiceResponse, YellowError> {
        if id.is_empty() {
            return Err(YellowError::invalid_request("invoice id must not be empty"));
        }

        let envelope = RequestEnvelope::new(Nonce::now(), self.invoice_status_url(id), "");

        self.send_signed(Method::GET, envelope).await
    }
}
