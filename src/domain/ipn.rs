//! IPN (Instant Payment Notification) verification.
//!
//! The Yellow API signs its callbacks with the same scheme it expects from
//! clients: `HMAC-SHA256(secret, nonce ‖ url ‖ body)`, sent in the `API-Sign`
//! and `API-Nonce` headers. The receiving application supplies the URL the
//! callback was delivered to, both header values, and the raw body.
//!
//! Empty bodies are rejected: a notification always reports an invoice state
//! change and therefore always carries a payload.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use super::envelope::{Nonce, RequestEnvelope};
use super::invoice::{DecodeError, InvoiceResponse};

/// Outcome of checking an inbound notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpnVerification {
    /// Signature matches the recomputed one.
    Valid,
    /// A required input (`url`, `signature` or `nonce`) was empty.
    MissingField(&'static str),
    /// The notification body was empty.
    EmptyBody,
    /// Inputs were present but the signature did not match.
    SignatureMismatch,
}

impl IpnVerification {
    pub fn is_valid(&self) -> bool {
        matches!(self, IpnVerification::Valid)
    }

    /// True when the inputs were incomplete rather than forged.
    pub fn is_missing_input(&self) -> bool {
        matches!(
            self,
            IpnVerification::MissingField(_) | IpnVerification::EmptyBody
        )
    }
}

impl fmt::Display for IpnVerification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpnVerification::Valid => f.write_str("valid"),
            IpnVerification::MissingField(field) => write!(f, "missing {}", field),
            IpnVerification::EmptyBody => f.write_str("empty body"),
            IpnVerification::SignatureMismatch => f.write_str("signature mismatch"),
        }
    }
}

/// Verifier for IPN signatures.
#[derive(Clone)]
pub struct IpnVerifier {
    secret: SecretString,
}

impl IpnVerifier {
    /// Creates a verifier from the shared API secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
        }
    }

    pub fn from_secret(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Checks a notification, reporting why it was rejected.
    ///
    /// # Verification Steps
    ///
    /// 1. Reject empty `url`, `signature`, `nonce`, then an empty `body`
    /// 2. Recompute the signature over `nonce ‖ url ‖ body`
    /// 3. Compare in constant time, case-sensitively
    pub fn check(&self, url: &str, signature: &str, nonce: &str, body: &str) -> IpnVerification {
        if url.is_empty() {
            return IpnVerification::MissingField("url");
        }
        if signature.is_empty() {
            return IpnVerification::MissingField("signature");
        }
        if nonce.is_empty() {
            return IpnVerification::MissingField("nonce");
        }
        if body.is_empty() {
            return IpnVerification::EmptyBody;
        }

        let envelope = RequestEnvelope::new(Nonce::new(nonce), url, body);
        let expected = match envelope.sign(self.secret.expose_secret()) {
            Ok(signature) => signature,
            Err(e) => {
                tracing::error!(error = %e, "Unable to compute IPN signature");
                return IpnVerification::SignatureMismatch;
            }
        };

        if !expected.matches(signature) {
            tracing::warn!(url = %url, nonce = %nonce, "Invalid IPN signature");
            return IpnVerification::SignatureMismatch;
        }

        IpnVerification::Valid
    }

    /// Returns true only for a correctly signed, complete notification.
    pub fn verify(&self, url: &str, signature: &str, nonce: &str, body: &str) -> bool {
        self.check(url, signature, nonce, body).is_valid()
    }
}

impl fmt::Debug for IpnVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IpnVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// A verified notification handed to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpnNotification {
    pub nonce: String,
    pub raw_body: String,
    pub fields: InvoiceResponse,
}

impl IpnNotification {
    /// Decodes the JSON body of a notification that already passed verification.
    pub fn parse(nonce: impl Into<String>, body: impl Into<String>) -> Result<Self, DecodeError> {
        let raw_body = body.into();
        let fields = InvoiceResponse::from_json(&raw_body)?;
        Ok(Self {
            nonce: nonce.into(),
            raw_body,
            fields,
        })
    }

    pub fn invoice_id(&self) -> Option<&str> {
        self.fields.id()
    }

    pub fn status(&self) -> Option<&str> {
        self.fields.status()
    }
}

/// Computes an IPN signature for use in test fixtures.
#[cfg(test)]
pub fn compute_test_signature(secret: &str, nonce: &str, url: &str, body: &str) -> String {
    RequestEnvelope::new(Nonce::new(nonce), url, body)
        .sign(secret)
        .unwrap()
        .into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEST_SECRET: &str = "test-secret";
    const CALLBACK_URL: &str = "https://shop.example.com/ipn";
    const NONCE: &str = "1700000000123";
    const BODY: &str = r#"{"id":"inv_1","status":"paid"}"#;

    fn verifier() -> IpnVerifier {
        IpnVerifier::new(TEST_SECRET)
    }

    // ══════════════════════════════════════════════════════════════
    // Missing Input Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn empty_url_is_missing_field() {
        let signature = compute_test_signature(TEST_SECRET, NONCE, CALLBACK_URL, BODY);
        assert_eq!(
            verifier().check("", &signature, NONCE, BODY),
            IpnVerification::MissingField("url")
        );
    }

    #[test]
    fn empty_signature_is_missing_field() {
        assert_eq!(
            verifier().check(CALLBACK_URL, "", NONCE, BODY),
            IpnVerification::MissingField("signature")
        );
    }

    #[test]
    fn empty_nonce_is_missing_field() {
        let signature = compute_test_signature(TEST_SECRET, NONCE, CALLBACK_URL, BODY);
        assert_eq!(
            verifier().check(CALLBACK_URL, &signature, "", BODY),
            IpnVerification::MissingField("nonce")
        );
    }

    #[test]
    fn empty_body_is_rejected_even_when_signed() {
        let signature = compute_test_signature(TEST_SECRET, NONCE, CALLBACK_URL, "");

        let result = verifier().check(CALLBACK_URL, &signature, NONCE, "");

        assert_eq!(result, IpnVerification::EmptyBody);
        assert!(result.is_missing_input());
    }

    // ══════════════════════════════════════════════════════════════
    // Signature Verification Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verify_valid_signature() {
        let signature = compute_test_signature(TEST_SECRET, NONCE, CALLBACK_URL, BODY);
        assert!(verifier().verify(CALLBACK_URL, &signature, NONCE, BODY));
    }

    #[test]
    fn verify_wrong_secret_fails() {
        let signature = compute_test_signature("other-secret", NONCE, CALLBACK_URL, BODY);
        assert_eq!(
            verifier().check(CALLBACK_URL, &signature, NONCE, BODY),
            IpnVerification::SignatureMismatch
        );
    }

    #[test]
    fn verify_tampered_body_fails() {
        let signature = compute_test_signature(TEST_SECRET, NONCE, CALLBACK_URL, BODY);
        let tampered = r#"{"id":"inv_1","status":"refunded"}"#;
        assert!(!verifier().verify(CALLBACK_URL, &signature, NONCE, tampered));
    }

    #[test]
    fn verify_replayed_to_other_url_fails() {
        let signature = compute_test_signature(TEST_SECRET, NONCE, CALLBACK_URL, BODY);
        assert!(!verifier().verify("https://evil.example.com/ipn", &signature, NONCE, BODY));
    }

    #[test]
    fn verify_uppercase_signature_fails() {
        let signature = compute_test_signature(TEST_SECRET, NONCE, CALLBACK_URL, BODY);
        assert!(!verifier().verify(CALLBACK_URL, &signature.to_uppercase(), NONCE, BODY));
    }

    #[test]
    fn verification_display() {
        assert_eq!(IpnVerification::Valid.to_string(), "valid");
        assert_eq!(
            IpnVerification::MissingField("nonce").to_string(),
            "missing nonce"
        );
        assert_eq!(
            IpnVerification::SignatureMismatch.to_string(),
            "signature mismatch"
        );
    }

    #[test]
    fn debug_redacts_secret() {
        let rendered = format!("{:?}", verifier());
        assert!(!rendered.contains(TEST_SECRET));
        assert!(rendered.contains("REDACTED"));
    }

    // ══════════════════════════════════════════════════════════════
    // Notification Parsing Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn parse_notification_fields() {
        let notification = IpnNotification::parse(NONCE, BODY).unwrap();

        assert_eq!(notification.nonce, NONCE);
        assert_eq!(notification.invoice_id(), Some("inv_1"));
        assert_eq!(notification.status(), Some("paid"));
        assert_eq!(notification.raw_body, BODY);
    }

    #[test]
    fn parse_notification_rejects_non_json() {
        let result = IpnNotification::parse(NONCE, "status=paid");
        assert!(matches!(result, Err(DecodeError::Malformed(_))));
    }

    // ══════════════════════════════════════════════════════════════
    // Properties
    // ══════════════════════════════════════════════════════════════

    proptest! {
        #[test]
        fn round_trip_with_correct_secret(
            url in "https://[a-z]{1,12}\\.example/[a-z]{0,12}",
            nonce in "[0-9]{1,16}",
            body in ".{1,128}",
            secret in ".{0,32}",
        ) {
            let signature = compute_test_signature(&secret, &nonce, &url, &body);
            prop_assert!(IpnVerifier::new(secret).verify(&url, &signature, &nonce, &body));
        }

        #[test]
        fn missing_inputs_never_verify(body in ".*", signature in "[0-9a-f]{64}") {
            let verifier = verifier();
            prop_assert!(!verifier.verify("", &signature, NONCE, &body));
            prop_assert!(!verifier.verify(CALLBACK_URL, "", NONCE, &body));
            prop_assert!(!verifier.verify(CALLBACK_URL, &signature, "", &body));
        }
    }
}
