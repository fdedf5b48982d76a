//! Invoice request payloads and decoded responses.
//!
//! The Yellow API owns the invoice schema; the SDK only moves string maps
//! across the wire. Field names such as `amount`, `currency` or `callback`
//! are passed through untouched.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors from decoding a JSON response body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The body is not valid JSON.
    #[error("malformed JSON: {0}")]
    Malformed(String),

    /// The body is valid JSON but not an object.
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Parameters for a new invoice.
///
/// Keys are kept sorted so the serialised body, and therefore the request
/// signature, is reproducible for a given payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InvoicePayload(BTreeMap<String, String>);

impl InvoicePayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds or replaces a field, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialises the payload as a request body.
    ///
    /// An empty payload yields the empty string, never `"{}"`.
    pub fn to_body(&self) -> Result<String, serde_json::Error> {
        if self.0.is_empty() {
            return Ok(String::new());
        }
        serde_json::to_string(&self.0)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InvoicePayload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<BTreeMap<String, String>> for InvoicePayload {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl From<HashMap<String, String>> for InvoicePayload {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map.into_iter().collect())
    }
}

/// A decoded API response as a flat string map.
///
/// Scalars are rendered as text (`12.5`, `true`); `null` fields are dropped;
/// nested arrays and objects are kept as compact JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InvoiceResponse(BTreeMap<String, String>);

impl InvoiceResponse {
    /// Decodes a JSON object body.
    ///
    /// # Errors
    ///
    /// - `Malformed` if the body is not JSON
    /// - `NotAnObject` if the top-level value is not an object
    pub fn from_json(body: &str) -> Result<Self, DecodeError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| DecodeError::Malformed(e.to_string()))?;

        let object = match value {
            Value::Object(object) => object,
            other => return Err(DecodeError::NotAnObject(json_kind(&other))),
        };

        let fields = object
            .into_iter()
            .filter_map(|(key, value)| flatten_value(value).map(|v| (key, v)))
            .collect();

        Ok(Self(fields))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Invoice identifier.
    pub fn id(&self) -> Option<&str> {
        self.get("id")
    }

    /// Hosted payment page URL.
    pub fn url(&self) -> Option<&str> {
        self.get("url")
    }

    /// Invoice status as reported by the API.
    pub fn status(&self) -> Option<&str> {
        self.get("status")
    }

    /// Deposit address for the invoice.
    pub fn address(&self) -> Option<&str> {
        self.get("address")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InvoiceResponse {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn flatten_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested @ (Value::Array(_) | Value::Object(_)) => Some(nested.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ══════════════════════════════════════════════════════════════
    // Payload Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn empty_payload_serialises_to_empty_string() {
        let payload = InvoicePayload::new();
        assert_eq!(payload.to_body().unwrap(), "");
    }

    #[test]
    fn payload_serialises_with_sorted_keys() {
        let payload = InvoicePayload::new()
            .with("currency", "USD")
            .with("amount", "10")
            .with("callback", "https://shop.example.com/ipn");

        assert_eq!(
            payload.to_body().unwrap(),
            r#"{"amount":"10","callback":"https://shop.example.com/ipn","currency":"USD"}"#
        );
    }

    #[test]
    fn payload_escapes_json_strings() {
        let payload = InvoicePayload::new().with("note", "say \"hi\"");
        assert_eq!(payload.to_body().unwrap(), r#"{"note":"say \"hi\""}"#);
    }

    #[test]
    fn payload_from_hash_map_is_sorted() {
        let mut map = HashMap::new();
        map.insert("b".to_string(), "2".to_string());
        map.insert("a".to_string(), "1".to_string());

        let payload = InvoicePayload::from(map);

        assert_eq!(payload.to_body().unwrap(), r#"{"a":"1","b":"2"}"#);
    }

    #[test]
    fn payload_insert_replaces_value() {
        let mut payload = InvoicePayload::new().with("amount", "10");
        let previous = payload.insert("amount", "20");

        assert_eq!(previous.as_deref(), Some("10"));
        assert_eq!(payload.get("amount"), Some("20"));
        assert_eq!(payload.len(), 1);
    }

    #[test]
    fn payload_collects_from_pairs() {
        let payload: InvoicePayload = vec![("amount", "5"), ("currency", "AED")]
            .into_iter()
            .collect();
        assert_eq!(payload.get("currency"), Some("AED"));
        assert!(!payload.is_empty());
    }

    // ══════════════════════════════════════════════════════════════
    // Response Decoding Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn decode_string_fields() {
        let response = InvoiceResponse::from_json(
            r#"{"id":"inv_1","url":"https://pay.example/inv_1","status":"unpaid","address":"1BoatSLRHtKNngkdXEeobR76b53LETtpyT"}"#,
        )
        .unwrap();

        assert_eq!(response.id(), Some("inv_1"));
        assert_eq!(response.url(), Some("https://pay.example/inv_1"));
        assert_eq!(response.status(), Some("unpaid"));
        assert_eq!(response.address(), Some("1BoatSLRHtKNngkdXEeobR76b53LETtpyT"));
    }

    #[test]
    fn decode_renders_scalars_as_text() {
        let response =
            InvoiceResponse::from_json(r#"{"amount":12.5,"expired":false,"count":3}"#).unwrap();

        assert_eq!(response.get("amount"), Some("12.5"));
        assert_eq!(response.get("expired"), Some("false"));
        assert_eq!(response.get("count"), Some("3"));
    }

    #[test]
    fn decode_drops_null_fields() {
        let response = InvoiceResponse::from_json(r#"{"id":"inv_1","memo":null}"#).unwrap();

        assert_eq!(response.len(), 1);
        assert_eq!(response.get("memo"), None);
    }

    #[test]
    fn decode_keeps_nested_values_as_json() {
        let response =
            InvoiceResponse::from_json(r#"{"rates":{"USD":"1.0"},"tags":["a","b"]}"#).unwrap();

        assert_eq!(response.get("rates"), Some(r#"{"USD":"1.0"}"#));
        assert_eq!(response.get("tags"), Some(r#"["a","b"]"#));
    }

    #[test]
    fn decode_empty_object() {
        let response = InvoiceResponse::from_json("{}").unwrap();
        assert!(response.is_empty());
    }

    #[test]
    fn decode_malformed_json_fails() {
        let result = InvoiceResponse::from_json("<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn decode_empty_body_fails() {
        let result = InvoiceResponse::from_json("");
        assert!(matches!(result, Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn decode_non_object_fails() {
        assert_eq!(
            InvoiceResponse::from_json("[1,2]"),
            Err(DecodeError::NotAnObject("array"))
        );
        assert_eq!(
            InvoiceResponse::from_json("null"),
            Err(DecodeError::NotAnObject("null"))
        );
    }

    #[test]
    fn decode_error_displays_kind() {
        let err = DecodeError::NotAnObject("string");
        assert_eq!(format!("{}", err), "expected a JSON object, found string");
    }
}
