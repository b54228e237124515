//! The uniform `{success, data, message}` response envelope.

use crate::error::MSG_REQUEST_FAILED;
use crate::{ApiRejection, RejectionKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Message attached to bodies wrapped by the client.
pub const MSG_REQUEST_SUCCEEDED: &str = "request succeeded";

/// A successful response in envelope form.
///
/// Bodies that already carry a `success` field are kept verbatim, so any
/// extra fields the backend sends (`user`, `errorType`, counts, ...) stay
/// reachable through [`Envelope::get`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Envelope(Map<String, Value>);

impl Envelope {
    /// Wrap a raw body as a successful envelope.
    pub fn wrap(body: Value) -> Self {
        let mut map = Map::new();
        map.insert("success".to_string(), Value::Bool(true));
        map.insert("data".to_string(), body);
        map.insert(
            "message".to_string(),
            Value::String(MSG_REQUEST_SUCCEEDED.to_string()),
        );
        Self(map)
    }

    /// Normalize a response body.
    ///
    /// An object with a `success` field passes through unchanged;
    /// anything else is wrapped.
    pub fn from_body(body: Value) -> Self {
        match body {
            Value::Object(map) if map.contains_key("success") => Self(map),
            other => Self::wrap(other),
        }
    }

    /// The `success` flag, read with JavaScript truthiness.
    pub fn success(&self) -> bool {
        self.0.get("success").is_some_and(truthy)
    }

    /// The `data` field; `None` when absent, `Some(Null)` when null.
    pub fn data(&self) -> Option<&Value> {
        self.0.get("data")
    }

    /// The `message` field, if it is a string.
    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(Value::as_str)
    }

    /// Any other field of the envelope.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Deserialize the `data` field.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, ApiRejection> {
        let data = self.data().cloned().unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(|e| {
            ApiRejection::new(RejectionKind::Backend, format!("unexpected response data: {}", e))
        })
    }

    /// The envelope as a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Consume into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Unwrap an envelope for page code.
///
/// Returns `data` when the call succeeded, or the whole envelope when it
/// has no `data` field. A `success: false` envelope becomes a rejection
/// carrying the backend's message.
pub fn handle_response(envelope: &Envelope) -> Result<Value, ApiRejection> {
    if envelope.success() {
        Ok(envelope
            .data()
            .cloned()
            .unwrap_or_else(|| envelope.to_value()))
    } else {
        let message = envelope
            .message()
            .filter(|m| !m.is_empty())
            .unwrap_or(MSG_REQUEST_FAILED);
        Err(ApiRejection::new(RejectionKind::Backend, message))
    }
}

/// JavaScript truthiness of a JSON value.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_array_is_wrapped() {
        let envelope = Envelope::from_body(json!([1, 2, 3]));
        assert_eq!(
            envelope.to_value(),
            json!({"success": true, "data": [1, 2, 3], "message": "request succeeded"})
        );
    }

    #[test]
    fn test_object_without_success_is_wrapped() {
        let envelope = Envelope::from_body(json!({"count": 4}));
        assert!(envelope.success());
        assert_eq!(envelope.data(), Some(&json!({"count": 4})));
    }

    #[test]
    fn test_object_with_success_passes_through() {
        let body = json!({"success": false, "message": "nickname taken", "errorType": "VALIDATION_ERROR"});
        let envelope = Envelope::from_body(body.clone());
        assert_eq!(envelope.into_value(), body);
    }

    #[test]
    fn test_success_truthiness() {
        assert!(Envelope::from_body(json!({"success": 1})).success());
        assert!(!Envelope::from_body(json!({"success": null})).success());
        assert!(!Envelope::from_body(json!({"success": ""})).success());
    }

    #[test]
    fn test_handle_response_returns_data() {
        let envelope = Envelope::from_body(json!({"success": true, "data": {"gid": 1}}));
        assert_eq!(handle_response(&envelope).unwrap(), json!({"gid": 1}));
    }

    #[test]
    fn test_handle_response_null_data_is_returned() {
        let envelope = Envelope::from_body(json!({"success": true, "data": null}));
        assert_eq!(handle_response(&envelope).unwrap(), Value::Null);
    }

    #[test]
    fn test_handle_response_without_data_returns_envelope() {
        let body = json!({"success": true, "user": {"uid": 1}});
        let envelope = Envelope::from_body(body.clone());
        assert_eq!(handle_response(&envelope).unwrap(), body);
    }

    #[test]
    fn test_handle_response_failure() {
        let envelope = Envelope::from_body(json!({"success": false, "message": "out of stock"}));
        let err = handle_response(&envelope).unwrap_err();
        assert_eq!(err.message, "out of stock");
        assert_eq!(err.kind, RejectionKind::Backend);

        let bare = Envelope::from_body(json!({"success": false}));
        assert_eq!(handle_response(&bare).unwrap_err().message, "request failed");
    }

    #[test]
    fn test_data_as() {
        let envelope = Envelope::wrap(json!([3, 4]));
        let data: Vec<u32> = envelope.data_as().unwrap();
        assert_eq!(data, vec![3, 4]);
        assert!(envelope.data_as::<String>().is_err());
    }
}
