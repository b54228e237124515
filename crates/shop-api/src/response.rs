//! Raw HTTP responses as delivered by a transport.

use serde_json::Value;
use std::collections::HashMap;

/// An HTTP response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: u16,
    /// The response headers.
    pub headers: HashMap<String, String>,
    /// The response body.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Create a new response.
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a response with a JSON body.
    pub fn json(status: u16, body: &Value) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self::new(status, headers, body.to_string().into_bytes())
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the response was a client error (4xx status).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if the response was a server error (5xx status).
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Get the response body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Interpret the body as a JSON value.
    ///
    /// Bodies that are not JSON become a string value, and an empty body
    /// becomes an empty string, matching what a browser client would hand
    /// to its response handler.
    pub fn body_value(&self) -> Value {
        if self.body.is_empty() {
            return Value::String(String::new());
        }
        serde_json::from_slice(&self.body).unwrap_or_else(|_| Value::String(self.text()))
    }

    /// Get a header value.
    pub fn header(&self, key: &str) -> Option<&str> {
        // Case-insensitive header lookup
        let key_lower = key.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == key_lower)
            .map(|(_, v)| v.as_str())
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_response(status: u16, body: &[u8]) -> RawResponse {
        RawResponse::new(status, HashMap::new(), body.to_vec())
    }

    // === Status Check Tests ===

    #[test]
    fn test_response_is_success() {
        assert!(make_response(200, b"").is_success());
        assert!(make_response(204, b"").is_success());
        assert!(!make_response(199, b"").is_success());
        assert!(!make_response(304, b"").is_success());
    }

    #[test]
    fn test_response_error_classes() {
        assert!(make_response(403, b"").is_client_error());
        assert!(!make_response(500, b"").is_client_error());
        assert!(make_response(503, b"").is_server_error());
        assert!(!make_response(499, b"").is_server_error());
    }

    // === Body Tests ===

    #[test]
    fn test_body_value_json() {
        let resp = make_response(200, b"[1,2,3]");
        assert_eq!(resp.body_value(), json!([1, 2, 3]));
    }

    #[test]
    fn test_body_value_plain_text() {
        let resp = make_response(200, b"OK");
        assert_eq!(resp.body_value(), json!("OK"));
    }

    #[test]
    fn test_body_value_empty() {
        assert_eq!(make_response(200, b"").body_value(), json!(""));
    }

    #[test]
    fn test_text_invalid_utf8_is_lossy() {
        let resp = make_response(200, &[0x61, 0xff]);
        assert_eq!(resp.text(), "a\u{fffd}");
    }

    // === Header Tests ===

    #[test]
    fn test_header_case_insensitive() {
        let resp = RawResponse::json(200, &json!({}));
        assert_eq!(resp.header("content-type"), Some("application/json"));
        assert_eq!(resp.content_type(), Some("application/json"));
        assert_eq!(resp.header("X-Missing"), None);
    }
}
