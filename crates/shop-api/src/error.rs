//! API client error types.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Default message for a failure nothing more specific describes.
pub const MSG_REQUEST_FAILED: &str = "request failed";
/// Message when no response was received.
pub const MSG_NETWORK_ERROR: &str = "network error";
/// Message when the backend no longer recognises the session.
pub const MSG_SESSION_EXPIRED: &str = "session expired, please log in again";
/// Message for a 403 on a valid session.
pub const MSG_FORBIDDEN: &str = "insufficient permission";
/// Message for a 404.
pub const MSG_NOT_FOUND: &str = "resource not found";
/// Message for any 5xx.
pub const MSG_SERVER_ERROR: &str = "internal server error, try again later";

/// What went wrong, for callers that branch on more than the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// No response: connection failure or timeout.
    Network,
    /// 401/403 carrying the session-invalid marker.
    SessionInvalid,
    /// 401 without the marker.
    Unauthorized,
    /// 403 without the marker.
    Forbidden,
    /// 404.
    NotFound,
    /// 5xx.
    Server,
    /// Any other non-2xx status.
    Status,
    /// The request could not be built.
    InvalidRequest,
    /// A 2xx envelope reported `success: false`.
    Backend,
}

/// A rejected call, shaped like the backend's failure envelope.
///
/// Serializes as `{"success": false, "message": ..., "data": null}`, or as
/// `{"success": false, "message": ..., "redirecting": true}` when a login
/// redirect is already under way.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ApiRejection {
    /// Human-readable message.
    pub message: String,
    /// Payload; always null for transport and status failures.
    pub data: Value,
    /// Set when the client already redirected to login.
    pub redirecting: bool,
    /// Failure classification.
    pub kind: RejectionKind,
    /// HTTP status, if a response was received.
    pub status: Option<u16>,
}

impl ApiRejection {
    /// Create a rejection with a null payload.
    pub fn new(kind: RejectionKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: Value::Null,
            redirecting: false,
            kind,
            status: None,
        }
    }

    /// No response was received.
    pub fn network() -> Self {
        Self::new(RejectionKind::Network, MSG_NETWORK_ERROR)
    }

    /// The session is gone and a login redirect is under way.
    pub fn session_expired(status: u16) -> Self {
        Self {
            redirecting: true,
            status: Some(status),
            ..Self::new(RejectionKind::SessionInvalid, MSG_SESSION_EXPIRED)
        }
    }

    /// The request could not be built.
    pub fn invalid_request(reason: impl std::fmt::Display) -> Self {
        Self::new(
            RejectionKind::InvalidRequest,
            format!("{}: {}", MSG_REQUEST_FAILED, reason),
        )
    }

    /// Attach the HTTP status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Check if this failure means the user has to sign in again.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self.kind,
            RejectionKind::SessionInvalid | RejectionKind::Unauthorized
        )
    }
}

impl Serialize for ApiRejection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ApiRejection", 3)?;
        state.serialize_field("success", &false)?;
        state.serialize_field("message", &self.message)?;
        if self.redirecting {
            state.serialize_field("redirecting", &true)?;
        } else {
            state.serialize_field("data", &self.data)?;
        }
        state.end()
    }
}

/// Errors raised by a transport before any response arrives.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request exceeded its timeout.
    #[error("Request timed out")]
    Timeout,

    /// Could not connect to the backend.
    #[error("Connection error: {0}")]
    Connect(String),

    /// Any other failure sending the request or reading the body.
    #[error("Request failed: {0}")]
    Request(String),

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if e.is_builder() {
            TransportError::Build(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

/// Errors loading client configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the config file.
    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejection_serializes_with_null_data() {
        let rejection = ApiRejection::network();
        assert_eq!(
            serde_json::to_value(&rejection).unwrap(),
            json!({"success": false, "message": "network error", "data": null})
        );
    }

    #[test]
    fn test_session_rejection_serializes_redirecting() {
        let rejection = ApiRejection::session_expired(403);
        assert_eq!(
            serde_json::to_value(&rejection).unwrap(),
            json!({
                "success": false,
                "message": "session expired, please log in again",
                "redirecting": true
            })
        );
        assert!(rejection.is_auth_failure());
        assert_eq!(rejection.status, Some(403));
    }

    #[test]
    fn test_rejection_display_is_message() {
        let rejection = ApiRejection::new(RejectionKind::NotFound, MSG_NOT_FOUND);
        assert_eq!(rejection.to_string(), "resource not found");
    }
}
