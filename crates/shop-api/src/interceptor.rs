//! Request and response interception, as pure functions.
//!
//! Nothing here touches storage or navigation. Failures are classified
//! into a rejection plus an optional [`SessionEffect`] effect, which the
//! client applies.

use crate::envelope::{truthy, Envelope};
use crate::error::{
    MSG_FORBIDDEN, MSG_NOT_FOUND, MSG_REQUEST_FAILED, MSG_SERVER_ERROR, MSG_SESSION_EXPIRED,
};
use crate::request::ApiRequest;
use crate::{ApiRejection, RejectionKind};
use http::StatusCode;
use serde_json::Value;
use shop_router::{login_redirect_href, Location};

/// Query parameter stamped onto read requests.
pub const CACHE_BUST_PARAM: &str = "_t";

/// `errorType` the backend sends when the session is no longer valid.
pub const SESSION_INVALID: &str = "SESSION_INVALID";

/// Stamp a read request with the current time so intermediate caches
/// never answer it. Other methods are left alone.
pub fn stamp_request(request: &mut ApiRequest, now_millis: i64) {
    if request.method.is_read() {
        request.set_query(CACHE_BUST_PARAM, now_millis);
    }
}

/// Normalize a 2xx body into an envelope.
pub fn normalize_success(body: Value) -> Envelope {
    Envelope::from_body(body)
}

/// A call that did not produce a 2xx response.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// Nothing came back: connection failure or timeout.
    NoResponse {
        /// Transport-level description, for logs only.
        reason: String,
    },
    /// The backend answered with a non-2xx status.
    Status {
        /// HTTP status code.
        status: u16,
        /// Parsed error body.
        body: Value,
    },
}

/// What the classifier needs to know about the client's surroundings.
#[derive(Debug, Clone)]
pub struct FailureContext {
    /// The page the user is on.
    pub location: Location,
    /// Whether the user cache holds a signed-in user.
    pub logged_in: bool,
}

/// Effect of a failure that ended the session: clear the user cache, then
/// navigate to `redirect` if set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEffect {
    /// Login href preserving the current page, unless already on login.
    pub redirect: Option<String>,
}

impl SessionEffect {
    /// Effect for a session lost while on `location`.
    pub fn at(location: &Location) -> Self {
        Self {
            redirect: login_redirect_href(location, None),
        }
    }
}

/// Outcome of classifying a failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    /// The rejection handed back to the caller.
    pub rejection: ApiRejection,
    /// Side effect for the client to apply, if any.
    pub effect: Option<SessionEffect>,
}

/// Classify a failed call.
///
/// Evaluated in order: no response; 401/403 carrying the session-invalid
/// marker; then by status. A non-empty string `message` in the error body
/// replaces the default message of the status branches.
pub fn classify_failure(failure: &Failure, ctx: &FailureContext) -> Classified {
    let (status, body) = match failure {
        Failure::NoResponse { .. } => {
            return Classified {
                rejection: ApiRejection::network(),
                effect: None,
            }
        }
        Failure::Status { status, body } => (*status, body),
    };

    let code = StatusCode::from_u16(status).ok();
    let auth_status = matches!(code, Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN));

    if auth_status && is_session_invalid(body) {
        return Classified {
            rejection: ApiRejection::session_expired(status),
            effect: Some(SessionEffect::at(&ctx.location)),
        };
    }

    let (kind, default_message, effect) = match code {
        Some(StatusCode::UNAUTHORIZED) => (
            RejectionKind::Unauthorized,
            MSG_SESSION_EXPIRED,
            Some(SessionEffect::at(&ctx.location)),
        ),
        Some(StatusCode::FORBIDDEN) => {
            let effect = (!ctx.logged_in).then(|| SessionEffect::at(&ctx.location));
            (RejectionKind::Forbidden, MSG_FORBIDDEN, effect)
        }
        Some(StatusCode::NOT_FOUND) => (RejectionKind::NotFound, MSG_NOT_FOUND, None),
        _ if status >= 500 => (RejectionKind::Server, MSG_SERVER_ERROR, None),
        _ => (RejectionKind::Status, MSG_REQUEST_FAILED, None),
    };

    let message = body_message(body).unwrap_or(default_message);

    Classified {
        rejection: ApiRejection::new(kind, message).with_status(status),
        effect,
    }
}

/// Check an error body for the session-invalid marker.
pub fn is_session_invalid(body: &Value) -> bool {
    body.get("errorType").and_then(Value::as_str) == Some(SESSION_INVALID)
}

/// Backend-supplied message of an error body, if usable.
fn body_message(body: &Value) -> Option<&str> {
    let message = body.as_object()?.get("message")?;
    if !truthy(message) {
        return None;
    }
    message.as_str()
}
