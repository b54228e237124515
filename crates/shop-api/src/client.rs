//! The session-aware API client.

use crate::config::ApiConfig;
use crate::cookies::StoredCookies;
use crate::envelope::Envelope;
use crate::error::TransportError;
use crate::interceptor::{
    classify_failure, normalize_success, stamp_request, Failure, FailureContext, SessionEffect,
};
use crate::request::ApiRequest;
use crate::transport::{ReqwestTransport, Transport};
use crate::ApiRejection;
use serde::Serialize;
use shop_auth::{Role, UserCache};
use shop_router::{login_redirect_href, Navigator};
use std::fmt;
use std::sync::Arc;

/// `reason` value attached when the session is ended explicitly.
pub const REASON_SESSION_EXPIRED: &str = "session_expired";

/// Words in a rejection message that point at a login problem.
const LOGIN_HINTS: &[&str] = &["permission", "log in", "login", "auth"];

/// Client for the storefront backend.
///
/// Every call is stamped, sent through the [`Transport`], and its outcome
/// normalized. Failures that end the session clear the [`UserCache`] and
/// send the [`Navigator`] to the login page before the caller sees the
/// rejection.
#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    transport: Arc<dyn Transport>,
    cache: UserCache,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a client over an existing transport.
    pub fn new(
        config: ApiConfig,
        transport: Arc<dyn Transport>,
        cache: UserCache,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            config,
            transport,
            cache,
            navigator,
        }
    }

    /// Create a client that talks HTTP.
    ///
    /// With `cookies`, the session cookie survives across processes.
    pub fn with_reqwest(
        config: ApiConfig,
        cache: UserCache,
        navigator: Arc<dyn Navigator>,
        cookies: Option<Arc<StoredCookies>>,
    ) -> Result<Self, TransportError> {
        let transport = match cookies {
            Some(jar) => ReqwestTransport::with_cookies(config.clone(), jar)?,
            None => ReqwestTransport::new(config.clone())?,
        };
        Ok(Self::new(config, Arc::new(transport), cache, navigator))
    }

    /// The connection settings.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// The user cache this client clears on session loss.
    pub fn cache(&self) -> &UserCache {
        &self.cache
    }

    /// The navigator this client redirects.
    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// Send a request through the interception pipeline.
    pub async fn execute(&self, mut request: ApiRequest) -> Result<Envelope, ApiRejection> {
        stamp_request(&mut request, chrono::Utc::now().timestamp_millis());
        tracing::debug!(method = request.method.as_str(), path = %request.path, "API request");

        let failure = match self.transport.send(&request).await {
            Ok(response) if response.is_success() => {
                tracing::debug!(path = %request.path, status = response.status, "API response");
                return Ok(normalize_success(response.body_value()));
            }
            Ok(response) => {
                tracing::error!(path = %request.path, status = response.status, "API error response");
                Failure::Status {
                    status: response.status,
                    body: response.body_value(),
                }
            }
            Err(e) => {
                tracing::error!(path = %request.path, error = %e, "API request failed");
                Failure::NoResponse {
                    reason: e.to_string(),
                }
            }
        };

        let ctx = FailureContext {
            location: self.navigator.location(),
            logged_in: self.cache.is_logged_in(),
        };
        let classified = classify_failure(&failure, &ctx);
        if let Some(effect) = &classified.effect {
            self.apply(effect);
        }
        Err(classified.rejection)
    }

    /// Clear the cache and follow the effect's redirect.
    ///
    /// Safe to apply more than once: clearing is idempotent and the
    /// redirect is skipped when the navigator is already there.
    fn apply(&self, effect: &SessionEffect) {
        tracing::warn!(redirect = ?effect.redirect, "Session ended, clearing user cache");
        self.clear_cache();
        if let Some(href) = &effect.redirect {
            self.redirect(href);
        }
    }

    fn clear_cache(&self) {
        if let Err(e) = self.cache.clear() {
            tracing::warn!(error = %e, "Failed to clear user cache");
        }
    }

    fn redirect(&self, href: &str) {
        if self.navigator.location().full_path() != href {
            self.navigator.assign(href);
        }
    }

    /// GET a path.
    pub async fn get(&self, path: impl Into<String>) -> Result<Envelope, ApiRejection> {
        self.execute(ApiRequest::get(path)).await
    }

    /// POST a path with no body.
    pub async fn post(&self, path: impl Into<String>) -> Result<Envelope, ApiRejection> {
        self.execute(ApiRequest::post(path)).await
    }

    /// POST a JSON body.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: impl Into<String>,
        body: &T,
    ) -> Result<Envelope, ApiRejection> {
        self.execute(ApiRequest::post(path).json(body)?).await
    }

    /// PUT a JSON body.
    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: impl Into<String>,
        body: &T,
    ) -> Result<Envelope, ApiRejection> {
        self.execute(ApiRequest::put(path).json(body)?).await
    }

    /// DELETE a path.
    pub async fn delete(&self, path: impl Into<String>) -> Result<Envelope, ApiRejection> {
        self.execute(ApiRequest::delete(path)).await
    }

    // -------------------------------------------------------------------------
    // Session helpers
    // -------------------------------------------------------------------------

    /// Check if the cached user has exactly `role`.
    pub fn check_permission(&self, role: Role) -> bool {
        self.cache.check_permission(role)
    }

    /// Ask the backend whether the session is alive.
    pub async fn check_session(&self) -> Result<Envelope, ApiRejection> {
        let result = self.get("/auth/session-check").await;
        match &result {
            Ok(envelope) => tracing::debug!(success = envelope.success(), "Session check"),
            Err(e) => tracing::error!(error = %e, "Session check failed"),
        }
        result
    }

    /// Combined local and backend login check.
    ///
    /// False without a cached user. A failed session check clears the
    /// cache.
    pub async fn check_login_status(&self) -> bool {
        if self.cache.read().is_none() {
            return false;
        }
        match self.check_session().await {
            Ok(envelope) => envelope.success(),
            Err(e) => {
                tracing::warn!(error = %e, "Login status check failed, clearing user cache");
                self.clear_cache();
                false
            }
        }
    }

    /// Redirect to login unless a signed-in user is cached.
    pub fn check_login_and_redirect(&self) -> bool {
        if self.cache.is_logged_in() {
            return true;
        }
        self.clear_cache();
        if let Some(href) = login_redirect_href(&self.navigator.location(), None) {
            self.redirect(&href);
        }
        false
    }

    /// Run the login check when a rejection looks like an auth problem.
    ///
    /// Returns whether the message matched.
    pub fn handle_permission_error(&self, error: &ApiRejection) -> bool {
        if !mentions_login(&error.message) {
            return false;
        }
        self.check_login_and_redirect();
        true
    }

    /// End the session explicitly and go to login with
    /// `reason=session_expired`.
    pub fn handle_session_expired(&self) {
        tracing::warn!("Session expired, clearing user cache");
        self.clear_cache();
        let location = self.navigator.location();
        if let Some(href) = login_redirect_href(&location, Some(REASON_SESSION_EXPIRED)) {
            self.redirect(&href);
        }
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

fn mentions_login(message: &str) -> bool {
    let message = message.to_lowercase();
    LOGIN_HINTS.iter().any(|hint| message.contains(hint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ScriptedTransport;
    use crate::error::MSG_SESSION_EXPIRED;
    use crate::RejectionKind;
    use serde_json::{json, Value};
    use shop_auth::{CachedUser, CURRENT_USER_KEY, USER_ROLE_KEY};
    use shop_router::MemoryNavigator;
    use shop_storage::{MemoryStore, SharedStore};

    struct Harness {
        client: ApiClient,
        transport: Arc<ScriptedTransport>,
        navigator: Arc<MemoryNavigator>,
        persistent: SharedStore,
    }

    fn harness(path: &str, user: Option<CachedUser>, transport: ScriptedTransport) -> Harness {
        let persistent = MemoryStore::new().shared();
        let cache = UserCache::new(persistent.clone(), MemoryStore::new().shared());
        cache.write(user.as_ref()).unwrap();
        let navigator = Arc::new(MemoryNavigator::at(path));
        let transport = Arc::new(transport);
        let client = ApiClient::new(
            ApiConfig::default(),
            transport.clone(),
            cache,
            navigator.clone(),
        );
        Harness {
            client,
            transport,
            navigator,
            persistent,
        }
    }

    fn customer() -> CachedUser {
        CachedUser::new(7, Role::Customer).with_field("nickname", "alice")
    }

    // === Execute ===

    #[tokio::test]
    async fn test_execute_stamps_get_and_wraps_body() {
        let h = harness("/", None, ScriptedTransport::new().respond_json(200, json!([1, 2])));
        let envelope = h.client.get("/goods").await.unwrap();
        assert_eq!(envelope.data(), Some(&json!([1, 2])));
        assert_eq!(envelope.message(), Some("request succeeded"));

        let sent = h.transport.requests();
        let stamp: i64 = sent[0].query_value("_t").unwrap().parse().unwrap();
        assert!(stamp > 0);
    }

    #[tokio::test]
    async fn test_execute_does_not_stamp_post() {
        let h = harness(
            "/cart",
            Some(customer()),
            ScriptedTransport::new().respond_json(200, json!({"success": true})),
        );
        h.client
            .post_json("/cart/add", &json!({"gid": 1, "quantity": 2}))
            .await
            .unwrap();
        assert_eq!(h.transport.requests()[0].query_value("_t"), None);
    }

    #[tokio::test]
    async fn test_execute_network_error() {
        let h = harness(
            "/cart",
            Some(customer()),
            ScriptedTransport::new().fail(TransportError::Timeout),
        );
        let err = h.client.get("/cart").await.unwrap_err();
        assert_eq!(err.kind, RejectionKind::Network);
        assert_eq!(err.message, "network error");
        assert!(h.client.cache().is_logged_in());
        assert!(h.navigator.history().is_empty());
    }

    #[tokio::test]
    async fn test_session_invalid_clears_and_redirects() {
        let h = harness(
            "/cart?x=1",
            Some(customer()),
            ScriptedTransport::new()
                .respond_json(403, json!({"success": false, "errorType": "SESSION_INVALID"})),
        );
        let err = h.client.get("/cart").await.unwrap_err();
        assert!(err.redirecting);
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"success": false, "message": MSG_SESSION_EXPIRED, "redirecting": true})
        );
        assert!(h.client.cache().read().is_none());
        assert!(!h.persistent.contains(CURRENT_USER_KEY).unwrap());
        assert!(!h.persistent.contains(USER_ROLE_KEY).unwrap());
        assert_eq!(h.navigator.history(), vec!["/login?redirect=%2Fcart%3Fx%3D1"]);
    }

    #[tokio::test]
    async fn test_session_invalid_on_login_page_does_not_redirect() {
        let h = harness(
            "/login",
            Some(customer()),
            ScriptedTransport::new().respond_json(401, json!({"errorType": "SESSION_INVALID"})),
        );
        h.client.get("/auth/current").await.unwrap_err();
        assert!(h.client.cache().read().is_none());
        assert!(h.navigator.history().is_empty());
    }

    #[tokio::test]
    async fn test_forbidden_with_session_keeps_cache() {
        let h = harness(
            "/merchant",
            Some(customer()),
            ScriptedTransport::new().respond_json(403, json!({"success": false})),
        );
        let err = h.client.get("/merchant/stats").await.unwrap_err();
        assert_eq!(err.message, "insufficient permission");
        assert_eq!(err.data, Value::Null);
        assert!(h.client.cache().is_logged_in());
        assert!(h.navigator.history().is_empty());
    }

    #[tokio::test]
    async fn test_backend_message_is_kept() {
        let h = harness(
            "/login",
            None,
            ScriptedTransport::new().respond_json(
                400,
                json!({"success": false, "message": "wrong password", "errorType": "LOGIN_ERROR"}),
            ),
        );
        let err = h
            .client
            .post_json("/auth/login/name", &json!({"nickname": "a", "password": "b"}))
            .await
            .unwrap_err();
        assert_eq!(err.message, "wrong password");
        assert_eq!(err.status, Some(400));
    }

    // === Helpers ===

    #[tokio::test]
    async fn test_check_login_status_without_user() {
        let h = harness("/", None, ScriptedTransport::new());
        assert!(!h.client.check_login_status().await);
        assert!(h.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_check_login_status_success() {
        let h = harness(
            "/",
            Some(customer()),
            ScriptedTransport::new().respond_json(200, json!({"success": true, "sessionValid": true})),
        );
        assert!(h.client.check_login_status().await);
        assert_eq!(h.transport.requests()[0].path, "/auth/session-check");
    }

    #[tokio::test]
    async fn test_check_login_status_failure_clears() {
        let h = harness(
            "/",
            Some(customer()),
            ScriptedTransport::new().fail(TransportError::Connect("refused".into())),
        );
        assert!(!h.client.check_login_status().await);
        assert!(h.client.cache().read().is_none());
    }

    #[test]
    fn test_check_login_and_redirect() {
        let h = harness("/profile", None, ScriptedTransport::new());
        assert!(!h.client.check_login_and_redirect());
        assert_eq!(h.navigator.history(), vec!["/login?redirect=%2Fprofile"]);

        let h = harness("/profile", Some(customer()), ScriptedTransport::new());
        assert!(h.client.check_login_and_redirect());
        assert!(h.navigator.history().is_empty());
    }

    #[test]
    fn test_handle_permission_error() {
        let h = harness("/merchant", None, ScriptedTransport::new());
        let forbidden = ApiRejection::new(RejectionKind::Forbidden, "insufficient permission");
        assert!(h.client.handle_permission_error(&forbidden));
        assert_eq!(h.navigator.history(), vec!["/login?redirect=%2Fmerchant"]);

        let other = ApiRejection::new(RejectionKind::Backend, "out of stock");
        assert!(!h.client.handle_permission_error(&other));
    }

    #[test]
    fn test_handle_session_expired() {
        let h = harness("/order/5", Some(customer()), ScriptedTransport::new());
        h.client.handle_session_expired();
        assert!(h.client.cache().read().is_none());
        assert_eq!(
            h.navigator.history(),
            vec!["/login?redirect=%2Forder%2F5&reason=session_expired"]
        );

        // Second call lands on the login page and stays put.
        h.client.handle_session_expired();
        assert_eq!(h.navigator.history().len(), 1);
    }

    #[test]
    fn test_check_permission() {
        let h = harness("/", Some(CachedUser::new(1, Role::Merchant)), ScriptedTransport::new());
        assert!(h.client.check_permission(Role::Merchant));
        assert!(!h.client.check_permission(Role::Customer));
    }

    #[test]
    fn test_mentions_login() {
        assert!(mentions_login("Please LOG IN first"));
        assert!(mentions_login("authentication required"));
        assert!(!mentions_login("resource not found"));
    }
}
