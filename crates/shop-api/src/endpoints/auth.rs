//! Authentication and account endpoints (`/auth`).

use crate::{ApiClient, ApiRejection, ApiRequest, Envelope};
use serde::{Deserialize, Serialize};
use shop_auth::CachedUser;

/// Login by nickname.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameCredentials {
    pub nickname: String,
    pub password: String,
}

/// Login by email address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailCredentials {
    pub email: String,
    pub password: String,
}

/// Endpoints under `/auth`.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn login_by_name(&self, credentials: &NameCredentials) -> Result<Envelope, ApiRejection> {
        self.client.post_json("/auth/login/name", credentials).await
    }

    pub async fn login_by_email(
        &self,
        credentials: &EmailCredentials,
    ) -> Result<Envelope, ApiRejection> {
        self.client.post_json("/auth/login/email", credentials).await
    }

    /// Register a new account. `user` is the backend's user shape.
    pub async fn register<T: Serialize + ?Sized>(&self, user: &T) -> Result<Envelope, ApiRejection> {
        self.client.post_json("/auth/register", user).await
    }

    pub async fn logout(&self) -> Result<Envelope, ApiRejection> {
        self.client.post("/auth/logout").await
    }

    /// The user bound to the backend session.
    pub async fn current_user(&self) -> Result<Envelope, ApiRejection> {
        self.client.get("/auth/current").await
    }

    pub async fn check_nickname(&self, nickname: &str) -> Result<Envelope, ApiRejection> {
        self.client
            .execute(ApiRequest::get("/auth/check-nickname").query("nickname", nickname))
            .await
    }

    pub async fn check_email(&self, email: &str) -> Result<Envelope, ApiRejection> {
        self.client
            .execute(ApiRequest::get("/auth/check-email").query("email", email))
            .await
    }

    pub async fn update_profile<T: Serialize + ?Sized>(
        &self,
        user: &T,
    ) -> Result<Envelope, ApiRejection> {
        self.client.put_json("/auth/profile", user).await
    }

    pub async fn debug_session(&self) -> Result<Envelope, ApiRejection> {
        self.client.get("/auth/debug-session").await
    }

    pub async fn session_check(&self) -> Result<Envelope, ApiRejection> {
        self.client.get("/auth/session-check").await
    }

    pub async fn session_expired(&self) -> Result<Envelope, ApiRejection> {
        self.client.get("/auth/session-expired").await
    }

    /// Upgrade the signed-in customer to a merchant account.
    pub async fn become_merchant(&self) -> Result<Envelope, ApiRejection> {
        self.client.post("/auth/become-merchant").await
    }

    pub async fn delete_account(&self) -> Result<Envelope, ApiRejection> {
        self.client.post("/auth/delete-account").await
    }

    /// Public profile of a merchant.
    pub async fn merchant_by_id(&self, merchant_id: i64) -> Result<Envelope, ApiRejection> {
        self.client
            .get(format!("/auth/merchant/{}", merchant_id))
            .await
    }
}

/// The `user` object of a login, current-user or session-check response,
/// ready for [`UserCache::write`](shop_auth::UserCache::write).
pub fn user_from_login(envelope: &Envelope) -> Option<CachedUser> {
    let user = envelope.get("user")?.clone();
    match CachedUser::from_value(user) {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed user in response");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::testing::{client, sent};
    use crate::RequestBody;
    use serde_json::json;
    use shop_auth::Role;

    #[tokio::test]
    async fn test_login_by_name_body() {
        let (client, transport) = client(1);
        let credentials = NameCredentials {
            nickname: "alice".into(),
            password: "secret".into(),
        };
        client.auth().login_by_name(&credentials).await.unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.path, "/auth/login/name");
        assert_eq!(
            request.body,
            RequestBody::Json(json!({"nickname": "alice", "password": "secret"}))
        );
    }

    #[tokio::test]
    async fn test_auth_paths() {
        let (client, transport) = client(6);
        let auth = client.auth();
        auth.logout().await.unwrap();
        auth.current_user().await.unwrap();
        auth.check_nickname("bob").await.unwrap();
        auth.become_merchant().await.unwrap();
        auth.merchant_by_id(12).await.unwrap();
        auth.delete_account().await.unwrap();

        assert_eq!(
            sent(&transport),
            vec![
                ("POST".into(), "/auth/logout".into()),
                ("GET".into(), "/auth/current".into()),
                ("GET".into(), "/auth/check-nickname".into()),
                ("POST".into(), "/auth/become-merchant".into()),
                ("GET".into(), "/auth/merchant/12".into()),
                ("POST".into(), "/auth/delete-account".into()),
            ]
        );
        assert_eq!(transport.requests()[2].query_value("nickname"), Some("bob"));
    }

    #[test]
    fn test_user_from_login() {
        let envelope = Envelope::from_body(json!({
            "success": true,
            "message": "logged in",
            "user": {"uid": 3, "nickname": "alice", "role": "MERCHANT"},
            "sessionCreated": true
        }));
        let user = user_from_login(&envelope).unwrap();
        assert_eq!(user.uid, Some(3));
        assert_eq!(user.role(), Role::Merchant);
        assert_eq!(user.nickname(), Some("alice"));
    }

    #[test]
    fn test_user_from_login_missing_or_malformed() {
        let envelope = Envelope::from_body(json!({"success": true}));
        assert!(user_from_login(&envelope).is_none());

        let envelope = Envelope::from_body(json!({"success": true, "user": "alice"}));
        assert!(user_from_login(&envelope).is_none());
    }
}
