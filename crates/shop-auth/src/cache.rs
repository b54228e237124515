//! The single read/write/clear path for the cached user.

use crate::user::{CachedUser, Role};
use crate::AuthError;
use shop_storage::{KeyValueStore, SharedStore};

/// Storage key of the serialized user record.
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Storage key of the mirrored role.
pub const USER_ROLE_KEY: &str = "userRole";

/// Legacy token slot. Removed on clear, never written.
pub const TOKEN_KEY: &str = "token";

/// Accessor for the cached user record.
///
/// Both the navigation guard and the API client go through this type, so
/// the user record and its mirrored role slot never drift apart. Cloning
/// is cheap and shares the same underlying scopes.
///
/// # Example
///
/// ```rust,ignore
/// let cache = UserCache::new(persistent, session);
///
/// cache.write(Some(&CachedUser::new(42, Role::Merchant)))?;
/// assert!(cache.is_logged_in());
/// assert!(cache.check_permission(Role::Merchant));
///
/// cache.clear()?;
/// assert!(cache.read().is_none());
/// ```
#[derive(Clone)]
pub struct UserCache {
    persistent: SharedStore,
    session: SharedStore,
}

impl UserCache {
    /// Create a cache over a persistent scope and a session scope.
    pub fn new(persistent: SharedStore, session: SharedStore) -> Self {
        Self {
            persistent,
            session,
        }
    }

    /// Read the cached user.
    ///
    /// The literal strings `"undefined"` and `"null"`, and anything that
    /// fails to parse, count as absent and are evicted. A successful read
    /// mirrors the effective role into its own slot.
    pub fn read(&self) -> Option<CachedUser> {
        let raw = match self.persistent.get(CURRENT_USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read cached user");
                return None;
            }
        };

        if raw == "undefined" || raw == "null" {
            tracing::debug!(value = %raw, "evicting placeholder user entry");
            self.evict();
            return None;
        }

        match serde_json::from_str::<CachedUser>(&raw) {
            Ok(user) => {
                if let Err(e) = self.persistent.set(USER_ROLE_KEY, user.role().as_str()) {
                    tracing::warn!(error = %e, "failed to mirror user role");
                }
                Some(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "evicting unparseable user entry");
                self.evict();
                None
            }
        }
    }

    /// Store the user record. `None` leaves the cache untouched.
    pub fn write(&self, user: Option<&CachedUser>) -> Result<(), AuthError> {
        let Some(user) = user else {
            return Ok(());
        };
        self.persistent.set_json(CURRENT_USER_KEY, user)?;
        tracing::debug!(uid = ?user.uid, role = %user.role(), "cached user written");
        Ok(())
    }

    /// Remove the user record, the role slot and any token entries from
    /// both scopes. Safe to call on an already cleared cache.
    pub fn clear(&self) -> Result<(), AuthError> {
        self.persistent.remove(CURRENT_USER_KEY)?;
        self.persistent.remove(USER_ROLE_KEY)?;
        self.persistent.remove(TOKEN_KEY)?;
        self.session.remove(CURRENT_USER_KEY)?;
        self.session.remove(TOKEN_KEY)?;
        Ok(())
    }

    /// Check if the cached record carries a user id.
    pub fn is_logged_in(&self) -> bool {
        self.read().is_some_and(|user| user.is_signed_in())
    }

    /// The cached user, but only if it identifies a signed-in user.
    ///
    /// A parseable record without `uid` is evicted together with its
    /// role slot.
    pub fn signed_in_user(&self) -> Option<CachedUser> {
        let user = self.read()?;
        if user.is_signed_in() {
            Some(user)
        } else {
            tracing::debug!("evicting cached user without uid");
            self.evict();
            None
        }
    }

    /// Role of the cached user, if any.
    pub fn current_role(&self) -> Option<Role> {
        self.read().map(|user| user.role())
    }

    /// Check if a cached user exists and has exactly `role`.
    pub fn check_permission(&self, role: Role) -> bool {
        self.read().is_some_and(|user| user.role() == role)
    }

    fn evict(&self) {
        for key in [CURRENT_USER_KEY, USER_ROLE_KEY] {
            if let Err(e) = self.persistent.remove(key) {
                tracing::warn!(key, error = %e, "failed to evict cache entry");
            }
        }
    }
}

impl std::fmt::Debug for UserCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCache").finish_non_exhaustive()
    }
}
