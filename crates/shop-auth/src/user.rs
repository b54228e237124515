//! User types.

use crate::AuthError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Storefront role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular customer.
    #[default]
    Customer,
    /// Merchant who manages goods and orders.
    Merchant,
}

impl Role {
    /// Get role as its stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "CUSTOMER",
            Role::Merchant => "MERCHANT",
        }
    }

    /// Check if this is the merchant role.
    pub fn is_merchant(&self) -> bool {
        matches!(self, Role::Merchant)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CUSTOMER" => Ok(Role::Customer),
            "MERCHANT" => Ok(Role::Merchant),
            other => Err(AuthError::UnknownRole(other.to_string())),
        }
    }
}

/// The user record cached on the client after login or a profile fetch.
///
/// Only `uid` and `role` are interpreted here. Every other profile field
/// (nickname, email, avatar, ...) is carried through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CachedUser {
    /// Backend user id. A non-null value marks the user as signed in.
    #[serde(default)]
    pub uid: Option<i64>,
    /// Role as stored; `None` means the backend did not send one.
    #[serde(default)]
    pub role: Option<Role>,
    /// Remaining profile fields.
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl CachedUser {
    /// Create a record for a signed-in user.
    pub fn new(uid: i64, role: Role) -> Self {
        Self {
            uid: Some(uid),
            role: Some(role),
            profile: Map::new(),
        }
    }

    /// Attach an opaque profile field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.profile.insert(key.into(), value.into());
        self
    }

    /// Parse a user record from a JSON value.
    pub fn from_value(value: Value) -> Result<Self, AuthError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Effective role, defaulting to customer.
    pub fn role(&self) -> Role {
        self.role.unwrap_or_default()
    }

    /// Check if the record identifies a signed-in user.
    pub fn is_signed_in(&self) -> bool {
        self.uid.is_some()
    }

    /// Check if user has the given role.
    pub fn has_role(&self, role: Role) -> bool {
        self.role() == role
    }

    /// Display name from the profile, if present.
    pub fn nickname(&self) -> Option<&str> {
        self.profile.get("nickname").and_then(Value::as_str)
    }
}
