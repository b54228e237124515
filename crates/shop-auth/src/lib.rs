//! Authentication state for the storefront client.
//!
//! Provides the cached user record, storefront roles, and the single
//! accessor through which every component reads and mutates them.

mod cache;
mod error;
mod user;

pub use cache::{UserCache, CURRENT_USER_KEY, TOKEN_KEY, USER_ROLE_KEY};
pub use error::AuthError;
pub use user::{CachedUser, Role};
