//! Browser-style key-value storage for the storefront client.
//!
//! Models the two storage scopes a web client has access to (persistent
//! and session-scoped) behind a single object-safe trait, so the user
//! cache, the router and the API client all share one view of state.
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_storage::{KeyValueStore, MemoryStore, SharedStore};
//! use std::sync::Arc;
//!
//! let store: SharedStore = Arc::new(MemoryStore::new());
//!
//! // Raw string slots
//! store.set("userRole", "MERCHANT")?;
//! assert_eq!(store.get("userRole")?.as_deref(), Some("MERCHANT"));
//!
//! // Typed JSON slots
//! store.set_json("prefs", &prefs)?;
//! let prefs: Option<Prefs> = store.get_json("prefs")?;
//!
//! // Removing twice is fine
//! store.remove("userRole")?;
//! store.remove("userRole")?;
//! ```

mod error;
mod file;
mod kv;

pub use error::StorageError;
pub use file::FileStore;
pub use kv::{KeyValueStore, MemoryStore, SharedStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FileStore, KeyValueStore, MemoryStore, SharedStore, StorageError};
}
