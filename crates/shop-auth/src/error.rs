//! Authentication errors.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown role name.
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] shop_storage::StorageError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

