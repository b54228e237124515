//! Storage error types.

use thiserror::Error;

/// Errors that can occur when using a storage scope.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read or write the backing file.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize or parse a value.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The store lock was poisoned by a panicking writer.
    #[error("Store lock poisoned: {0}")]
    Poisoned(String),

    /// The backing file exists but is not a JSON object of strings.
    #[error("Corrupt store file: {0}")]
    Corrupt(String),
}
