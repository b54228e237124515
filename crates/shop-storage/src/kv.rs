//! Key-value storage trait and the in-memory scope.

use crate::StorageError;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A string-keyed, string-valued storage scope.
///
/// Mirrors the contract of browser storage: values are opaque strings and
/// removing a key that is not present succeeds.
pub trait KeyValueStore: Send + Sync {
    /// Get the raw value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Succeeds when the key is absent.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// List all keys currently present.
    fn keys(&self) -> Result<Vec<String>, StorageError>;

    /// Check if a key is present.
    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}

/// A storage scope shared between components.
pub type SharedStore = Arc<dyn KeyValueStore>;

impl dyn KeyValueStore {
    /// Get a value and parse it as JSON.
    ///
    /// Returns `None` if the key doesn't exist.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Serialize a value as JSON and store it.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}

/// Process-local storage scope.
///
/// Stands in for session-scoped browser storage, and for persistent
/// storage in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Wrap the store for sharing.
    pub fn shared(self) -> SharedStore {
        Arc::new(self)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_memory_store_set_get() {
        let store = MemoryStore::new();
        store.set("userRole", "MERCHANT").unwrap();
        assert_eq!(store.get("userRole").unwrap().as_deref(), Some("MERCHANT"));
        assert!(store.contains("userRole").unwrap());
    }

    #[test]
    fn test_memory_store_get_missing() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing").unwrap(), None);
        assert!(!store.contains("missing").unwrap());
    }

    #[test]
    fn test_memory_store_remove_is_idempotent() {
        let store = MemoryStore::with_entries([("token", "abc")]);
        store.remove("token").unwrap();
        store.remove("token").unwrap();
        assert_eq!(store.get("token").unwrap(), None);
    }

    #[test]
    fn test_memory_store_keys_sorted() {
        let store = MemoryStore::with_entries([("b", "2"), ("a", "1")]);
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_json_helpers() {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Prefs {
            page_size: u32,
        }

        let store: SharedStore = MemoryStore::new().shared();
        store.set_json("prefs", &Prefs { page_size: 20 }).unwrap();
        assert_eq!(store.get("prefs").unwrap().as_deref(), Some(r#"{"page_size":20}"#));

        let prefs: Option<Prefs> = store.get_json("prefs").unwrap();
        assert_eq!(prefs, Some(Prefs { page_size: 20 }));
    }

    #[test]
    fn test_get_json_invalid() {
        let store: SharedStore = MemoryStore::with_entries([("prefs", "{oops")]).shared();
        let result: Result<Option<serde_json::Value>, _> = store.get_json("prefs");
        assert!(matches!(result, Err(StorageError::Serialize(_))));
    }
}
