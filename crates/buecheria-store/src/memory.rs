//! In-memory store.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::{KeyValueStore, StoreError};

/// A [`KeyValueStore`] backed by a `HashMap`.
///
/// Cloning a `MemoryStore` gives another handle to the SAME map, so a
/// test can keep one clone to inspect what a client wrote through the
/// other.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        // A poisoned lock only means another thread panicked mid-write;
        // the map itself is still a valid map of strings.
        let entries =
            self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries =
            self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries =
            self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key_returns_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("access_token").unwrap(), None);
    }

    #[test]
    fn test_set_then_get_returns_value() {
        let store = MemoryStore::new();
        store.set("username", "admin").unwrap();
        assert_eq!(store.get("username").unwrap().as_deref(), Some("admin"));
    }

    #[test]
    fn test_set_overwrites_previous_value() {
        let store = MemoryStore::new();
        store.set("role", "Member").unwrap();
        store.set("role", "Admin").unwrap();
        assert_eq!(store.get("role").unwrap().as_deref(), Some("Admin"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let store = MemoryStore::new();
        store.remove("access_token").expect("removing nothing is fine");
        assert!(store.is_empty());
    }

    #[test]
    fn test_clone_shares_entries() {
        // Both handles point at the same map.
        let store = MemoryStore::new();
        let observer = store.clone();

        store.set("access_token", "abc123").unwrap();
        assert_eq!(
            observer.get("access_token").unwrap().as_deref(),
            Some("abc123")
        );

        observer.remove("access_token").unwrap();
        assert!(store.is_empty());
    }
}
