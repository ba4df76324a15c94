//! In-memory native backend for testing.

use crate::backend::NativeStorage;
use crate::error::StorageResult;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// An in-memory string store with the native backend contract.
///
/// This backend is suitable for:
/// - Unit tests
/// - Mock providers standing in for browser storage
/// - Hosts with no web storage at all
///
/// # Example
///
/// ```rust
/// use recurve_storage::{InMemoryNative, NativeStorage};
///
/// let native = InMemoryNative::new();
/// native.set_item("a", "1").unwrap();
/// assert_eq!(native.get_item("a").unwrap().as_deref(), Some("1"));
/// assert_eq!(native.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryNative {
    items: RwLock<BTreeMap<String, String>>,
}

impl InMemoryNative {
    /// Creates a new empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend with pre-existing raw entries.
    ///
    /// Useful for testing reads of values written by someone else.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            items: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl NativeStorage for InMemoryNative {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.items.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.items.write().remove(key);
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.items.write().clear();
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.items.read().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_is_empty() {
        let native = InMemoryNative::new();
        assert!(native.is_empty());
        assert!(native.keys().unwrap().is_empty());
    }

    #[test]
    fn memory_set_then_get() {
        let native = InMemoryNative::new();
        native.set_item("a", "b").unwrap();
        assert_eq!(native.get_item("a").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn memory_get_missing_is_none() {
        let native = InMemoryNative::new();
        assert_eq!(native.get_item("missing").unwrap(), None);
    }

    #[test]
    fn memory_set_overwrites() {
        let native = InMemoryNative::new();
        native.set_item("a", "1").unwrap();
        native.set_item("a", "2").unwrap();
        assert_eq!(native.get_item("a").unwrap().as_deref(), Some("2"));
        assert_eq!(native.len(), 1);
    }

    #[test]
    fn memory_remove_missing_succeeds() {
        let native = InMemoryNative::new();
        assert!(native.remove_item("missing").is_ok());
    }

    #[test]
    fn memory_clear() {
        let native = InMemoryNative::with_entries([("a", "1"), ("b", "2")]);
        assert_eq!(native.len(), 2);
        native.clear().unwrap();
        assert!(native.is_empty());
    }

    #[test]
    fn memory_keys_are_listed_once() {
        let native = InMemoryNative::with_entries([("b", "2"), ("a", "1")]);
        assert_eq!(native.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn memory_keys_keep_whitespace() {
        let native = InMemoryNative::new();
        native.set_item(" a ", " b ").unwrap();
        assert_eq!(native.get_item(" a ").unwrap().as_deref(), Some(" b "));
        assert_eq!(native.get_item("a").unwrap(), None);
    }
}
