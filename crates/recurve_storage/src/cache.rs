//! Cache layer trait and the default in-memory cache.

use crate::error::StorageResult;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

/// An in-memory layer consulted before the native backend.
///
/// Caches hold decoded values, not transport text. Whether anything is ever
/// evicted is up to the implementation; the facade only relies on the
/// operations below.
pub trait Cache {
    /// Looks up `key`, returning `None` on a miss.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be read.
    fn get(&self, key: &str) -> StorageResult<Option<Value>>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be written.
    fn set(&self, key: &str, value: Value) -> StorageResult<()>;

    /// Removes `key` if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be written.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Returns `true` if `key` is cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be read.
    fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Removes every entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be written.
    fn clear(&self) -> StorageResult<()>;

    /// Calls `f` with `(value, key)` for every entry, in the cache's own order.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be read.
    fn for_each(&self, f: &mut dyn FnMut(&Value, &str)) -> StorageResult<()>;
}

macro_rules! forward_cache {
    ($ptr:ident) => {
        impl<T: Cache + ?Sized> Cache for $ptr<T> {
            fn get(&self, key: &str) -> StorageResult<Option<Value>> {
                (**self).get(key)
            }

            fn set(&self, key: &str, value: Value) -> StorageResult<()> {
                (**self).set(key, value)
            }

            fn remove(&self, key: &str) -> StorageResult<()> {
                (**self).remove(key)
            }

            fn exists(&self, key: &str) -> StorageResult<bool> {
                (**self).exists(key)
            }

            fn clear(&self) -> StorageResult<()> {
                (**self).clear()
            }

            fn for_each(&self, f: &mut dyn FnMut(&Value, &str)) -> StorageResult<()> {
                (**self).for_each(f)
            }
        }
    };
}

forward_cache!(Rc);
forward_cache!(Arc);
forward_cache!(Box);

/// An unbounded in-memory cache.
///
/// Entries are iterated in key order. Nothing is evicted.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<BTreeMap<String, Value>>,
}

impl MemoryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> StorageResult<()> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.entries.read().contains_key(key))
    }

    fn clear(&self) -> StorageResult<()> {
        self.entries.write().clear();
        Ok(())
    }

    fn for_each(&self, f: &mut dyn FnMut(&Value, &str)) -> StorageResult<()> {
        // Snapshot so the callback may touch the cache.
        let snapshot: Vec<(String, Value)> = self
            .entries
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (key, value) in &snapshot {
            f(value, key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cache_set_then_get() {
        let cache = MemoryCache::new();
        cache.set("a", json!({"b": "c"})).unwrap();
        assert_eq!(cache.get("a").unwrap(), Some(json!({"b": "c"})));
    }

    #[test]
    fn cache_distinguishes_null_from_missing() {
        let cache = MemoryCache::new();
        cache.set("a", Value::Null).unwrap();
        assert_eq!(cache.get("a").unwrap(), Some(Value::Null));
        assert!(cache.exists("a").unwrap());
        assert_eq!(cache.get("b").unwrap(), None);
        assert!(!cache.exists("b").unwrap());
    }

    #[test]
    fn cache_remove() {
        let cache = MemoryCache::new();
        cache.set("a", json!(1)).unwrap();
        cache.remove("a").unwrap();
        assert!(!cache.exists("a").unwrap());
        cache.remove("a").unwrap();
    }

    #[test]
    fn cache_clear() {
        let cache = MemoryCache::new();
        cache.set("a", json!(1)).unwrap();
        cache.set("b", json!(2)).unwrap();
        cache.clear().unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn cache_for_each_visits_in_key_order() {
        let cache = MemoryCache::new();
        cache.set("b", json!(2)).unwrap();
        cache.set("a", json!(1)).unwrap();

        let mut seen = Vec::new();
        cache
            .for_each(&mut |value: &Value, key: &str| seen.push((key.to_string(), value.clone())))
            .unwrap();

        assert_eq!(
            seen,
            vec![("a".to_string(), json!(1)), ("b".to_string(), json!(2))]
        );
    }

    #[test]
    fn cache_for_each_allows_reentrant_writes() {
        let cache = MemoryCache::new();
        cache.set("a", json!(1)).unwrap();
        cache
            .for_each(&mut |_: &Value, key: &str| cache.remove(key).unwrap())
            .unwrap();
        assert!(cache.is_empty());
    }
}
