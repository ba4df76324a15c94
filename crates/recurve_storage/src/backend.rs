//! Native backend trait definition.

use crate::error::StorageResult;
use std::rc::Rc;
use std::sync::Arc;

/// A browser-style string key/value store.
///
/// This is the contract of `window.localStorage` and `window.sessionStorage`:
/// values are plain strings and the store knows nothing about how they were
/// encoded. The storage facade owns all value interpretation.
///
/// # Invariants
///
/// - `get_item` returns exactly the string last passed to `set_item` for the key
/// - `remove_item` on a missing key succeeds
/// - `keys` lists every stored key exactly once
///
/// Any method may fail; `set_item` in particular fails when the store exists
/// but refuses writes (private browsing, exhausted quota).
pub trait NativeStorage {
    /// Reads the raw string stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Writes a raw string under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key` if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// Removes every key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn clear(&self) -> StorageResult<()>;

    /// Lists all stored keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be enumerated.
    fn keys(&self) -> StorageResult<Vec<String>>;
}

macro_rules! forward_native_storage {
    ($ptr:ident) => {
        impl<T: NativeStorage + ?Sized> NativeStorage for $ptr<T> {
            fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
                (**self).get_item(key)
            }

            fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
                (**self).set_item(key, value)
            }

            fn remove_item(&self, key: &str) -> StorageResult<()> {
                (**self).remove_item(key)
            }

            fn clear(&self) -> StorageResult<()> {
                (**self).clear()
            }

            fn keys(&self) -> StorageResult<Vec<String>> {
                (**self).keys()
            }
        }
    };
}

forward_native_storage!(Rc);
forward_native_storage!(Arc);
forward_native_storage!(Box);
