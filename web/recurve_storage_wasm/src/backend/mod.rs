//! Native and cache layers available in the browser.
//!
//! - [`WebStorage`] wraps `window.localStorage` / `window.sessionStorage`
//! - [`JsProvider`] adapts any JS object with the web storage methods
//! - [`JsCache`] adapts a JS cache object
//!
//! [`Provider`] and [`CacheLayer`] unify these so one facade type can hold
//! whichever the caller configured.

mod js;
mod web;

pub use js::{JsCache, JsProvider};
pub use web::{StorageArea, WebStorage};

use recurve_storage::{Cache, MemoryCache, NativeStorage, StorageResult, Value};

/// A native backend configured from JS or taken from the window.
pub enum Provider {
    /// One of the browser storage areas.
    Web(WebStorage),
    /// A caller-supplied JS object.
    Js(JsProvider),
}

impl From<WebStorage> for Provider {
    fn from(storage: WebStorage) -> Self {
        Provider::Web(storage)
    }
}

impl Provider {
    fn inner(&self) -> &dyn NativeStorage {
        match self {
            Provider::Web(storage) => storage,
            Provider::Js(provider) => provider,
        }
    }
}

impl NativeStorage for Provider {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner().get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.inner().set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.inner().remove_item(key)
    }

    fn clear(&self) -> StorageResult<()> {
        self.inner().clear()
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        self.inner().keys()
    }
}

/// A cache configured from JS.
pub enum CacheLayer {
    /// The built-in unbounded cache.
    Memory(MemoryCache),
    /// A caller-supplied JS cache object.
    Js(JsCache),
}

impl CacheLayer {
    fn inner(&self) -> &dyn Cache {
        match self {
            CacheLayer::Memory(cache) => cache,
            CacheLayer::Js(cache) => cache,
        }
    }
}

impl Cache for CacheLayer {
    fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        self.inner().get(key)
    }

    fn set(&self, key: &str, value: Value) -> StorageResult<()> {
        self.inner().set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.inner().remove(key)
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        self.inner().exists(key)
    }

    fn clear(&self) -> StorageResult<()> {
        self.inner().clear()
    }

    fn for_each(&self, f: &mut dyn FnMut(&Value, &str)) -> StorageResult<()> {
        self.inner().for_each(f)
    }
}
