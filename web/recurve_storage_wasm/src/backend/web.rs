//! Browser storage areas.

use crate::utils::backend_error;
use recurve_storage::{NativeStorage, StorageResult};

/// Which browser storage area to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageArea {
    /// `window.localStorage`, durable per origin.
    Local,
    /// `window.sessionStorage`, scoped to the browsing session.
    Session,
}

impl StorageArea {
    /// Returns the area's storage object, if the browser exposes it.
    ///
    /// Accessing the area can itself throw (sandboxed iframes, blocked
    /// cookies); that is reported as `None`.
    pub fn open(self) -> Option<web_sys::Storage> {
        let window = web_sys::window()?;
        let storage = match self {
            StorageArea::Local => window.local_storage(),
            StorageArea::Session => window.session_storage(),
        };
        storage.ok().flatten()
    }
}

/// A browser storage area as a native backend.
#[derive(Debug, Clone)]
pub struct WebStorage {
    inner: web_sys::Storage,
    area: StorageArea,
}

impl WebStorage {
    /// Opens the given area.
    pub fn open(area: StorageArea) -> Option<Self> {
        area.open().map(|inner| Self { inner, area })
    }

    /// Opens `window.localStorage`.
    pub fn local() -> Option<Self> {
        Self::open(StorageArea::Local)
    }

    /// Opens `window.sessionStorage`.
    pub fn session() -> Option<Self> {
        Self::open(StorageArea::Session)
    }

    /// Returns the area this wraps.
    pub fn area(&self) -> StorageArea {
        self.area
    }
}

impl NativeStorage for WebStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get_item(key).map_err(backend_error)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.inner.set_item(key, value).map_err(backend_error)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.inner.remove_item(key).map_err(backend_error)
    }

    fn clear(&self) -> StorageResult<()> {
        self.inner.clear().map_err(backend_error)
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let length = self.inner.length().map_err(backend_error)?;
        let mut keys = Vec::with_capacity(length as usize);
        for index in 0..length {
            if let Some(key) = self.inner.key(index).map_err(backend_error)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}
