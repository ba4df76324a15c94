//! Durable and session specializations.
//!
//! Both are the plain facade with the provider defaulted to one of the
//! browser storage areas. Everything else in the configuration, including
//! the cache factory, is passed through untouched.

use crate::backend::WebStorage;
use recurve_storage::{Cache, MemoryCache, NativeStorage, Storage, StorageConfig};

/// Facade over `window.localStorage`.
pub type LocalStorage<C = MemoryCache> = Storage<WebStorage, C>;

/// Facade over `window.sessionStorage`.
pub type SessionStorage<C = MemoryCache> = Storage<WebStorage, C>;

/// Builds a facade defaulting to `window.localStorage`.
///
/// An explicit provider in `config` wins over the default.
pub fn local_storage<N, C>(config: StorageConfig<N, C>) -> Storage<N, C>
where
    N: NativeStorage + From<WebStorage>,
    C: Cache,
{
    Storage::new(config.or_provider(WebStorage::local().map(N::from)))
}

/// Builds a facade defaulting to `window.sessionStorage`.
///
/// An explicit provider in `config` wins over the default.
pub fn session_storage<N, C>(config: StorageConfig<N, C>) -> Storage<N, C>
where
    N: NativeStorage + From<WebStorage>,
    C: Cache,
{
    Storage::new(config.or_provider(WebStorage::session().map(N::from)))
}
