//! The storage facade.
//!
//! A [`Storage`] routes every operation through up to two layers: a cache
//! holding decoded values and a native backend holding JSON text. Which
//! layers are active is decided once, at construction, and recorded as a
//! [`LayerMode`].
//!
//! ## Read precedence
//!
//! The cache is consulted first and a hit short-circuits the native read.
//! On a miss the native backend is read and, if it had the key, the decoded
//! value is written into the cache (cache-fill-on-miss).
//!
//! A cache hit means the cache returned an entry for the key. Cached `0`,
//! `false`, `""` and `null` are hits.

use crate::backend::NativeStorage;
use crate::cache::{Cache, MemoryCache};
use crate::config::StorageConfig;
use crate::error::{StorageError, StorageResult};
use crate::probe::{retain_supported, Unsupported};
use recurve_codec::{decode_text, encode, from_value, to_value};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, trace};

/// Which layers a facade ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerMode {
    /// Cache in front of a working native backend.
    Both,
    /// Native backend only.
    NativeOnly,
    /// Cache only; the native backend is missing or refused writes.
    CacheOnly,
    /// No layer at all. Reads miss, writes are dropped, and `exists` and
    /// `for_each` fail.
    Neither,
}

enum Layers<N, C> {
    Both { native: N, cache: C },
    NativeOnly(N),
    CacheOnly(C),
    Neither,
}

impl<N, C> Layers<N, C> {
    fn from_parts(native: Option<N>, cache: Option<C>) -> Self {
        match (native, cache) {
            (Some(native), Some(cache)) => Self::Both { native, cache },
            (Some(native), None) => Self::NativeOnly(native),
            (None, Some(cache)) => Self::CacheOnly(cache),
            (None, None) => Self::Neither,
        }
    }

    fn mode(&self) -> LayerMode {
        match self {
            Self::Both { .. } => LayerMode::Both,
            Self::NativeOnly(_) => LayerMode::NativeOnly,
            Self::CacheOnly(_) => LayerMode::CacheOnly,
            Self::Neither => LayerMode::Neither,
        }
    }

    fn native(&self) -> Option<&N> {
        match self {
            Self::Both { native, .. } | Self::NativeOnly(native) => Some(native),
            Self::CacheOnly(_) | Self::Neither => None,
        }
    }

    fn cache(&self) -> Option<&C> {
        match self {
            Self::Both { cache, .. } | Self::CacheOnly(cache) => Some(cache),
            Self::NativeOnly(_) | Self::Neither => None,
        }
    }
}

/// Key/value storage with JSON values over an optional cache and an
/// optional native backend.
///
/// # Example
///
/// ```rust
/// use recurve_storage::{InMemoryNative, LayerMode, Storage, StorageConfig};
/// use serde_json::json;
///
/// let storage = Storage::new(
///     StorageConfig::with_provider(InMemoryNative::new()).always_cache(),
/// );
/// assert_eq!(storage.mode(), LayerMode::Both);
///
/// storage.set("a", &json!({"b": "c"})).unwrap();
/// assert_eq!(storage.get("a").unwrap(), Some(json!({"b": "c"})));
/// assert!(storage.remove("a").unwrap());
/// ```
pub struct Storage<N, C = MemoryCache> {
    layers: Layers<N, C>,
    native_supported: bool,
}

impl<N: NativeStorage, C: Cache> Storage<N, C> {
    /// Builds a facade from a configuration.
    ///
    /// The candidate backend is probed with a throwaway write. A backend
    /// that is missing or fails the probe is discarded. The cache factory,
    /// if any, is then called with the probe outcome.
    pub fn new(config: StorageConfig<N, C>) -> Self {
        let StorageConfig {
            provider,
            create_cache,
            probe_prefix,
        } = config;

        let native = match retain_supported(provider, &probe_prefix) {
            Ok(native) => Some(native),
            Err(Unsupported { reason }) => {
                debug!(%reason, "native storage unsupported");
                None
            }
        };
        let native_supported = native.is_some();
        let cache = create_cache.and_then(|factory| factory(native_supported));

        let layers = Layers::from_parts(native, cache);
        debug!(mode = ?layers.mode(), native_supported, "storage layers selected");

        Self {
            layers,
            native_supported,
        }
    }

    /// Builds a facade from a configuration that may be missing.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::MissingConfig`] if `config` is `None`.
    pub fn from_optional(config: Option<StorageConfig<N, C>>) -> StorageResult<Self> {
        config.map(Self::new).ok_or(StorageError::MissingConfig)
    }

    /// Retrieves the value stored under `key`.
    ///
    /// Returns `Ok(None)` when no layer has the key. Cache hits are returned
    /// as stored. Native text that is not valid JSON is returned as a string
    /// rather than failing.
    ///
    /// # Errors
    ///
    /// Returns an error if a layer fails to read, or the cache fails to fill.
    pub fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        match &self.layers {
            Layers::Both { native, cache } => {
                if let Some(value) = cache.get(key)? {
                    return Ok(Some(value));
                }
                let value = read_native(native, key)?;
                if let Some(value) = &value {
                    trace!(key, "filling cache from native storage");
                    cache.set(key, value.clone())?;
                }
                Ok(value)
            }
            Layers::NativeOnly(native) => read_native(native, key),
            Layers::CacheOnly(cache) => cache.get(key),
            Layers::Neither => Ok(None),
        }
    }

    /// Retrieves and deserializes the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the value does not match `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        self.get(key)?
            .map(from_value)
            .transpose()
            .map_err(StorageError::from)
    }

    /// Stores `value` under `key` in every active layer.
    ///
    /// The native backend receives JSON text and the cache the value itself.
    /// The two writes are not atomic with each other.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized or a layer rejects
    /// the write.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let value = to_value(value)?;
        match &self.layers {
            Layers::Both { native, cache } => {
                write_native(native, key, &value)?;
                cache.set(key, value)
            }
            Layers::NativeOnly(native) => write_native(native, key, &value),
            Layers::CacheOnly(cache) => cache.set(key, value),
            Layers::Neither => {
                trace!(key, "no active layer, write dropped");
                Ok(())
            }
        }
    }

    /// Removes `key` from every active layer.
    ///
    /// Returns whether the key existed immediately before the call.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NoActiveLayer`] if no layer is active, or an
    /// error from the layers themselves.
    pub fn remove(&self, key: &str) -> StorageResult<bool> {
        let existed = self.exists(key)?;
        if let Some(cache) = self.layers.cache() {
            cache.remove(key)?;
        }
        if let Some(native) = self.layers.native() {
            native.remove_item(key)?;
        }
        Ok(existed)
    }

    /// Checks whether `key` is stored.
    ///
    /// With a cache active, the cache decides. Otherwise any non-empty native
    /// read counts as existence.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NoActiveLayer`] if no layer is active.
    pub fn exists(&self, key: &str) -> StorageResult<bool> {
        match &self.layers {
            Layers::Both { cache, .. } | Layers::CacheOnly(cache) => cache.exists(key),
            Layers::NativeOnly(native) => {
                Ok(native.get_item(key)?.is_some_and(|raw| !raw.is_empty()))
            }
            Layers::Neither => Err(StorageError::NoActiveLayer {
                operation: "exists",
            }),
        }
    }

    /// Clears every active layer.
    ///
    /// # Errors
    ///
    /// Returns an error if a layer fails to clear.
    pub fn clear(&self) -> StorageResult<()> {
        if let Some(cache) = self.layers.cache() {
            cache.clear()?;
        }
        if let Some(native) = self.layers.native() {
            native.clear()?;
        }
        Ok(())
    }

    /// Calls `f` with `(value, key)` for every stored entry.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NoActiveLayer`] if no layer is active.
    pub fn for_each<F>(&self, mut f: F) -> StorageResult<()>
    where
        F: FnMut(&Value, &str),
    {
        self.for_each_with(&mut (), |_, value, key| f(value, key))
    }

    /// Calls `f` with `(context, value, key)` for every stored entry.
    ///
    /// With a cache active, iteration is delegated to it and follows its
    /// order. Otherwise the native keys are enumerated and each value is
    /// decoded.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NoActiveLayer`] if no layer is active.
    pub fn for_each_with<Ctx, F>(&self, context: &mut Ctx, mut f: F) -> StorageResult<()>
    where
        F: FnMut(&mut Ctx, &Value, &str),
    {
        match &self.layers {
            Layers::Both { cache, .. } | Layers::CacheOnly(cache) => {
                cache.for_each(&mut |value: &Value, key: &str| f(context, value, key))
            }
            Layers::NativeOnly(native) => {
                for key in native.keys()? {
                    // The callback may have removed later keys.
                    if let Some(value) = read_native(native, &key)? {
                        f(context, &value, &key);
                    }
                }
                Ok(())
            }
            Layers::Neither => Err(StorageError::NoActiveLayer {
                operation: "for_each",
            }),
        }
    }

    /// Returns which layers are active.
    #[must_use]
    pub fn mode(&self) -> LayerMode {
        self.layers.mode()
    }

    /// Returns `true` if the native backend passed the support probe.
    #[must_use]
    pub fn is_native_supported(&self) -> bool {
        self.native_supported
    }

    /// Returns the native backend, if active.
    #[must_use]
    pub fn native(&self) -> Option<&N> {
        self.layers.native()
    }

    /// Returns the cache, if active.
    #[must_use]
    pub fn cache(&self) -> Option<&C> {
        self.layers.cache()
    }
}

impl<N, C> fmt::Debug for Storage<N, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("mode", &self.layers.mode())
            .field("native_supported", &self.native_supported)
            .finish()
    }
}

fn read_native<N: NativeStorage + ?Sized>(native: &N, key: &str) -> StorageResult<Option<Value>> {
    Ok(native.get_item(key)?.map(|raw| match decode_text(&raw) {
        Ok(value) => value,
        Err(_) => {
            trace!(key, "native value is not JSON, returned as text");
            Value::String(raw)
        }
    }))
}

fn write_native<N: NativeStorage + ?Sized>(native: &N, key: &str, value: &Value) -> StorageResult<()> {
    match encode(Some(value))? {
        Some(text) => native.set_item(key, &text),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryNative;
    use proptest::prelude::*;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Refusing;

    impl NativeStorage for Refusing {
        fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::backend("writes disabled"))
        }

        fn remove_item(&self, _key: &str) -> StorageResult<()> {
            Ok(())
        }

        fn clear(&self) -> StorageResult<()> {
            Ok(())
        }

        fn keys(&self) -> StorageResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn native_only() -> Storage<Rc<InMemoryNative>> {
        Storage::new(StorageConfig::with_provider(Rc::new(InMemoryNative::new())))
    }

    fn neither() -> Storage<InMemoryNative> {
        Storage::new(StorageConfig::new(None))
    }

    #[test]
    fn missing_config_fails() {
        let result = Storage::<InMemoryNative>::from_optional(None);
        assert!(matches!(result, Err(StorageError::MissingConfig)));
    }

    #[test]
    fn working_provider_is_kept() {
        let storage = native_only();
        assert!(storage.is_native_supported());
        assert_eq!(storage.mode(), LayerMode::NativeOnly);
    }

    #[test]
    fn refusing_provider_is_discarded() {
        let storage = Storage::new(StorageConfig::with_provider(Refusing));
        assert!(!storage.is_native_supported());
        assert_eq!(storage.mode(), LayerMode::Neither);
        assert!(storage.native().is_none());
    }

    #[test]
    fn factory_receives_probe_outcome() {
        let seen = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seen);
        let storage = Storage::new(StorageConfig::with_provider(Refusing).create_cache(
            move |supported| {
                sink.set(Some(supported));
                Some(MemoryCache::new())
            },
        ));

        assert_eq!(seen.get(), Some(false));
        assert_eq!(storage.mode(), LayerMode::CacheOnly);
    }

    #[test]
    fn factory_may_decline_cache() {
        let storage = Storage::new(
            StorageConfig::with_provider(InMemoryNative::new()).cache_if_unsupported(),
        );
        assert_eq!(storage.mode(), LayerMode::NativeOnly);
    }

    #[test]
    fn probe_key_not_left_behind() {
        let native = Rc::new(InMemoryNative::new());
        let _storage = Storage::new(StorageConfig::with_provider(Rc::clone(&native)));
        assert!(native.is_empty());
    }

    #[test]
    fn native_holds_json_text() {
        let storage = native_only();
        storage.set("a", &json!({"b": "c"})).unwrap();
        storage.set("n", &1).unwrap();

        let native = storage.native().unwrap();
        assert_eq!(native.get_item("a").unwrap().as_deref(), Some(r#"{"b":"c"}"#));
        assert_eq!(native.get_item("n").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn malformed_native_text_is_returned_raw() {
        let storage = native_only();
        storage.native().unwrap().set_item("a", "{b:").unwrap();
        assert_eq!(storage.get("a").unwrap(), Some(json!("{b:")));
    }

    #[test]
    fn native_json_text_decodes_to_string() {
        let storage = native_only();
        let native = storage.native().unwrap();
        native.set_item("q", r#""{b:""#).unwrap();
        native.set_item("n", r#""1""#).unwrap();

        assert_eq!(storage.get("q").unwrap(), Some(json!("{b:")));
        assert_eq!(storage.get("n").unwrap(), Some(json!("1")));
    }

    #[test]
    fn exists_ignores_empty_native_text() {
        let storage = native_only();
        storage.native().unwrap().set_item("a", "").unwrap();
        assert!(!storage.exists("a").unwrap());
        assert_eq!(storage.get("a").unwrap(), Some(json!("")));
    }

    #[test]
    fn cached_falsy_values_are_hits() {
        let native = Rc::new(InMemoryNative::new());
        let storage = Storage::new(StorageConfig::with_provider(Rc::clone(&native)).always_cache());

        storage.set("zero", &0).unwrap();
        storage.set("no", &false).unwrap();
        native.set_item("zero", "5").unwrap();
        native.set_item("no", "true").unwrap();

        assert_eq!(storage.get("zero").unwrap(), Some(json!(0)));
        assert_eq!(storage.get("no").unwrap(), Some(json!(false)));
    }

    #[test]
    fn native_miss_does_not_fill_cache() {
        let storage = Storage::new(
            StorageConfig::with_provider(InMemoryNative::new()).always_cache(),
        );
        assert_eq!(storage.get("missing").unwrap(), None);
        assert!(storage.cache().unwrap().is_empty());
        assert!(!storage.exists("missing").unwrap());
    }

    #[test]
    fn repeated_gets_agree_after_cache_fill() {
        let native = Rc::new(InMemoryNative::new());
        let storage = Storage::new(StorageConfig::with_provider(Rc::clone(&native)).always_cache());
        native.set_item("a", r#""1""#).unwrap();

        let first = storage.get("a").unwrap();
        let second = storage.get("a").unwrap();
        assert_eq!(first, Some(json!("1")));
        assert_eq!(first, second);
    }

    #[test]
    fn cached_json_looking_strings_keep_their_type() {
        let storage = Storage::new(
            StorageConfig::<InMemoryNative>::new(None).cache_if_unsupported(),
        );
        storage.set("n", "1").unwrap();
        storage.set("q", "\"hi\"").unwrap();

        assert_eq!(storage.get("n").unwrap(), Some(json!("1")));
        assert_eq!(storage.get("q").unwrap(), Some(json!("\"hi\"")));

        let mut seen = Vec::new();
        storage.for_each(|value, key| seen.push((key.to_owned(), value.clone()))).unwrap();
        assert_eq!(
            seen,
            vec![
                ("n".to_owned(), json!("1")),
                ("q".to_owned(), json!("\"hi\"")),
            ]
        );
    }

    #[test]
    fn get_as_deserializes() {
        let storage = native_only();
        storage.set("list", &vec![1u8, 2, 3]).unwrap();
        let list: Option<Vec<u8>> = storage.get_as("list").unwrap();
        assert_eq!(list, Some(vec![1, 2, 3]));
    }

    #[test]
    fn get_as_shape_mismatch_fails() {
        let storage = native_only();
        storage.set("a", "text").unwrap();
        assert!(matches!(
            storage.get_as::<u32>("a"),
            Err(StorageError::Codec(_))
        ));
    }

    #[test]
    fn neither_get_is_absent() {
        assert_eq!(neither().get("a").unwrap(), None);
    }

    #[test]
    fn neither_set_and_clear_are_noops() {
        let storage = neither();
        storage.set("a", &1).unwrap();
        storage.clear().unwrap();
    }

    #[test]
    fn neither_exists_fails() {
        let err = neither().exists("a").unwrap_err();
        assert!(matches!(err, StorageError::NoActiveLayer { operation: "exists" }));
    }

    #[test]
    fn neither_remove_fails() {
        assert!(neither().remove("a").unwrap_err().is_config_error());
    }

    #[test]
    fn neither_for_each_fails() {
        let err = neither().for_each(|_, _| {}).unwrap_err();
        assert!(matches!(err, StorageError::NoActiveLayer { operation: "for_each" }));
    }

    #[test]
    fn for_each_with_threads_context() {
        let storage = native_only();
        storage.set("a", &1).unwrap();
        storage.set("b", &2).unwrap();

        let mut total = 0i64;
        storage
            .for_each_with(&mut total, |sum, value, _key| {
                *sum += value.as_i64().unwrap();
            })
            .unwrap();
        assert_eq!(total, 3);
    }

    #[test]
    fn set_failure_after_construction_propagates() {
        struct FailAfterProbe {
            inner: InMemoryNative,
            armed: Cell<bool>,
        }

        impl NativeStorage for FailAfterProbe {
            fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
                self.inner.get_item(key)
            }

            fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
                if self.armed.get() {
                    return Err(StorageError::backend("QuotaExceededError"));
                }
                self.inner.set_item(key, value)
            }

            fn remove_item(&self, key: &str) -> StorageResult<()> {
                self.inner.remove_item(key)
            }

            fn clear(&self) -> StorageResult<()> {
                self.inner.clear()
            }

            fn keys(&self) -> StorageResult<Vec<String>> {
                self.inner.keys()
            }
        }

        let native = Rc::new(FailAfterProbe {
            inner: InMemoryNative::new(),
            armed: Cell::new(false),
        });
        let storage = Storage::new(StorageConfig::with_provider(Rc::clone(&native)));
        native.armed.set(true);

        let err = storage.set("a", &1).unwrap_err();
        assert!(matches!(err, StorageError::Backend { .. }));
    }

    proptest! {
        #[test]
        fn raw_native_text_never_fails_get(text in ".*") {
            let storage = native_only();
            storage.native().unwrap().set_item("k", &text).unwrap();
            prop_assert!(storage.get("k").unwrap().is_some());
        }
    }
}
