//! JavaScript-facing classes.
//!
//! `Storage` requires an options object; `LocalStorage` and `SessionStorage`
//! accept none and default their provider to the matching browser area.
//!
//! ## Options
//!
//! | option | effect |
//! |---|---|
//! | `provider` | object with `getItem/setItem/removeItem/clear` |
//! | `createCache(isSupported)` | returns a cache object or nothing |
//! | `cache` | `"always"` or `"fallback"` to use the built-in memory cache |
//!
//! ## Example
//!
//! ```javascript
//! import init, { LocalStorage } from 'recurve_storage_wasm';
//!
//! await init();
//! const storage = new LocalStorage({ cache: "fallback" });
//! storage.set("user", { name: "ada" });
//! storage.get("user"); // { name: "ada" }
//! storage.forEach(function (value, key) { console.log(key, value, this); }, ctx);
//! ```

use crate::backend::{CacheLayer, JsCache, JsProvider, Provider, StorageArea};
use crate::error::{WasmError, WasmResult};
use crate::presets::{local_storage, session_storage};
use crate::utils::{from_js, to_js};
use js_sys::{Function, Reflect};
use recurve_storage::{LayerMode, MemoryCache, Storage, StorageConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

type BoundStorage = Storage<Provider, CacheLayer>;

fn option(options: &JsValue, name: &str) -> WasmResult<JsValue> {
    Ok(Reflect::get(options, &JsValue::from_str(name))?)
}

/// Builds a configuration from a JS options object.
///
/// Returns the configuration and a slot that receives any exception thrown
/// by `createCache`, which only runs once the facade probes its provider.
fn parse_options(
    options: &JsValue,
) -> WasmResult<(StorageConfig<Provider, CacheLayer>, Rc<RefCell<Option<JsValue>>>)> {
    let failure: Rc<RefCell<Option<JsValue>>> = Rc::default();

    let provider = JsProvider::new(option(options, "provider")?).map(Provider::Js);
    let base = StorageConfig::new(provider);

    let create_cache = option(options, "createCache")?;
    let config = if let Some(factory) = create_cache.dyn_ref::<Function>() {
        let factory = factory.clone();
        let slot = Rc::clone(&failure);
        base.create_cache(move |supported| {
            match factory.call1(&JsValue::NULL, &JsValue::from_bool(supported)) {
                Ok(cache) => JsCache::new(cache).map(CacheLayer::Js),
                Err(err) => {
                    *slot.borrow_mut() = Some(err);
                    None
                }
            }
        })
    } else {
        match option(options, "cache")?.as_string().as_deref() {
            Some("always") => {
                base.create_cache(|_| Some(CacheLayer::Memory(MemoryCache::new())))
            }
            Some("fallback") => base.create_cache(|supported| {
                (!supported).then(|| CacheLayer::Memory(MemoryCache::new()))
            }),
            Some(other) => {
                return Err(WasmError::InvalidInput(format!(
                    "unknown cache option: {other}"
                )))
            }
            None => base.create_cache(|_| None),
        }
    };

    Ok((config, failure))
}

fn build(options: JsValue, area: Option<StorageArea>) -> WasmResult<BoundStorage> {
    let options = (!options.is_undefined() && !options.is_null()).then_some(options);

    let (config, failure) = match &options {
        Some(options) => {
            let (config, failure) = parse_options(options)?;
            (Some(config), failure)
        }
        None => (None, Rc::default()),
    };

    let storage = match area {
        None => Storage::from_optional(config)?,
        Some(area) => {
            let config = config.unwrap_or_else(|| StorageConfig::new(None).create_cache(|_| None));
            match area {
                StorageArea::Local => local_storage(config),
                StorageArea::Session => session_storage(config),
            }
        }
    };

    if let Some(err) = failure.borrow_mut().take() {
        return Err(err.into());
    }
    Ok(storage)
}

/// Keys that are not strings (`null`, `undefined`, numbers) name no entry.
fn key_of(key: &JsValue) -> Option<String> {
    key.as_string()
}

fn get(storage: &BoundStorage, key: &JsValue) -> WasmResult<JsValue> {
    let Some(key) = key_of(key) else {
        return Ok(JsValue::NULL);
    };
    match storage.get(&key)? {
        Some(value) => Ok(to_js(&value)?),
        None => Ok(JsValue::NULL),
    }
}

fn set(storage: &BoundStorage, key: &JsValue, value: JsValue) -> WasmResult<()> {
    let Some(key) = key_of(key) else {
        return Ok(());
    };
    // Never store the absent marker. With no layer there is nothing to remove.
    if value.is_undefined() {
        if storage.mode() != LayerMode::Neither {
            storage.remove(&key)?;
        }
        return Ok(());
    }
    storage.set(&key, &from_js(value)?)?;
    Ok(())
}

fn remove(storage: &BoundStorage, key: &JsValue) -> WasmResult<bool> {
    match key_of(key) {
        Some(key) => Ok(storage.remove(&key)?),
        None => Ok(false),
    }
}

fn exists(storage: &BoundStorage, key: &JsValue) -> WasmResult<bool> {
    match key_of(key) {
        Some(key) => Ok(storage.exists(&key)?),
        None => Ok(false),
    }
}

fn for_each(storage: &BoundStorage, iterator: &Function, context: &JsValue) -> WasmResult<()> {
    let mut thrown: Option<JsValue> = None;
    storage.for_each_with(&mut thrown, |thrown, value, key| {
        if thrown.is_some() {
            return;
        }
        let result = to_js(value)
            .map_err(|e| JsValue::from_str(&e.to_string()))
            .and_then(|value| iterator.call2(context, &value, &JsValue::from_str(key)));
        if let Err(err) = result {
            *thrown = Some(err);
        }
    })?;
    match thrown {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn mode_name(mode: LayerMode) -> &'static str {
    match mode {
        LayerMode::Both => "both",
        LayerMode::NativeOnly => "native",
        LayerMode::CacheOnly => "cache",
        LayerMode::Neither => "none",
    }
}

macro_rules! storage_class {
    ($(#[$meta:meta])* $name:ident, $js_name:literal, $area:expr) => {
        $(#[$meta])*
        #[wasm_bindgen(js_name = $js_name)]
        pub struct $name {
            inner: BoundStorage,
        }

        #[wasm_bindgen(js_class = $js_name)]
        impl $name {
            /// Creates the facade, probing the provider once.
            #[wasm_bindgen(constructor)]
            pub fn new(options: JsValue) -> Result<$name, JsValue> {
                Ok(Self {
                    inner: build(options, $area)?,
                })
            }

            /// Returns the stored value, or `null`.
            #[wasm_bindgen]
            pub fn get(&self, key: JsValue) -> Result<JsValue, JsValue> {
                Ok(get(&self.inner, &key)?)
            }

            /// Stores a value. `undefined` removes the key.
            #[wasm_bindgen]
            pub fn set(&self, key: JsValue, value: JsValue) -> Result<(), JsValue> {
                Ok(set(&self.inner, &key, value)?)
            }

            /// Removes a key, returning whether it existed.
            #[wasm_bindgen]
            pub fn remove(&self, key: JsValue) -> Result<bool, JsValue> {
                Ok(remove(&self.inner, &key)?)
            }

            /// Returns whether a key is stored.
            #[wasm_bindgen]
            pub fn exists(&self, key: JsValue) -> Result<bool, JsValue> {
                Ok(exists(&self.inner, &key)?)
            }

            /// Removes every key.
            #[wasm_bindgen]
            pub fn clear(&self) -> Result<(), JsValue> {
                Ok(self.inner.clear().map_err(WasmError::from)?)
            }

            /// Calls `iterator(value, key)` with `this` bound to `context`.
            #[wasm_bindgen(js_name = forEach)]
            pub fn for_each(&self, iterator: &Function, context: JsValue) -> Result<(), JsValue> {
                Ok(for_each(&self.inner, iterator, &context)?)
            }

            /// Which layers are active: `both`, `native`, `cache` or `none`.
            #[wasm_bindgen(getter)]
            pub fn mode(&self) -> String {
                mode_name(self.inner.mode()).to_string()
            }

            /// Whether the provider accepted the probe write.
            #[wasm_bindgen(getter = isNativeSupported)]
            pub fn is_native_supported(&self) -> bool {
                self.inner.is_native_supported()
            }
        }
    };
}

storage_class!(
    /// Storage over a caller-supplied provider. Throws without options.
    JsStorage,
    "Storage",
    None
);

storage_class!(
    /// Storage defaulting to `window.localStorage`.
    JsLocalStorage,
    "LocalStorage",
    Some(StorageArea::Local)
);

storage_class!(
    /// Storage defaulting to `window.sessionStorage`.
    JsSessionStorage,
    "SessionStorage",
    Some(StorageArea::Session)
);
