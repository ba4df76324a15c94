//! Adapters for caller-supplied JS objects.
//!
//! Methods are looked up by name on every call, like the original duck-typed
//! usage: a mock provider only needs the methods that actually get called,
//! and one lacking `setItem` simply fails the support probe.

use crate::utils::{backend_error, from_js, to_js};
use js_sys::{Array, Function, Object, Reflect};
use recurve_codec::decode_or_raw;
use recurve_storage::{Cache, NativeStorage, StorageError, StorageResult, Value};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Calls `object[name](...args)`.
fn call_method(object: &Object, name: &str, args: &[JsValue]) -> StorageResult<JsValue> {
    let method = Reflect::get(object, &JsValue::from_str(name)).map_err(backend_error)?;
    let method: Function = method
        .dyn_into()
        .map_err(|_| StorageError::backend(format!("{name} is not a function")))?;
    let args: Array = args.iter().collect();
    Reflect::apply(&method, object, &args).map_err(backend_error)
}

fn has_method(object: &Object, name: &str) -> bool {
    Reflect::get(object, &JsValue::from_str(name))
        .map(|value| value.is_function())
        .unwrap_or(false)
}

/// A JS object implementing `getItem/setItem/removeItem/clear`.
#[derive(Debug, Clone)]
pub struct JsProvider {
    object: Object,
}

impl JsProvider {
    /// Wraps `value` if it is an object.
    pub fn new(value: JsValue) -> Option<Self> {
        value.dyn_into::<Object>().ok().map(|object| Self { object })
    }

    fn enumerable_keys(&self) -> Vec<String> {
        Object::keys(&self.object)
            .iter()
            .filter_map(|key| key.as_string())
            .filter(|key| !has_method(&self.object, key))
            .collect()
    }
}

impl NativeStorage for JsProvider {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = call_method(&self.object, "getItem", &[JsValue::from_str(key)])?;
        if value.is_null() || value.is_undefined() {
            return Ok(None);
        }
        match value.as_string() {
            Some(text) => Ok(Some(text)),
            // Mocks may hand back decoded values; re-encode so they decode alike.
            None => js_sys::JSON::stringify(&value)
                .map(|text| Some(String::from(text)))
                .map_err(backend_error),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        call_method(
            &self.object,
            "setItem",
            &[JsValue::from_str(key), JsValue::from_str(value)],
        )
        .map(|_| ())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        call_method(&self.object, "removeItem", &[JsValue::from_str(key)]).map(|_| ())
    }

    fn clear(&self) -> StorageResult<()> {
        call_method(&self.object, "clear", &[]).map(|_| ())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        if !has_method(&self.object, "key") {
            return Ok(self.enumerable_keys());
        }

        let length = Reflect::get(&self.object, &JsValue::from_str("length"))
            .map_err(backend_error)?
            .as_f64()
            .unwrap_or(0.0) as u32;
        let mut keys = Vec::with_capacity(length as usize);
        for index in 0..length {
            let key = call_method(&self.object, "key", &[JsValue::from(index)])?;
            if let Some(key) = key.as_string() {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

/// A JS object implementing `get/set/remove/exists/clear/forEach`.
///
/// Strings read back from it are decoded as JSON text where they parse.
#[derive(Debug, Clone)]
pub struct JsCache {
    object: Object,
}

impl JsCache {
    /// Wraps `value` if it is an object.
    pub fn new(value: JsValue) -> Option<Self> {
        value.dyn_into::<Object>().ok().map(|object| Self { object })
    }
}

impl Cache for JsCache {
    fn get(&self, key: &str) -> StorageResult<Option<Value>> {
        let value = call_method(&self.object, "get", &[JsValue::from_str(key)])?;
        if value.is_undefined() {
            return Ok(None);
        }
        // A JS cache reports misses and stored nulls alike.
        if value.is_null() && !self.exists(key)? {
            return Ok(None);
        }
        // Foreign caches may hold transport text rather than values.
        from_js(value).map(|value| Some(decode_or_raw(value)))
    }

    fn set(&self, key: &str, value: Value) -> StorageResult<()> {
        let value = to_js(&value)?;
        call_method(&self.object, "set", &[JsValue::from_str(key), value]).map(|_| ())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        call_method(&self.object, "remove", &[JsValue::from_str(key)]).map(|_| ())
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        call_method(&self.object, "exists", &[JsValue::from_str(key)])
            .map(|found| found.is_truthy())
    }

    fn clear(&self) -> StorageResult<()> {
        call_method(&self.object, "clear", &[]).map(|_| ())
    }

    fn for_each(&self, f: &mut dyn FnMut(&Value, &str)) -> StorageResult<()> {
        let entries: Rc<RefCell<Vec<(JsValue, JsValue)>>> = Rc::default();
        let sink = Rc::clone(&entries);
        let collect = Closure::wrap(Box::new(move |value: JsValue, key: JsValue| {
            sink.borrow_mut().push((value, key));
        }) as Box<dyn FnMut(JsValue, JsValue)>);

        call_method(&self.object, "forEach", &[collect.as_ref().clone()])?;
        drop(collect);

        let entries = entries.take();
        for (value, key) in entries {
            let key = key.as_string().unwrap_or_default();
            f(&decode_or_raw(from_js(value)?), &key);
        }
        Ok(())
    }
}
