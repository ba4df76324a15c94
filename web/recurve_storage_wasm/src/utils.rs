//! Utility functions for WASM setup and JS interop.

use recurve_storage::{StorageError, StorageResult, Value};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};

/// Sets up the panic hook for better error messages.
///
/// This function is called automatically when the WASM module initializes.
/// It redirects Rust panic messages to the browser console for debugging.
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Renders a thrown JS value as text.
pub fn describe_js(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Converts a thrown JS value into a backend error.
pub fn backend_error(value: JsValue) -> StorageError {
    StorageError::backend(describe_js(&value))
}

/// Converts a decoded value to a plain JS value (objects, not `Map`s).
pub fn to_js(value: &Value) -> StorageResult<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| StorageError::backend(e.to_string()))
}

/// Converts a JS value to a decoded value.
pub fn from_js(value: JsValue) -> StorageResult<Value> {
    serde_wasm_bindgen::from_value(value).map_err(|e| StorageError::backend(e.to_string()))
}
