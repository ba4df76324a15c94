//! Error types for WASM bindings.

use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Errors that can occur in the WASM bindings.
#[derive(Debug, Error)]
pub enum WasmError {
    /// Storage operation failed.
    #[error("{0}")]
    Storage(#[from] recurve_storage::StorageError),

    /// Invalid input provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// JavaScript error occurred.
    #[error("JS error: {0}")]
    JsError(String),
}

impl From<WasmError> for JsValue {
    fn from(err: WasmError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

impl From<JsValue> for WasmError {
    fn from(val: JsValue) -> Self {
        WasmError::JsError(crate::utils::describe_js(&val))
    }
}

/// Result type for WASM operations.
pub type WasmResult<T> = Result<T, WasmError>;
