//! Transport text to value decoding.

use crate::error::{CodecError, CodecResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decodes a value that may still be in transport form.
///
/// Strings are parsed as JSON text. Any other value is assumed to be
/// decoded already (for example a value handed back by a cache) and is
/// returned unchanged.
///
/// # Errors
///
/// Returns [`CodecError::DecodingFailed`] if a string is not valid JSON.
pub fn decode(value: Value) -> CodecResult<Value> {
    match value {
        Value::String(text) => decode_text(&text),
        other => Ok(other),
    }
}

/// Parses JSON transport text.
///
/// # Errors
///
/// Returns [`CodecError::DecodingFailed`] on malformed input.
pub fn decode_text(text: &str) -> CodecResult<Value> {
    serde_json::from_str(text).map_err(|e| CodecError::decoding_failed(e.to_string()))
}

/// Decodes a value, returning it untouched if it is malformed text.
#[must_use]
pub fn decode_or_raw(value: Value) -> Value {
    match value {
        Value::String(text) => decode_text(&text).unwrap_or(Value::String(text)),
        other => other,
    }
}

/// Converts a decoded [`Value`] into a typed value.
///
/// # Errors
///
/// Returns an error if the value does not match the shape of `T`.
pub fn from_value<T: DeserializeOwned>(value: Value) -> CodecResult<T> {
    serde_json::from_value(value).map_err(|e| CodecError::decoding_failed(e.to_string()))
}
