//! Value to transport text encoding.

use crate::error::{CodecError, CodecResult};
use serde::Serialize;
use serde_json::Value;

/// Encodes a value to its JSON transport text.
///
/// Returns `Ok(None)` when `value` is `None`, so an absent value is never
/// written as text. A present `null` encodes to `"null"`.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn encode(value: Option<&Value>) -> CodecResult<Option<String>> {
    value
        .map(|v| serde_json::to_string(v).map_err(|e| CodecError::encoding_failed(e.to_string())))
        .transpose()
}

/// Converts any serializable value into a [`Value`].
///
/// # Errors
///
/// Returns an error if `T`'s `Serialize` impl fails or produces a map with
/// non-string keys.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> CodecResult<Value> {
    serde_json::to_value(value).map_err(|e| CodecError::encoding_failed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn encode_object() {
        let text = encode(Some(&json!({"a": 1, "b": 2}))).unwrap();
        assert_eq!(text.as_deref(), Some(r#"{"a":1,"b":2}"#));
    }

    #[test]
    fn encode_number() {
        assert_eq!(encode(Some(&json!(1))).unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn encode_null_is_text() {
        assert_eq!(encode(Some(&Value::Null)).unwrap().as_deref(), Some("null"));
    }

    #[test]
    fn encode_absent_is_none() {
        assert_eq!(encode(None).unwrap(), None);
    }

    #[test]
    fn encode_quoted_string() {
        let text = encode(Some(&json!("b\""))).unwrap().unwrap();
        assert_eq!(text, r#""b\"""#);
    }

    #[test]
    fn to_value_from_struct() {
        #[derive(Serialize)]
        struct Point {
            x: i32,
            y: i32,
        }

        assert_eq!(to_value(&Point { x: 1, y: 2 }).unwrap(), json!({"x": 1, "y": 2}));
    }

    #[test]
    fn to_value_rejects_non_string_keys() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple key");

        assert!(matches!(
            to_value(&map),
            Err(CodecError::EncodingFailed { .. })
        ));
    }
}
