//! Property-based test generators using proptest.
//!
//! Provides strategies for keys and JSON values that can be stored through
//! the facade.

use proptest::prelude::*;
use serde_json::Value;

/// Strategy for storage keys, including whitespace and symbols.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ a-zA-Z0-9_$.:-]{1,16}").expect("Invalid regex")
}

fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-4000i32..4000).prop_map(|n| Value::from(f64::from(n) / 4.0)),
        ".{0,12}".prop_map(Value::String),
        // Strings that are themselves JSON text.
        prop::sample::select(vec!["1", "null", "true", "\"hi\"", "{}", "[1]"])
            .prop_map(|text| Value::String(text.to_owned())),
    ]
}

/// Strategy for arbitrary JSON values up to a few levels deep.
pub fn json_value_strategy() -> impl Strategy<Value = Value> {
    leaf_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{0,6}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}
