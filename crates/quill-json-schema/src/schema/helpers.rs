//! Helper functions for reading keyword values out of a schema object
//!
//! Keyword parsing is tolerant: a keyword whose value has the wrong JSON
//! shape is skipped rather than reported, so every helper returns `Option`.

use serde_json::{Map, Value};

/// Get a string value by key
pub(super) fn get_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str)
}

/// Get a number value by key
pub(super) fn get_f64(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64)
}

/// Get a non-negative integer value by key
pub(super) fn get_usize(obj: &Map<String, Value>, key: &str) -> Option<usize> {
    obj.get(key).and_then(Value::as_u64).map(|n| n as usize)
}

/// Get a boolean value by key
pub(super) fn get_bool(obj: &Map<String, Value>, key: &str) -> Option<bool> {
    obj.get(key).and_then(Value::as_bool)
}

/// Get an object value by key
pub(super) fn get_object<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
) -> Option<&'a Map<String, Value>> {
    obj.get(key).and_then(Value::as_object)
}

/// Get an array value by key
pub(super) fn get_array<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Vec<Value>> {
    obj.get(key).and_then(Value::as_array)
}

/// Get an array of strings by key; non-string entries are dropped
pub(super) fn get_string_list(obj: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    get_array(obj, key).map(|items| {
        items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect()
    })
}
