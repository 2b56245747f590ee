//! Helpers over JSON objects. Key order is insertion order throughout.

use serde::{Deserialize, Serialize};
use serde_json::{ser::PrettyFormatter, Map, Value};

use crate::FormatError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: Value,
}

pub fn key_value(object: &Map<String, Value>) -> Vec<KeyValue> {
    object
        .iter()
        .map(|(key, value)| KeyValue {
            key: key.clone(),
            value: value.clone(),
        })
        .collect()
}

pub fn object_to_array(object: &Map<String, Value>) -> Vec<KeyValue> {
    key_value(object)
}

pub fn is_empty(object: &Map<String, Value>) -> bool {
    object.is_empty()
}

/// Pretty JSON indented by `spaces` (capped at ten); zero gives compact
/// output.
pub fn json_pretty(value: &Value, spaces: usize) -> Result<String, FormatError> {
    let encode_error = |e: serde_json::Error| FormatError::InvalidJson(e.to_string());
    if spaces == 0 {
        return serde_json::to_string(value).map_err(encode_error);
    }
    let indent = " ".repeat(spaces.min(10));
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(indent.as_bytes()));
    value.serialize(&mut serializer).map_err(encode_error)?;
    String::from_utf8(out).map_err(|e| FormatError::InvalidJson(e.to_string()))
}

pub fn keys(object: &Map<String, Value>) -> Vec<String> {
    object.keys().cloned().collect()
}

pub fn values(object: &Map<String, Value>) -> Vec<Value> {
    object.values().cloned().collect()
}

fn retain(object: &Map<String, Value>, keep: impl Fn(&str, &Value) -> bool) -> Map<String, Value> {
    object
        .iter()
        .filter(|(key, value)| keep(key, value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

pub fn filter_by_key(object: &Map<String, Value>, search: &str) -> Map<String, Value> {
    retain(object, |key, _| key.contains(search))
}

/// Text a value shows when concatenated into a string: strings bare,
/// arrays comma-joined, objects as `[object Object]`.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_text(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
        other => other.to_string(),
    }
}

pub fn filter_by_value(object: &Map<String, Value>, search: &str) -> Map<String, Value> {
    retain(object, |_, value| display_text(value).contains(search))
}

/// Shallow merge; keys of `overrides` win and new keys are appended.
pub fn merge(base: &Map<String, Value>, overrides: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Case-insensitive key order, ties broken by the raw key.
pub fn sort_keys(object: &Map<String, Value>) -> Map<String, Value> {
    let mut entries: Vec<(&String, &Value)> = object.iter().collect();
    entries.sort_by(|(a, _), (b, _)| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    entries
        .into_iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

pub fn reverse_keys(object: &Map<String, Value>) -> Map<String, Value> {
    object
        .iter()
        .rev()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

pub fn remove_empty_keys(object: &Map<String, Value>) -> Map<String, Value> {
    retain(object, |key, _| !key.is_empty())
}

/// Drops `null` and empty-string values.
pub fn remove_empty_values(object: &Map<String, Value>) -> Map<String, Value> {
    retain(object, |_, value| match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    })
}

pub fn omit(object: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    retain(object, |key, _| !keys.contains(&key))
}

pub fn pick(object: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    retain(object, |key, _| keys.contains(&key))
}

fn has_prototype_key(value: &Value) -> bool {
    match value {
        Value::Object(map) => map
            .iter()
            .any(|(key, nested)| key == "__proto__" || has_prototype_key(nested)),
        Value::Array(items) => items.iter().any(has_prototype_key),
        _ => false,
    }
}

/// Parses `json`, yielding an empty object for invalid input or documents
/// carrying a `__proto__` key.
pub fn safely_json_parse(json: &str) -> Value {
    match serde_json::from_str::<Value>(json) {
        Ok(value) if !has_prototype_key(&value) => value,
        _ => Value::Object(Map::new()),
    }
}

#[cfg(test)]
#[path = "tests/object_tests.rs"]
mod tests;
