use std::collections::HashMap;

use serde_json::{Map, Value};

/// Flat key → text table for one language. Nested JSON objects become
/// dotted keys (`{"home": {"title": "Hi"}}` → `home.title`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(value: &Value) -> Self {
        let mut catalog = Self::new();
        if let Value::Object(map) = value {
            flatten_into(&mut catalog.entries, "", map);
        }
        catalog
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten_into(entries: &mut HashMap<String, String>, prefix: &str, map: &Map<String, Value>) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(nested) => flatten_into(entries, &path, nested),
            Value::String(text) => {
                entries.insert(path, text.clone());
            }
            Value::Number(number) => {
                entries.insert(path, number.to_string());
            }
            Value::Bool(flag) => {
                entries.insert(path, flag.to_string());
            }
            // arrays and nulls are not addressable by key
            Value::Array(_) | Value::Null => {}
        }
    }
}

/// Recursively merges `overlay` into `base`; overlay wins on conflicts.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Replaces `{{ name }}` placeholders in a single pass. Unknown names are
/// left as written.
pub fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = after_open[..end].trim();
        match params.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after_open[end + 2..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
