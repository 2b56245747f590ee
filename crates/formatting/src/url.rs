use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};
use url::{form_urlencoded, Url};

const HEX: &[u8; 16] = b"0123456789ABCDEF";

fn keep_unescaped(byte: u8, strict: bool) -> bool {
    match byte {
        b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => true,
        b'!' | b'\'' | b'(' | b')' | b'*' => !strict,
        _ => false,
    }
}

fn percent_encode(value: &str, strict: bool) -> String {
    let mut out = String::with_capacity(value.len());
    for &byte in value.as_bytes() {
        if keep_unescaped(byte, strict) {
            out.push(char::from(byte));
        } else {
            out.push('%');
            out.push(char::from(HEX[usize::from(byte >> 4)]));
            out.push(char::from(HEX[usize::from(byte & 0x0f)]));
        }
    }
    out
}

/// Percent-encodes everything outside the URI component unreserved set,
/// leaving `! ' ( ) *` intact like browsers do.
pub fn encode_uri_component(value: &str) -> String {
    percent_encode(value, false)
}

/// Decodes `%XX` escapes and `+` as space. Malformed escapes are kept
/// literally.
pub fn decode_component(value: &str) -> String {
    decode(value, true)
}

/// Decodes `%XX` escapes only; `+` stays literal as it does in URL paths.
pub fn decode_path_segment(value: &str) -> String {
    decode(value, false)
}

fn decode(value: &str, plus_as_space: bool) -> String {
    let mut escaped = value.replace('&', "%26").replace('=', "%3D");
    if !plus_as_space {
        escaped = escaped.replace('+', "%2B");
    }
    form_urlencoded::parse(escaped.as_bytes())
        .next()
        .map(|(decoded, _)| decoded.into_owned())
        .unwrap_or_default()
}

/// Substitutes `:name` placeholders, first occurrence per param.
pub fn replace_path_params(path: &str, params: &[(&str, &str)]) -> String {
    params.iter().fold(path.to_string(), |acc, (key, value)| {
        acc.replacen(&format!(":{key}"), value, 1)
    })
}

/// Matches `url` against a route pattern of literal segments and `:name`
/// params (a trailing `:name?` is optional). A trailing slash on `url` is
/// tolerated. Returns the decoded params on success.
pub fn match_path(pattern: &str, url: &str) -> Option<HashMap<String, String>> {
    let pattern_segments: Vec<&str> = pattern.trim_end_matches('/').split('/').collect();
    let url = url.split(['?', '#']).next().unwrap_or_default();
    let url_segments: Vec<&str> = url.trim_end_matches('/').split('/').collect();

    let mut params = HashMap::new();
    let mut remaining = url_segments.iter();
    for segment in &pattern_segments {
        let actual = remaining.next();
        match (segment.strip_prefix(':'), actual) {
            (Some(name), actual) if name.ends_with('?') => {
                if let Some(value) = actual.filter(|v| !v.is_empty()) {
                    params.insert(name.trim_end_matches('?').to_string(), decode_path_segment(value));
                }
            }
            (Some(name), Some(value)) if !value.is_empty() => {
                params.insert(name.to_string(), decode_path_segment(value));
            }
            (None, Some(value)) if value == segment => {}
            _ => return None,
        }
    }
    remaining.next().is_none().then_some(params)
}

pub fn is_match(pattern: &str, url: &str) -> bool {
    match_path(pattern, url).is_some()
}

/// Path of an absolute URL, or empty when it does not parse.
pub fn path_from_url(url: &str) -> String {
    Url::parse(url)
        .map(|parsed| parsed.path().to_string())
        .unwrap_or_default()
}

/// Parses a query string (or the query of a full URL) into an object with
/// sorted keys. Repeated keys collect into arrays and a key without `=`
/// maps to `null`.
pub fn parse_query_string(input: &str) -> Map<String, Value> {
    let query = match input.split_once('?') {
        Some((_, query)) => query,
        None => input.trim_start_matches('#'),
    };
    let query = query.split('#').next().unwrap_or_default();

    let mut collected: BTreeMap<String, Vec<Value>> = BTreeMap::new();
    for pair in query.split('&').filter(|pair| !pair.is_empty()) {
        let Some((key, value)) = form_urlencoded::parse(pair.as_bytes()).next() else {
            continue;
        };
        let value = if pair.contains('=') {
            Value::String(value.into_owned())
        } else {
            Value::Null
        };
        collected.entry(key.into_owned()).or_default().push(value);
    }

    collected
        .into_iter()
        .map(|(key, mut values)| {
            let value = if values.len() == 1 {
                values.remove(0)
            } else {
                Value::Array(values)
            };
            (key, value)
        })
        .collect()
}

fn scalar_to_query(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Inverse of [`parse_query_string`]: sorted keys, arrays repeat the key,
/// `null` renders the bare key and nested objects are skipped.
pub fn build_query_string(params: &Map<String, Value>) -> String {
    let mut keys: Vec<&String> = params.keys().collect();
    keys.sort();

    let mut pairs = Vec::new();
    for key in keys {
        let encoded_key = percent_encode(key, true);
        match &params[key] {
            Value::Null => pairs.push(encoded_key),
            Value::Array(items) => pairs.extend(
                items
                    .iter()
                    .filter_map(scalar_to_query)
                    .map(|item| format!("{encoded_key}={}", percent_encode(&item, true))),
            ),
            other => {
                if let Some(item) = scalar_to_query(other) {
                    pairs.push(format!("{encoded_key}={}", percent_encode(&item, true)));
                }
            }
        }
    }
    pairs.join("&")
}

pub fn query_param(url: &str, key: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let value = parsed
        .query_pairs()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.into_owned());
    value
}

/// Joins path parts with single slashes, dropping empty parts.
pub fn join_paths(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim_matches('/'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// `scheme://host[:port]` of an absolute URL.
pub fn base_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{}://{host}:{port}", parsed.scheme()),
        None => format!("{}://{host}", parsed.scheme()),
    })
}

#[cfg(test)]
#[path = "tests/url_tests.rs"]
mod tests;
