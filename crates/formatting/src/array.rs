use std::{cmp::Ordering, collections::HashMap, hash::Hash, str::FromStr};

use rand::{seq::SliceRandom, Rng};
use serde_json::{Map, Value};

use crate::{object::display_text, FormatError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(FormatError::UnknownKind(s.to_string())),
        }
    }
}

/// Items whose string `property` contains `search`, ignoring case. An
/// empty search keeps everything.
pub fn filter_by_property(items: &[Value], search: &str, property: &str) -> Vec<Value> {
    if search.is_empty() {
        return items.to_vec();
    }
    let needle = search.to_lowercase();
    items
        .iter()
        .filter(|item| {
            item.get(property)
                .and_then(Value::as_str)
                .is_some_and(|text| text.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// First occurrence of every distinct item, in order. Equality is deep for
/// JSON values.
pub fn unique<T: PartialEq + Clone>(items: &[T]) -> Vec<T> {
    let mut seen: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !seen.contains(item) {
            seen.push(item.clone());
        }
    }
    seen
}

/// Splits into runs of `size`; the last run may be shorter. A zero size
/// yields no chunks.
pub fn chunk<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    if size == 0 {
        return Vec::new();
    }
    items.chunks(size).map(<[T]>::to_vec).collect()
}

/// The `index`-th run of `size` items, empty past the end.
pub fn get_chunk<T: Clone>(items: &[T], size: usize, index: usize) -> Vec<T> {
    let start = size.saturating_mul(index).min(items.len());
    let end = start.saturating_add(size).min(items.len());
    items[start..end].to_vec()
}

pub fn sort<T: PartialOrd + Clone>(items: &[T], order: SortOrder) -> Vec<T> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = a.partial_cmp(b).unwrap_or(Ordering::Equal);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    sorted
}

/// Numbers before strings before everything else; numbers compare by value
/// and strings lexically.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Number(_) => 0,
            Value::String(_) => 1,
            _ => 2,
        }
    }
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

pub fn sort_values(items: &[Value], order: SortOrder) -> Vec<Value> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| match order {
        SortOrder::Asc => compare_values(a, b),
        SortOrder::Desc => compare_values(b, a),
    });
    sorted
}

/// The last `n` items (all of them when `n` exceeds the length).
/// The last `n` items. Zero keeps the whole slice, like `slice(-0)`.
pub fn last_n<T: Clone>(items: &[T], n: usize) -> Vec<T> {
    if n == 0 {
        return items.to_vec();
    }
    items[items.len().saturating_sub(n)..].to_vec()
}

pub fn shuffle_with<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    shuffle_with(items, &mut rand::thread_rng())
}

pub fn count<T>(items: &[T]) -> usize {
    items.len()
}

/// First item for each distinct value of `key`.
pub fn unique_by_key(items: &[Value], key: &str) -> Vec<Value> {
    let mut seen: Vec<Option<&Value>> = Vec::new();
    let mut out = Vec::new();
    for item in items {
        let id = item.get(key);
        if !seen.contains(&id) {
            seen.push(id);
            out.push(item.clone());
        }
    }
    out
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Whether every item of `second` appears in `first`.
pub fn is_contains<T: PartialEq>(first: &[T], second: &[T]) -> bool {
    second.iter().all(|item| first.contains(item))
}

/// Same length and every item of `first` appears in `second`.
pub fn is_equal<T: PartialEq>(first: &[T], second: &[T]) -> bool {
    first.len() == second.len() && is_contains(second, first)
}

/// Applies stable sorts in sequence, so the last comparator decides and
/// earlier ones break its ties.
pub fn multi_sort<T: Clone>(items: &[T], comparators: &[&dyn Fn(&T, &T) -> Ordering]) -> Vec<T> {
    let mut sorted = items.to_vec();
    for compare in comparators {
        sorted.sort_by(|a, b| compare(a, b));
    }
    sorted
}

/// Index by a derived key; later items replace earlier ones.
pub fn mapping<T: Clone, K: Eq + Hash>(items: &[T], key: impl Fn(&T) -> K) -> HashMap<K, T> {
    items.iter().map(|item| (key(item), item.clone())).collect()
}

/// One entry per distinct `key` value, rendered as text; later items replace
/// earlier ones. Items without the key are skipped.
pub fn group_by_key(items: &[Value], key: &str) -> Map<String, Value> {
    let mut grouped = Map::new();
    for item in items {
        if let Some(id) = item.get(key) {
            grouped.insert(display_text(id), item.clone());
        }
    }
    grouped
}

/// The array itself, or empty for any other JSON value.
pub fn validate_array(value: &Value) -> Vec<Value> {
    value.as_array().cloned().unwrap_or_default()
}

#[cfg(test)]
#[path = "tests/array_tests.rs"]
mod tests;
