use std::sync::LazyLock;

use rand::{distributions::Alphanumeric, Rng};
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static PHONE_GROUPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{3})(\d{3})(\d{4})").expect("phone pattern"));
static SPECIAL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9 ]").expect("special chars pattern"));
static URL_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+:|)//").expect("scheme pattern"));
static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").expect("camel pattern"));

/// Cuts `value` to `limit` characters and appends `trail` when anything was
/// removed.
pub fn truncate(value: &str, limit: usize, trail: &str) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(limit).collect();
    cut.push_str(trail);
    cut
}

pub fn reverse(value: &str) -> String {
    value.chars().rev().collect()
}

/// `"1 item"`, `"3 items"`, or `"3 people"` with an explicit plural form.
pub fn pluralize(word: &str, count: i64, plural_form: Option<&str>) -> String {
    if count == 1 {
        return format!("{count} {word}");
    }
    match plural_form.filter(|form| !form.is_empty()) {
        Some(form) => format!("{count} {form}"),
        None => format!("{count} {word}s"),
    }
}

pub fn remove_spaces(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Keeps the first and last character of the local part: `j***n@mail.com`.
pub fn hide_email(email: &str) -> String {
    let mut parts = email.split('@');
    let (Some(name), Some(domain)) = (parts.next(), parts.next()) else {
        return email.to_string();
    };
    let first = name.chars().next().map(String::from).unwrap_or_default();
    let last = name.chars().last().map(String::from).unwrap_or_default();
    format!("{first}***{last}@{domain}")
}

/// Strips everything but digits and renders the first ten as
/// `(123) 456-7890`. Extra digits stay attached to the last group.
pub fn phone_format(value: &str) -> String {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    PHONE_GROUPS.replacen(&digits, 1, "($1) $2-$3").into_owned()
}

pub fn default_value<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

/// Keeps ASCII letters, digits and spaces.
pub fn remove_special_chars(value: &str) -> String {
    SPECIAL_CHARS.replace_all(value, "").into_owned()
}

/// Masks every character except the last four.
pub fn mask_credit_card(value: &str) -> String {
    let total = value.chars().count();
    let visible: String = value.chars().skip(total.saturating_sub(4)).collect();
    format!("{}{visible}", "*".repeat(total.saturating_sub(4)))
}

/// `"PascalCaseName"` becomes `"Pascal Case Name"`.
pub fn pascal_to_sentence(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        if c.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(c);
    }
    out.trim().to_string()
}

/// Host part of a URL, with or without a scheme.
pub fn extract_domain(url: &str) -> String {
    let rest = URL_SCHEME.replace(url, "");
    rest.split('/').next().unwrap_or_default().to_string()
}

/// `"camelCaseName"` becomes `"Camel Case Name"`.
pub fn camel_to_spaces(value: &str) -> String {
    let spaced = CAMEL_BOUNDARY.replace_all(value, "$1 $2");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

pub fn uuid_v4() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Removes diacritics by decomposing and dropping combining marks, so
/// `"Tiếng Việt"` becomes `"Tieng Viet"`.
pub fn normalize(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

#[cfg(test)]
#[path = "tests/string_tests.rs"]
mod tests;
