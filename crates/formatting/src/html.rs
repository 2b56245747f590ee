use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::url::encode_uri_component;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("br pattern"));
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("entity pattern")
});
static MARKDOWN: LazyLock<[(Regex, &'static str); 4]> = LazyLock::new(|| {
    [
        (r"\*\*(.*?)\*\*", "<b>$1</b>"),
        (r"\*(.*?)\*", "<i>$1</i>"),
        (r"__(.*?)__", "<b>$1</b>"),
        (r"_(.*?)_", "<i>$1</i>"),
    ]
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("markdown pattern"), replacement))
});

pub fn strip_html(value: &str) -> String {
    TAG.replace_all(value, "").into_owned()
}

pub fn nl_to_br(value: &str) -> String {
    value.replace('\n', "<br>")
}

pub fn encode_url(value: &str) -> String {
    encode_uri_component(value)
}

fn named_entity(name: &str) -> Option<char> {
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '©',
        "reg" => '®',
        "hellip" => '…',
        "ndash" => '–',
        "mdash" => '—',
        _ => return None,
    })
}

/// Decodes named and numeric character references. Unknown entities are
/// left untouched.
pub fn decode_html(value: &str) -> String {
    ENTITY
        .replace_all(value, |caps: &Captures| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body.strip_prefix("#x").or(body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse().ok().and_then(char::from_u32)
            } else {
                named_entity(body)
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// Text content of an HTML fragment: `<br>` becomes a newline, other tags
/// are dropped and entities decoded.
pub fn plain_text(value: &str) -> String {
    let with_breaks = LINE_BREAK.replace_all(value, "\n");
    decode_html(&strip_html(&with_breaks))
}

/// Truncates the text content of an HTML fragment to `limit` characters.
pub fn truncate_html(value: &str, limit: usize) -> String {
    let text = plain_text(value);
    if text.chars().count() > limit {
        let mut cut: String = text.chars().take(limit).collect();
        cut.push_str("...");
        cut
    } else {
        text
    }
}

/// Wraps every case-insensitive occurrence of `search` in `<mark>`.
/// `search` is matched literally.
pub fn highlight(value: &str, search: &str) -> String {
    if search.is_empty() {
        return value.to_string();
    }
    let Ok(pattern) = Regex::new(&format!("(?i){}", regex::escape(search))) else {
        return value.to_string();
    };
    pattern.replace_all(value, "<mark>$0</mark>").into_owned()
}

/// Bold and italic only: `**b**`, `__b__`, `*i*`, `_i_`.
pub fn markdown_to_html(value: &str) -> String {
    MARKDOWN
        .iter()
        .fold(value.to_string(), |acc, (pattern, replacement)| {
            pattern.replace_all(&acc, *replacement).into_owned()
        })
}

#[cfg(test)]
#[path = "tests/html_tests.rs"]
mod tests;
