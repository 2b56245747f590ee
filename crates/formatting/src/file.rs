use std::{fmt, str::FromStr, sync::LazyLock};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use regex::Regex;
use url::Url;

use crate::FormatError;

static MIME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":([^;]*);").expect("mime pattern"));

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Human readable size with 1024 steps: `1024` gives `"1 KB"`, `1536`
/// gives `"1.5 KB"`. Trailing zeros of the fraction are dropped.
pub fn file_size(size: u64, decimals: usize) -> String {
    if size == 0 {
        return "0 Bytes".to_string();
    }
    let mut exponent = 0;
    while exponent + 1 < SIZE_UNITS.len() && size >= 1024u64.pow(exponent as u32 + 1) {
        exponent += 1;
    }
    let scaled = size as f64 / 1024f64.powi(exponent as i32);
    let rounded: f64 = format!("{scaled:.decimals$}").parse().unwrap_or(scaled);
    format!("{rounded} {}", SIZE_UNITS[exponent])
}

/// A `data:<mime>;base64,<payload>` URL with its payload decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub data: Vec<u8>,
}

impl DataUrl {
    pub fn new(mime: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            mime: mime.into(),
            data: data.into(),
        }
    }
}

impl FromStr for DataUrl {
    type Err = FormatError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let (header, payload) = src
            .split_once(',')
            .ok_or_else(|| FormatError::InvalidDataUrl("missing ','".to_string()))?;
        let mime = MIME
            .captures(header)
            .map(|caps| caps[1].to_string())
            .ok_or_else(|| FormatError::InvalidDataUrl(format!("no MIME type in '{header}'")))?;
        let data = STANDARD
            .decode(payload.trim())
            .map_err(|e| FormatError::InvalidDataUrl(e.to_string()))?;
        Ok(Self { mime, data })
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime, STANDARD.encode(&self.data))
    }
}

pub fn is_valid_url(url: &str) -> bool {
    Url::parse(url).is_ok()
}

/// Last path segment with any query string removed.
pub fn file_name_from_path(path: &str) -> String {
    path.split('?')
        .next()
        .and_then(|path| path.rsplit('/').next())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
#[path = "tests/file_tests.rs"]
mod tests;
