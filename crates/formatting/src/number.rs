//! Locale-aware number, currency and percent rendering.
//!
//! Rounding is half away from zero on the shortest decimal representation
//! of the value, so `1.005` with two fraction digits renders `1.01`.

use std::{str::FromStr, sync::LazyLock};

use regex::Regex;

use crate::FormatError;

static DIGITS_INFO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)?(?:\.(\d+)?(?:-(\d+))?)?$").expect("digits info pattern")
});

/// `"{minInt}.{minFrac}-{maxFrac}"`, e.g. `"1.0-3"`. Omitted parts default
/// to one integer digit, no minimum fraction and at most three fraction
/// digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitsInfo {
    pub min_integer: usize,
    pub min_fraction: usize,
    pub max_fraction: usize,
}

impl DigitsInfo {
    pub const fn new(min_integer: usize, min_fraction: usize, max_fraction: usize) -> Self {
        Self {
            min_integer,
            min_fraction,
            max_fraction,
        }
    }

    pub const fn fixed(fraction: usize) -> Self {
        Self::new(1, fraction, fraction)
    }
}

impl Default for DigitsInfo {
    fn default() -> Self {
        Self::new(1, 0, 3)
    }
}

impl FromStr for DigitsInfo {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FormatError::InvalidDigitsInfo(s.to_string());
        let caps = DIGITS_INFO.captures(s.trim()).ok_or_else(invalid)?;
        let part = |i: usize| -> Result<Option<usize>, FormatError> {
            caps.get(i)
                .map(|m| m.as_str().parse().map_err(|_| invalid()))
                .transpose()
        };

        let min_integer = part(1)?.unwrap_or(1);
        let min_fraction = part(2)?.unwrap_or(0);
        let max_fraction = part(3)?.unwrap_or(min_fraction.max(3));
        if max_fraction < min_fraction {
            return Err(invalid());
        }
        Ok(Self::new(min_integer, min_fraction, max_fraction))
    }
}

/// Separators and affix placement for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLocale {
    pub group: char,
    pub decimal: char,
    /// `$1.00` rather than `1,00 $`.
    pub symbol_first: bool,
    /// `85 %` rather than `85%`.
    pub spaced_percent: bool,
}

impl NumberLocale {
    pub const EN_US: Self = Self {
        group: ',',
        decimal: '.',
        symbol_first: true,
        spaced_percent: false,
    };
    pub const VI_VN: Self = Self {
        group: '.',
        decimal: ',',
        symbol_first: false,
        spaced_percent: false,
    };
    pub const DE_DE: Self = Self {
        group: '.',
        decimal: ',',
        symbol_first: false,
        spaced_percent: true,
    };

    /// Resolves a BCP 47 tag by its language subtag; unknown languages use
    /// `en-US` conventions.
    pub fn from_tag(tag: &str) -> Self {
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "vi" => Self::VI_VN,
            "de" => Self::DE_DE,
            _ => Self::EN_US,
        }
    }
}

/// Rounds `abs` to `max_fraction` digits, returning integer and fraction
/// digit strings.
fn round_digits(abs: f64, max_fraction: usize) -> (String, String) {
    let repr = format!("{abs}");
    let (int, frac) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    if frac.len() <= max_fraction {
        return (int.to_string(), frac.to_string());
    }

    let mut digits: Vec<u8> = int.bytes().chain(frac.bytes().take(max_fraction)).collect();
    if frac.as_bytes()[max_fraction] >= b'5' {
        let mut carried = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carried = false;
                break;
            }
        }
        if carried {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - max_fraction;
    let text = String::from_utf8_lossy(&digits).into_owned();
    (text[..split].to_string(), text[split..].to_string())
}

fn group_integer(int: &str, separator: char) -> String {
    let len = int.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// Unsigned digits of `value` under `digits`, with locale separators.
fn format_magnitude(value: f64, digits: DigitsInfo, locale: NumberLocale) -> String {
    if value.is_infinite() {
        return "∞".to_string();
    }
    let (int, mut frac) = round_digits(value.abs(), digits.max_fraction);
    while frac.len() > digits.min_fraction && frac.ends_with('0') {
        frac.pop();
    }
    while frac.len() < digits.min_fraction {
        frac.push('0');
    }
    let int = format!("{int:0>width$}", width = digits.min_integer);

    let mut out = group_integer(&int, locale.group);
    if !frac.is_empty() {
        out.push(locale.decimal);
        out.push_str(&frac);
    }
    out
}

fn sign(value: f64) -> &'static str {
    if value < 0.0 {
        "-"
    } else {
        ""
    }
}

pub fn format_decimal(value: f64, digits: DigitsInfo, locale: NumberLocale) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    format!("{}{}", sign(value), format_magnitude(value, digits, locale))
}

/// `format_number(1234.567, "1.2-2", "en-US")` gives `"1,234.57"`.
pub fn format_number(value: f64, digits_info: &str, locale: &str) -> Result<String, FormatError> {
    let digits = digits_info.parse()?;
    Ok(format_decimal(value, digits, NumberLocale::from_tag(locale)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurrencyDisplay {
    #[default]
    Symbol,
    Narrow,
    Code,
}

impl FromStr for CurrencyDisplay {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "symbol" => Ok(Self::Symbol),
            "symbol-narrow" | "narrow" => Ok(Self::Narrow),
            "code" => Ok(Self::Code),
            other => Err(FormatError::UnknownKind(other.to_string())),
        }
    }
}

pub fn currency_symbol(code: &str, display: CurrencyDisplay) -> String {
    let code = code.to_ascii_uppercase();
    if display == CurrencyDisplay::Code {
        return code;
    }
    let narrow = display == CurrencyDisplay::Narrow;
    let symbol = match code.as_str() {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "VND" => "₫",
        "KRW" => "₩",
        "INR" => "₹",
        "CNY" if narrow => "¥",
        "CNY" => "CN¥",
        "AUD" if narrow => "$",
        "AUD" => "A$",
        "CAD" if narrow => "$",
        "CAD" => "CA$",
        _ => return code,
    };
    symbol.to_string()
}

/// ISO 4217 minor units for the currencies that differ from two.
pub fn currency_fraction_digits(code: &str) -> usize {
    match code.to_ascii_uppercase().as_str() {
        "JPY" | "VND" | "KRW" | "CLP" | "ISK" => 0,
        "BHD" | "KWD" | "JOD" | "OMR" | "TND" => 3,
        _ => 2,
    }
}

/// Without explicit `digits` the currency's minor units are used, so
/// `VND` renders no fraction and `USD` renders two.
pub fn format_currency(
    value: f64,
    code: &str,
    display: CurrencyDisplay,
    digits: Option<DigitsInfo>,
    locale: &str,
) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    let locale = NumberLocale::from_tag(locale);
    let digits = digits.unwrap_or_else(|| DigitsInfo::fixed(currency_fraction_digits(code)));
    let symbol = currency_symbol(code, display);
    let amount = format_magnitude(value, digits, locale);

    if locale.symbol_first {
        let gap = if symbol.chars().all(char::is_alphabetic) {
            "\u{a0}"
        } else {
            ""
        };
        format!("{}{symbol}{gap}{amount}", sign(value))
    } else {
        format!("{}{amount}\u{a0}{symbol}", sign(value))
    }
}

/// `format_percent(0.85, "1.0-2", "en-US")` gives `"85%"`.
pub fn format_percent(value: f64, digits_info: &str, locale: &str) -> Result<String, FormatError> {
    let digits = digits_info.parse()?;
    Ok(percent(value, digits, NumberLocale::from_tag(locale)))
}

pub fn percent(value: f64, digits: DigitsInfo, locale: NumberLocale) -> String {
    let number = format_decimal(value * 100.0, digits, locale);
    if locale.spaced_percent {
        format!("{number}\u{a0}%")
    } else {
        format!("{number}%")
    }
}

/// English ordinal suffix: `1st`, `11th`, `22nd`. Zero and negative values
/// take `th`.
pub fn ordinal(value: i64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let v = value % 100;
    let suffix = match v {
        1..=3 => ["st", "nd", "rd"][(v - 1) as usize],
        21.. => match (v - 20) % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
        _ => "th",
    };
    format!("{value}{suffix}")
}

/// Converts Fahrenheit to Celsius for `"C"` and Celsius to Fahrenheit for
/// `"F"`; any other unit just appends a degree sign.
pub fn convert_temp(value: f64, unit: &str) -> String {
    match unit {
        "C" => format!("{:.2} °C", (value - 32.0) * 5.0 / 9.0),
        "F" => format!("{:.2} °F", value * 9.0 / 5.0 + 32.0),
        _ => format!("{value}°"),
    }
}

#[cfg(test)]
#[path = "tests/number_tests.rs"]
mod tests;
