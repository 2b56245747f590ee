//! Runtime dispatch over the string-input transformations.
//!
//! A [`Pipe`] carries its parameters; [`Pipe::build`] assembles one from a
//! [`FormatKind`] and loosely typed [`PipeArgs`] (CLI flags, template
//! attributes), applying the same defaults as the plain functions.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde_json::{Map, Value};
use shared::domain::LangCode;

use crate::{
    array::{self, SortOrder},
    color, date, file, html,
    number::{self, CurrencyDisplay, DigitsInfo},
    object, string, FormatError,
};

macro_rules! format_kinds {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum FormatKind {
            $($variant),+
        }

        impl FormatKind {
            pub const ALL: &'static [FormatKind] = &[$(FormatKind::$variant),+];

            pub const fn name(self) -> &'static str {
                match self {
                    $(FormatKind::$variant => $name),+
                }
            }
        }
    };
}

format_kinds! {
    Truncate => "truncate",
    Reverse => "reverse",
    Pluralize => "pluralize",
    RemoveSpaces => "remove-spaces",
    HideEmail => "hide-email",
    PhoneFormat => "phone-format",
    DefaultValue => "default-value",
    RemoveSpecialChars => "remove-special-chars",
    MaskCreditCard => "mask-credit-card",
    PascalToSentence => "pascal-to-sentence",
    ExtractDomain => "extract-domain",
    CamelToSpaces => "camel-to-spaces",
    Normalize => "normalize",
    StripHtml => "strip-html",
    NlToBr => "nl-to-br",
    EncodeUrl => "encode-url",
    DecodeHtml => "decode-html",
    PlainText => "plain-text",
    TruncateHtml => "truncate-html",
    Highlight => "highlight",
    MarkdownToHtml => "markdown-to-html",
    RgbToHex => "rgb-to-hex",
    RgbToHsl => "rgb-to-hsl",
    Ordinal => "ordinal",
    ConvertTemp => "convert-temp",
    Number => "number",
    Currency => "currency",
    Percent => "percent",
    FileSize => "file-size",
    TimeAgo => "time-ago",
    ToUtc => "to-utc",
    TimeDiff => "time-diff",
    StartOfDay => "start-of-day",
    EndOfDay => "end-of-day",
    TimestampToDate => "timestamp-to-date",
    JsonPretty => "json-pretty",
    ObjectKeys => "object-keys",
    ObjectValues => "object-values",
    SortKeys => "sort-keys",
    ReverseKeys => "reverse-keys",
    Unique => "unique",
    SortArray => "sort-array",
    Count => "count",
    Sum => "sum",
    Max => "max",
    Min => "min",
}

impl FromStr for FormatKind {
    type Err = FormatError;

    /// Kebab-case, snake_case and camelCase spellings are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .iter()
            .find(|kind| kind.name().replace('-', "") == normalized)
            .copied()
            .ok_or_else(|| FormatError::UnknownKind(s.to_string()))
    }
}

/// Optional parameters gathered from the caller; each pipe reads the ones
/// it needs.
#[derive(Debug, Clone, Default)]
pub struct PipeArgs {
    pub limit: Option<usize>,
    pub trail: Option<String>,
    pub count: Option<i64>,
    pub plural: Option<String>,
    pub search: Option<String>,
    pub unit: Option<String>,
    pub decimals: Option<usize>,
    pub digits_info: Option<String>,
    pub locale: Option<String>,
    pub currency: Option<String>,
    pub display: Option<String>,
    pub default: Option<String>,
    pub time_zone: Option<String>,
    pub end: Option<String>,
    pub order: Option<String>,
    pub spaces: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pipe {
    Truncate { limit: usize, trail: String },
    Reverse,
    Pluralize { count: i64, plural: Option<String> },
    RemoveSpaces,
    HideEmail,
    PhoneFormat,
    DefaultValue { default: String },
    RemoveSpecialChars,
    MaskCreditCard,
    PascalToSentence,
    ExtractDomain,
    CamelToSpaces,
    Normalize,
    StripHtml,
    NlToBr,
    EncodeUrl,
    DecodeHtml,
    PlainText,
    TruncateHtml { limit: usize },
    Highlight { search: String },
    MarkdownToHtml,
    RgbToHex,
    RgbToHsl,
    Ordinal,
    ConvertTemp { unit: String },
    Number { digits: DigitsInfo, locale: String },
    Currency {
        code: String,
        display: CurrencyDisplay,
        digits: Option<DigitsInfo>,
        locale: String,
    },
    Percent { digits: DigitsInfo, locale: String },
    FileSize { decimals: usize },
    /// `now` defaults to the current time when applied.
    TimeAgo { now: Option<DateTime<Utc>> },
    ToUtc,
    TimeDiff { end: Option<DateTime<Utc>> },
    StartOfDay { tz: Tz },
    EndOfDay { tz: Tz },
    TimestampToDate { tz: Tz, locale: LangCode },
    JsonPretty { spaces: usize },
    ObjectKeys,
    ObjectValues,
    SortKeys,
    ReverseKeys,
    Unique,
    SortArray { order: SortOrder },
    Count,
    Sum,
    Max,
    Min,
}

fn parse_number<T: FromStr>(input: &str) -> Result<T, FormatError> {
    input
        .trim()
        .parse()
        .map_err(|_| FormatError::InvalidNumber(input.to_string()))
}

fn parse_instant(input: &str) -> Result<DateTime<Utc>, FormatError> {
    date::parse_date(input).ok_or_else(|| FormatError::InvalidDate(input.to_string()))
}

fn parse_json(input: &str) -> Result<Value, FormatError> {
    serde_json::from_str(input).map_err(|e| FormatError::InvalidJson(e.to_string()))
}

fn parse_object(input: &str) -> Result<Map<String, Value>, FormatError> {
    match parse_json(input)? {
        Value::Object(map) => Ok(map),
        other => Err(FormatError::InvalidJson(format!("expected an object, got {other}"))),
    }
}

fn parse_array(input: &str) -> Result<Vec<Value>, FormatError> {
    match parse_json(input)? {
        Value::Array(items) => Ok(items),
        other => Err(FormatError::InvalidJson(format!("expected an array, got {other}"))),
    }
}

fn parse_numbers(input: &str) -> Result<Vec<f64>, FormatError> {
    parse_array(input)?
        .iter()
        .map(|item| {
            item.as_f64()
                .ok_or_else(|| FormatError::InvalidNumber(item.to_string()))
        })
        .collect()
}

fn to_json(value: impl Into<Value>) -> String {
    value.into().to_string()
}

fn optional_number(value: Option<f64>) -> String {
    value.map_or_else(|| "null".to_string(), to_json)
}

impl Pipe {
    /// Builds the pipe for `kind`, filling unspecified parameters with
    /// their defaults.
    pub fn build(kind: FormatKind, args: &PipeArgs) -> Result<Self, FormatError> {
        let missing = |argument| FormatError::MissingArgument {
            kind: kind.name(),
            argument,
        };
        let locale = || args.locale.clone().unwrap_or_else(|| "en-US".to_string());
        let digits = |fallback: &str| {
            args.digits_info
                .as_deref()
                .unwrap_or(fallback)
                .parse::<DigitsInfo>()
        };
        let tz = || -> Result<Tz, FormatError> {
            args.time_zone
                .as_deref()
                .map_or_else(|| Ok(date::local_time_zone()), date::parse_time_zone)
        };

        Ok(match kind {
            FormatKind::Truncate => Self::Truncate {
                limit: args.limit.unwrap_or(20),
                trail: args.trail.clone().unwrap_or_else(|| "...".to_string()),
            },
            FormatKind::Reverse => Self::Reverse,
            FormatKind::Pluralize => Self::Pluralize {
                count: args.count.ok_or_else(|| missing("count"))?,
                plural: args.plural.clone(),
            },
            FormatKind::RemoveSpaces => Self::RemoveSpaces,
            FormatKind::HideEmail => Self::HideEmail,
            FormatKind::PhoneFormat => Self::PhoneFormat,
            FormatKind::DefaultValue => Self::DefaultValue {
                default: args.default.clone().unwrap_or_else(|| "N/A".to_string()),
            },
            FormatKind::RemoveSpecialChars => Self::RemoveSpecialChars,
            FormatKind::MaskCreditCard => Self::MaskCreditCard,
            FormatKind::PascalToSentence => Self::PascalToSentence,
            FormatKind::ExtractDomain => Self::ExtractDomain,
            FormatKind::CamelToSpaces => Self::CamelToSpaces,
            FormatKind::Normalize => Self::Normalize,
            FormatKind::StripHtml => Self::StripHtml,
            FormatKind::NlToBr => Self::NlToBr,
            FormatKind::EncodeUrl => Self::EncodeUrl,
            FormatKind::DecodeHtml => Self::DecodeHtml,
            FormatKind::PlainText => Self::PlainText,
            FormatKind::TruncateHtml => Self::TruncateHtml {
                limit: args.limit.ok_or_else(|| missing("limit"))?,
            },
            FormatKind::Highlight => Self::Highlight {
                search: args.search.clone().unwrap_or_default(),
            },
            FormatKind::MarkdownToHtml => Self::MarkdownToHtml,
            FormatKind::RgbToHex => Self::RgbToHex,
            FormatKind::RgbToHsl => Self::RgbToHsl,
            FormatKind::Ordinal => Self::Ordinal,
            FormatKind::ConvertTemp => Self::ConvertTemp {
                unit: args.unit.clone().ok_or_else(|| missing("unit"))?,
            },
            FormatKind::Number => Self::Number {
                digits: digits("1.0-3")?,
                locale: locale(),
            },
            FormatKind::Currency => Self::Currency {
                code: args.currency.clone().unwrap_or_else(|| "USD".to_string()),
                display: args.display.as_deref().unwrap_or("symbol").parse()?,
                digits: args
                    .digits_info
                    .as_deref()
                    .map(str::parse::<DigitsInfo>)
                    .transpose()?,
                locale: locale(),
            },
            FormatKind::Percent => Self::Percent {
                digits: digits("1.0-2")?,
                locale: locale(),
            },
            FormatKind::FileSize => Self::FileSize {
                decimals: args.decimals.unwrap_or(2),
            },
            FormatKind::TimeAgo => Self::TimeAgo { now: None },
            FormatKind::ToUtc => Self::ToUtc,
            FormatKind::TimeDiff => Self::TimeDiff {
                end: args.end.as_deref().map(parse_instant).transpose()?,
            },
            FormatKind::StartOfDay => Self::StartOfDay { tz: tz()? },
            FormatKind::EndOfDay => Self::EndOfDay { tz: tz()? },
            FormatKind::TimestampToDate => Self::TimestampToDate {
                tz: tz()?,
                locale: args
                    .locale
                    .as_deref()
                    .and_then(LangCode::from_tag)
                    .unwrap_or_default(),
            },
            FormatKind::JsonPretty => Self::JsonPretty {
                spaces: args.spaces.unwrap_or(2),
            },
            FormatKind::ObjectKeys => Self::ObjectKeys,
            FormatKind::ObjectValues => Self::ObjectValues,
            FormatKind::SortKeys => Self::SortKeys,
            FormatKind::ReverseKeys => Self::ReverseKeys,
            FormatKind::Unique => Self::Unique,
            FormatKind::SortArray => Self::SortArray {
                order: args.order.as_deref().unwrap_or("asc").parse()?,
            },
            FormatKind::Count => Self::Count,
            FormatKind::Sum => Self::Sum,
            FormatKind::Max => Self::Max,
            FormatKind::Min => Self::Min,
        })
    }

    pub fn kind(&self) -> FormatKind {
        match self {
            Self::Truncate { .. } => FormatKind::Truncate,
            Self::Reverse => FormatKind::Reverse,
            Self::Pluralize { .. } => FormatKind::Pluralize,
            Self::RemoveSpaces => FormatKind::RemoveSpaces,
            Self::HideEmail => FormatKind::HideEmail,
            Self::PhoneFormat => FormatKind::PhoneFormat,
            Self::DefaultValue { .. } => FormatKind::DefaultValue,
            Self::RemoveSpecialChars => FormatKind::RemoveSpecialChars,
            Self::MaskCreditCard => FormatKind::MaskCreditCard,
            Self::PascalToSentence => FormatKind::PascalToSentence,
            Self::ExtractDomain => FormatKind::ExtractDomain,
            Self::CamelToSpaces => FormatKind::CamelToSpaces,
            Self::Normalize => FormatKind::Normalize,
            Self::StripHtml => FormatKind::StripHtml,
            Self::NlToBr => FormatKind::NlToBr,
            Self::EncodeUrl => FormatKind::EncodeUrl,
            Self::DecodeHtml => FormatKind::DecodeHtml,
            Self::PlainText => FormatKind::PlainText,
            Self::TruncateHtml { .. } => FormatKind::TruncateHtml,
            Self::Highlight { .. } => FormatKind::Highlight,
            Self::MarkdownToHtml => FormatKind::MarkdownToHtml,
            Self::RgbToHex => FormatKind::RgbToHex,
            Self::RgbToHsl => FormatKind::RgbToHsl,
            Self::Ordinal => FormatKind::Ordinal,
            Self::ConvertTemp { .. } => FormatKind::ConvertTemp,
            Self::Number { .. } => FormatKind::Number,
            Self::Currency { .. } => FormatKind::Currency,
            Self::Percent { .. } => FormatKind::Percent,
            Self::FileSize { .. } => FormatKind::FileSize,
            Self::TimeAgo { .. } => FormatKind::TimeAgo,
            Self::ToUtc => FormatKind::ToUtc,
            Self::TimeDiff { .. } => FormatKind::TimeDiff,
            Self::StartOfDay { .. } => FormatKind::StartOfDay,
            Self::EndOfDay { .. } => FormatKind::EndOfDay,
            Self::TimestampToDate { .. } => FormatKind::TimestampToDate,
            Self::JsonPretty { .. } => FormatKind::JsonPretty,
            Self::ObjectKeys => FormatKind::ObjectKeys,
            Self::ObjectValues => FormatKind::ObjectValues,
            Self::SortKeys => FormatKind::SortKeys,
            Self::ReverseKeys => FormatKind::ReverseKeys,
            Self::Unique => FormatKind::Unique,
            Self::SortArray { .. } => FormatKind::SortArray,
            Self::Count => FormatKind::Count,
            Self::Sum => FormatKind::Sum,
            Self::Max => FormatKind::Max,
            Self::Min => FormatKind::Min,
        }
    }

    /// Transforms `input`. Numeric, date and JSON pipes parse their input
    /// first and report a typed error when it does not fit; JSON pipes
    /// render their result as compact JSON.
    pub fn apply(&self, input: &str) -> Result<String, FormatError> {
        Ok(match self {
            Self::Truncate { limit, trail } => string::truncate(input, *limit, trail),
            Self::Reverse => string::reverse(input),
            Self::Pluralize { count, plural } => {
                string::pluralize(input, *count, plural.as_deref())
            }
            Self::RemoveSpaces => string::remove_spaces(input),
            Self::HideEmail => string::hide_email(input),
            Self::PhoneFormat => string::phone_format(input),
            Self::DefaultValue { default } => string::default_value(input, default).to_string(),
            Self::RemoveSpecialChars => string::remove_special_chars(input),
            Self::MaskCreditCard => string::mask_credit_card(input),
            Self::PascalToSentence => string::pascal_to_sentence(input),
            Self::ExtractDomain => string::extract_domain(input),
            Self::CamelToSpaces => string::camel_to_spaces(input),
            Self::Normalize => string::normalize(input),
            Self::StripHtml => html::strip_html(input),
            Self::NlToBr => html::nl_to_br(input),
            Self::EncodeUrl => html::encode_url(input),
            Self::DecodeHtml => html::decode_html(input),
            Self::PlainText => html::plain_text(input),
            Self::TruncateHtml { limit } => html::truncate_html(input, *limit),
            Self::Highlight { search } => html::highlight(input, search),
            Self::MarkdownToHtml => html::markdown_to_html(input),
            Self::RgbToHex => color::rgb_to_hex(input),
            Self::RgbToHsl => color::rgb_to_hsl(input),
            Self::Ordinal => number::ordinal(parse_number(input)?),
            Self::ConvertTemp { unit } => number::convert_temp(parse_number(input)?, unit),
            Self::Number { digits, locale } => number::format_decimal(
                parse_number(input)?,
                *digits,
                number::NumberLocale::from_tag(locale),
            ),
            Self::Currency {
                code,
                display,
                digits,
                locale,
            } => number::format_currency(parse_number(input)?, code, *display, *digits, locale),
            Self::Percent { digits, locale } => number::percent(
                parse_number(input)?,
                *digits,
                number::NumberLocale::from_tag(locale),
            ),
            Self::FileSize { decimals } => file::file_size(parse_number(input)?, *decimals),
            Self::TimeAgo { now } => {
                date::time_ago_at(parse_instant(input)?, now.unwrap_or_else(Utc::now))
            }
            Self::ToUtc => date::iso_string(parse_instant(input)?),
            Self::TimeDiff { end } => {
                date::time_diff(parse_instant(input)?, end.unwrap_or_else(Utc::now))
            }
            Self::StartOfDay { tz } => date::iso_string(date::start_of_day(parse_instant(input)?, *tz)),
            Self::EndOfDay { tz } => date::iso_string(date::end_of_day(parse_instant(input)?, *tz)),
            Self::TimestampToDate { tz, locale } => {
                date::timestamp_to_date(parse_number(input)?, *tz, *locale)
                    .ok_or_else(|| FormatError::InvalidDate(input.to_string()))?
            }
            Self::JsonPretty { spaces } => object::json_pretty(&parse_json(input)?, *spaces)?,
            Self::ObjectKeys => to_json(object::keys(&parse_object(input)?)),
            Self::ObjectValues => to_json(object::values(&parse_object(input)?)),
            Self::SortKeys => to_json(object::sort_keys(&parse_object(input)?)),
            Self::ReverseKeys => to_json(object::reverse_keys(&parse_object(input)?)),
            Self::Unique => to_json(array::unique(&parse_array(input)?)),
            Self::SortArray { order } => to_json(array::sort_values(&parse_array(input)?, *order)),
            Self::Count => array::count(&parse_array(input)?).to_string(),
            Self::Sum => to_json(array::sum(&parse_numbers(input)?)),
            Self::Max => optional_number(array::max(&parse_numbers(input)?)),
            Self::Min => optional_number(array::min(&parse_numbers(input)?)),
        })
    }
}

#[cfg(test)]
#[path = "tests/pipe_tests.rs"]
mod tests;
