//! Date parsing, pattern formatting and relative time.
//!
//! Patterns use dayjs-style tokens (`YYYY MM DD Do dddd HH hh A SSS Z Q Qo`,
//! `[literal]`). Inputs without an offset are read as UTC. Functions that
//! depend on the current time have an `_at` variant taking `now`.

use std::{str::FromStr, sync::LazyLock};

use chrono::{
    DateTime, Datelike, Months, NaiveDate, NaiveDateTime, Offset, SecondsFormat, TimeZone,
    Timelike, Utc,
};
use chrono_tz::Tz;
use regex::Regex;
use shared::domain::LangCode;

use crate::{number, FormatError};

macro_rules! date_formats {
    ($($variant:ident => ($name:literal, $pattern:literal)),+ $(,)?) => {
        /// Named patterns shared across the UI.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum DateFormat {
            #[default]
            $($variant),+
        }

        impl DateFormat {
            pub const ALL: &'static [DateFormat] = &[$(DateFormat::$variant),+];

            pub const fn name(self) -> &'static str {
                match self {
                    $(DateFormat::$variant => $name),+
                }
            }

            pub const fn pattern(self) -> &'static str {
                match self {
                    $(DateFormat::$variant => $pattern),+
                }
            }
        }
    };
}

date_formats! {
    DayMonthYear => ("day-month-year", "DD/MM/YYYY"),
    YearMonthDay => ("year-month-day", "YYYY/MM/DD"),
    HourMinute => ("hour-minute", "HH:mm"),
    DateTime => ("date-time", "DD/MM/YYYY HH:mm:ss"),
    TimeDate => ("time-date", "HH:mm DD/MM/YYYY"),
    DayMonth => ("day-month", "DD/MM"),
    MonthYear => ("month-year", "MM/YYYY"),
    IsoDate => ("iso-date", "YYYY-MM-DD"),
    LongDate => ("long-date", "dddd, DD MMMM YYYY"),
    MediumDate => ("medium-date", "MMM DD, YYYY"),
    Year => ("year", "YYYY"),
    Time => ("time", "HH:mm:ss"),
    Time12h => ("time-12h", "hh:mm A"),
    Iso8601 => ("iso-8601", "YYYY-MM-DDTHH:mm:ssZ"),
    DayMonthYearDashed => ("day-month-year-dashed", "DD-MM-YYYY"),
    MonthDayYearDashed => ("month-day-year-dashed", "MM-DD-YYYY"),
    DayMonthYearDotted => ("day-month-year-dotted", "DD.MM.YYYY"),
    YearMonthDayDotted => ("year-month-day-dotted", "YYYY.MM.DD"),
    ShortDayMonthYear => ("short-day-month-year", "D MMM YYYY"),
    OrdinalDate => ("ordinal-date", "Do MMMM YYYY"),
    Time12hSeconds => ("time-12h-seconds", "hh:mm:ss A"),
    TimeMillis => ("time-millis", "HH:mm:ss.SSS"),
    LongMonthDate => ("long-month-date", "MMMM DD, YYYY"),
    YearMonthDayTime => ("year-month-day-time", "YYYY/MM/DD HH:mm:ss"),
    Weekday => ("weekday", "dddd"),
    WeekdayShort => ("weekday-short", "ddd"),
    MonthShort => ("month-short", "MMM"),
    Month => ("month", "MMMM"),
    QuarterYear => ("quarter-year", "Q YYYY"),
    OrdinalQuarterYear => ("ordinal-quarter-year", "Qo [quarter] YYYY"),
}

impl DateFormat {
    /// The pattern of a named format, or `input` itself when it names none.
    pub fn resolve(input: &str) -> &str {
        match input.parse::<Self>() {
            Ok(format) => format.pattern(),
            Err(_) => input,
        }
    }
}

impl FromStr for DateFormat {
    type Err = FormatError;

    /// Accepts the kebab-case name or the 1-based position (`format-4`,
    /// `FORMAT_4`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        let by_position = key
            .strip_prefix("format-")
            .and_then(|n| n.parse::<usize>().ok())
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| Self::ALL.get(i));
        by_position
            .or_else(|| Self::ALL.iter().find(|format| format.name() == key))
            .copied()
            .ok_or_else(|| FormatError::UnknownDateFormat(s.to_string()))
    }
}

struct LocaleNames {
    months: [&'static str; 12],
    months_short: [&'static str; 12],
    weekdays: [&'static str; 7],
    weekdays_short: [&'static str; 7],
    weekdays_min: [&'static str; 7],
    relative: RelativeWords,
}

struct RelativeWords {
    future: &'static str,
    past: &'static str,
    /// Indexed like [`THRESHOLDS`].
    units: [&'static str; 11],
}

const EN: LocaleNames = LocaleNames {
    months: [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ],
    months_short: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    weekdays: [
        "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
    ],
    weekdays_short: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
    weekdays_min: ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"],
    relative: RelativeWords {
        future: "in %s",
        past: "%s ago",
        units: [
            "a few seconds", "a minute", "%d minutes", "an hour", "%d hours", "a day", "%d days",
            "a month", "%d months", "a year", "%d years",
        ],
    },
};

const VI: LocaleNames = LocaleNames {
    months: [
        "tháng 1", "tháng 2", "tháng 3", "tháng 4", "tháng 5", "tháng 6", "tháng 7", "tháng 8",
        "tháng 9", "tháng 10", "tháng 11", "tháng 12",
    ],
    months_short: [
        "Thg 01", "Thg 02", "Thg 03", "Thg 04", "Thg 05", "Thg 06", "Thg 07", "Thg 08", "Thg 09",
        "Thg 10", "Thg 11", "Thg 12",
    ],
    weekdays: [
        "chủ nhật", "thứ hai", "thứ ba", "thứ tư", "thứ năm", "thứ sáu", "thứ bảy",
    ],
    weekdays_short: ["CN", "T2", "T3", "T4", "T5", "T6", "T7"],
    weekdays_min: ["CN", "T2", "T3", "T4", "T5", "T6", "T7"],
    relative: RelativeWords {
        future: "%s tới",
        past: "%s trước",
        units: [
            "vài giây", "một phút", "%d phút", "một giờ", "%d giờ", "một ngày", "%d ngày",
            "một tháng", "%d tháng", "một năm", "%d năm",
        ],
    },
};

fn names(locale: LangCode) -> &'static LocaleNames {
    match locale {
        LangCode::En => &EN,
        LangCode::Vi => &VI,
    }
}

fn ordinal(n: i64, locale: LangCode) -> String {
    match locale {
        LangCode::En => number::ordinal(n),
        LangCode::Vi => n.to_string(),
    }
}

/// Parses RFC 3339 / RFC 2822 timestamps, ISO-like local date-times and
/// plain dates. Values without an offset are taken as UTC.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc));
    }
    const DATE_TIMES: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    if let Some(naive) = DATE_TIMES
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
    {
        return Some(naive.and_utc());
    }
    ["%Y-%m-%d", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Numeric strings are rejected even though they could be timestamps.
pub fn is_date(input: &str) -> bool {
    if input.trim().parse::<f64>().is_ok() {
        return false;
    }
    parse_date(input).is_some()
}

pub fn parse_time_zone(name: &str) -> Result<Tz, FormatError> {
    name.parse::<Tz>()
        .map_err(|_| FormatError::UnknownTimeZone(name.to_string()))
}

/// Zone from the `TZ` environment variable, falling back to UTC.
pub fn local_time_zone() -> Tz {
    std::env::var("TZ")
        .ok()
        .and_then(|name| name.parse().ok())
        .unwrap_or(Tz::UTC)
}

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\[([^\]]*)\]|YYYY|YY|MMMM|MMM|MM|M|Do|DD|D|dddd|ddd|dd|d|HH|H|hh|h|mm|m|ss|s|SSS|A|a|ZZ|Z|Qo|Q|X|x",
    )
    .expect("date token pattern")
});

fn offset_string(seconds: i32, separator: &str) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.unsigned_abs() / 60;
    format!("{sign}{:02}{separator}{:02}", minutes / 60, minutes % 60)
}

/// Renders `dt` with a dayjs-style pattern in its own zone.
pub fn format_pattern<T: TimeZone>(dt: &DateTime<T>, pattern: &str, locale: LangCode) -> String {
    let names = names(locale);
    let month0 = dt.month0() as usize;
    let weekday = dt.weekday().num_days_from_sunday() as usize;
    let hour12 = match dt.hour() % 12 {
        0 => 12,
        h => h,
    };
    let quarter = i64::from(dt.month0() / 3 + 1);
    let offset = dt.offset().fix().local_minus_utc();

    TOKEN
        .replace_all(pattern, |caps: &regex::Captures| {
            if let Some(literal) = caps.get(1) {
                return literal.as_str().to_string();
            }
            match &caps[0] {
                "YYYY" => format!("{:04}", dt.year()),
                "YY" => format!("{:02}", dt.year().rem_euclid(100)),
                "MMMM" => names.months[month0].to_string(),
                "MMM" => names.months_short[month0].to_string(),
                "MM" => format!("{:02}", dt.month()),
                "M" => dt.month().to_string(),
                "Do" => ordinal(i64::from(dt.day()), locale),
                "DD" => format!("{:02}", dt.day()),
                "D" => dt.day().to_string(),
                "dddd" => names.weekdays[weekday].to_string(),
                "ddd" => names.weekdays_short[weekday].to_string(),
                "dd" => names.weekdays_min[weekday].to_string(),
                "d" => weekday.to_string(),
                "HH" => format!("{:02}", dt.hour()),
                "H" => dt.hour().to_string(),
                "hh" => format!("{hour12:02}"),
                "h" => hour12.to_string(),
                "mm" => format!("{:02}", dt.minute()),
                "m" => dt.minute().to_string(),
                "ss" => format!("{:02}", dt.second()),
                "s" => dt.second().to_string(),
                "SSS" => format!("{:03}", dt.timestamp_subsec_millis()),
                "A" => (if dt.hour() < 12 { "AM" } else { "PM" }).to_string(),
                "a" => (if dt.hour() < 12 { "am" } else { "pm" }).to_string(),
                "ZZ" => offset_string(offset, ""),
                "Z" => offset_string(offset, ":"),
                "Qo" => ordinal(quarter, locale),
                "Q" => quarter.to_string(),
                "X" => dt.timestamp().to_string(),
                "x" => dt.timestamp_millis().to_string(),
                other => other.to_string(),
            }
        })
        .into_owned()
}

/// Formats `date` in `tz`; unparseable input renders as an empty string.
pub fn format_date(date: &str, pattern: &str, locale: LangCode, tz: Tz) -> String {
    parse_date(date)
        .map(|dt| format_pattern(&dt.with_timezone(&tz), pattern, locale))
        .unwrap_or_default()
}

/// `2024-03-01T12:00:00.000Z`.
pub fn iso_string(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn to_iso_string(date: &str) -> String {
    parse_date(date).map(iso_string).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Quarters,
    Years,
}

impl FromStr for DiffUnit {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = if s == "ms" { s } else { s.trim_end_matches('s') };
        Ok(match unit {
            "ms" | "millisecond" => Self::Milliseconds,
            "second" => Self::Seconds,
            "minute" => Self::Minutes,
            "hour" => Self::Hours,
            "day" => Self::Days,
            "week" => Self::Weeks,
            "month" => Self::Months,
            "quarter" => Self::Quarters,
            "year" => Self::Years,
            _ => return Err(FormatError::UnknownKind(s.to_string())),
        })
    }
}

fn add_months(dt: DateTime<Utc>, months: i64) -> DateTime<Utc> {
    let shifted = match u32::try_from(months.unsigned_abs()) {
        Ok(n) if months >= 0 => dt.checked_add_months(Months::new(n)),
        Ok(n) => dt.checked_sub_months(Months::new(n)),
        Err(_) => None,
    };
    shifted.unwrap_or(dt)
}

fn millis_between(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    (a - b).num_milliseconds() as f64
}

/// Fractional months from `b` to `a`; the partial month is measured
/// against the length of the month it falls in.
fn month_diff(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    if a.day() < b.day() {
        return -month_diff(b, a);
    }
    let whole = i64::from(b.year() - a.year()) * 12 + i64::from(b.month0()) - i64::from(a.month0());
    let anchor = add_months(a, whole);
    let before = b < anchor;
    let anchor2 = add_months(a, whole + if before { -1 } else { 1 });
    let span = if before {
        millis_between(anchor, anchor2)
    } else {
        millis_between(anchor2, anchor)
    };
    let result = -(whole as f64 + millis_between(b, anchor) / span);
    if result.is_finite() && result != 0.0 {
        result
    } else {
        0.0
    }
}

/// `a - b` in `unit`, fractional.
fn diff_in(a: DateTime<Utc>, b: DateTime<Utc>, unit: DiffUnit) -> f64 {
    const SECOND: f64 = 1_000.0;
    let ms = millis_between(a, b);
    match unit {
        DiffUnit::Milliseconds => ms,
        DiffUnit::Seconds => ms / SECOND,
        DiffUnit::Minutes => ms / (60.0 * SECOND),
        DiffUnit::Hours => ms / (3_600.0 * SECOND),
        DiffUnit::Days => ms / (86_400.0 * SECOND),
        DiffUnit::Weeks => ms / (604_800.0 * SECOND),
        DiffUnit::Months => month_diff(a, b),
        DiffUnit::Quarters => month_diff(a, b) / 3.0,
        DiffUnit::Years => month_diff(a, b) / 12.0,
    }
}

/// `second - first` in whole `unit`s, truncated toward zero.
pub fn difference(first: &str, second: &str, unit: DiffUnit) -> Option<i64> {
    let (first, second) = (parse_date(first)?, parse_date(second)?);
    Some(diff_in(second, first, unit).trunc() as i64)
}

pub fn days_in_month(date: &str) -> Option<u32> {
    let dt = parse_date(date)?;
    let first = NaiveDate::from_ymd_opt(dt.year(), dt.month(), 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    u32::try_from((next - first).num_days()).ok()
}

/// Upper bound (inclusive, rounded) for each phrase and the unit the
/// difference is re-measured in when reaching it.
const THRESHOLDS: [(Option<f64>, Option<DiffUnit>); 11] = [
    (Some(44.0), Some(DiffUnit::Seconds)),
    (Some(89.0), None),
    (Some(44.0), Some(DiffUnit::Minutes)),
    (Some(89.0), None),
    (Some(21.0), Some(DiffUnit::Hours)),
    (Some(35.0), None),
    (Some(25.0), Some(DiffUnit::Days)),
    (Some(45.0), None),
    (Some(10.0), Some(DiffUnit::Months)),
    (Some(17.0), None),
    (None, Some(DiffUnit::Years)),
];

/// Humanized distance from `base` to `target`, future when `target` is
/// later.
fn relative_time(
    target: DateTime<Utc>,
    base: DateTime<Utc>,
    without_suffix: bool,
    locale: LangCode,
) -> String {
    let words = &names(locale).relative;
    let mut result = 0.0;
    let mut phrase = String::new();
    for (i, (limit, unit)) in THRESHOLDS.iter().enumerate() {
        if let Some(unit) = unit {
            result = diff_in(target, base, *unit);
        }
        let abs = result.abs().round();
        if limit.map_or(true, |limit| abs <= limit) {
            let index = if abs <= 1.0 && i > 0 { i - 1 } else { i };
            phrase = words.units[index].replace("%d", &(abs as i64).to_string());
            break;
        }
    }
    if without_suffix {
        return phrase;
    }
    let frame = if result > 0.0 { words.future } else { words.past };
    frame.replace("%s", &phrase)
}

/// Distance from now to `date`: `"3 days ago"`, `"in 2 hours"`.
pub fn from_now(date: &str, without_suffix: bool, locale: LangCode) -> String {
    from_now_at(date, Utc::now(), without_suffix, locale)
}

pub fn from_now_at(date: &str, now: DateTime<Utc>, without_suffix: bool, locale: LangCode) -> String {
    parse_date(date)
        .map(|dt| relative_time(dt, now, without_suffix, locale))
        .unwrap_or_default()
}

/// Distance from `date` to now: a past date renders `"in 3 days"`.
pub fn to_now(date: &str, without_suffix: bool, locale: LangCode) -> String {
    to_now_at(date, Utc::now(), without_suffix, locale)
}

pub fn to_now_at(date: &str, now: DateTime<Utc>, without_suffix: bool, locale: LangCode) -> String {
    parse_date(date)
        .map(|dt| relative_time(now, dt, without_suffix, locale))
        .unwrap_or_default()
}

const AGO_INTERVALS: [(&str, i64); 7] = [
    ("year", 31_536_000),
    ("month", 2_592_000),
    ("week", 604_800),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
    ("second", 1),
];

/// `"5 days ago"`, largest whole unit first; future times read
/// `"Just now"`.
pub fn time_ago_at(time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - time).num_milliseconds().div_euclid(1_000);
    AGO_INTERVALS
        .iter()
        .map(|(unit, size)| (unit, seconds.div_euclid(*size)))
        .find(|(_, count)| *count >= 1)
        .map(|(unit, count)| format!("{count} {unit}{} ago", if count > 1 { "s" } else { "" }))
        .unwrap_or_else(|| "Just now".to_string())
}

pub fn time_ago(time: DateTime<Utc>) -> String {
    time_ago_at(time, Utc::now())
}

/// Coarse elapsed time between two instants: `"2 hour(s) ago"`.
pub fn time_diff(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let seconds = (end - start).num_milliseconds().div_euclid(1_000);
    let minutes = seconds.div_euclid(60);
    let hours = minutes.div_euclid(60);
    let days = hours.div_euclid(24);

    if days > 0 {
        format!("{days} day(s) ago")
    } else if hours > 0 {
        format!("{hours} hour(s) ago")
    } else if minutes > 0 {
        format!("{minutes} minute(s) ago")
    } else {
        format!("{seconds} second(s) ago")
    }
}

fn at_local_time(
    dt: DateTime<Utc>,
    tz: Tz,
    (hour, minute, second, milli): (u32, u32, u32, u32),
) -> DateTime<Utc> {
    let local = dt.with_timezone(&tz).date_naive();
    local
        .and_hms_milli_opt(hour, minute, second, milli)
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
        .map_or(dt, |shifted| shifted.with_timezone(&Utc))
}

/// Midnight of the day `dt` falls on in `tz`.
pub fn start_of_day(dt: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    at_local_time(dt, tz, (0, 0, 0, 0))
}

/// Last millisecond of the day `dt` falls on in `tz`.
pub fn end_of_day(dt: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    at_local_time(dt, tz, (23, 59, 59, 999))
}

/// Locale date-time for a millisecond timestamp:
/// `3/1/2024, 12:00:00 PM` in English, `12:00:00 1/3/2024` in Vietnamese.
pub fn timestamp_to_date(millis: i64, tz: Tz, locale: LangCode) -> Option<String> {
    let dt = DateTime::from_timestamp_millis(millis)?.with_timezone(&tz);
    let pattern = match locale {
        LangCode::En => "M/D/YYYY, h:mm:ss A",
        LangCode::Vi => "HH:mm:ss D/M/YYYY",
    };
    Some(format_pattern(&dt, pattern, locale))
}

#[cfg(test)]
#[path = "tests/date_tests.rs"]
mod tests;
