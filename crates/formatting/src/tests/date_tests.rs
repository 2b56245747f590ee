use super::*;

fn utc(input: &str) -> DateTime<Utc> {
    parse_date(input).expect("test date")
}

fn saigon() -> Tz {
    parse_time_zone("Asia/Ho_Chi_Minh").expect("zone")
}

#[test]
fn named_formats_resolve_by_name_or_position() {
    assert_eq!(DateFormat::ALL.len(), 30);
    assert_eq!("format-4".parse::<DateFormat>(), Ok(DateFormat::DateTime));
    assert_eq!("FORMAT_30".parse::<DateFormat>(), Ok(DateFormat::OrdinalQuarterYear));
    assert_eq!("long-date".parse::<DateFormat>(), Ok(DateFormat::LongDate));
    assert!(matches!(
        "format-31".parse::<DateFormat>(),
        Err(FormatError::UnknownDateFormat(_))
    ));
    assert_eq!(DateFormat::resolve("iso-date"), "YYYY-MM-DD");
    assert_eq!(DateFormat::resolve("YYYY"), "YYYY");
    assert_eq!(DateFormat::default().pattern(), "DD/MM/YYYY");
}

#[test]
fn formats_patterns_in_english_and_vietnamese() {
    let date = "2024-03-01T12:00:00Z";
    assert_eq!(format_date(date, DateFormat::DayMonthYear.pattern(), LangCode::En, Tz::UTC), "01/03/2024");
    assert_eq!(
        format_date(date, DateFormat::LongDate.pattern(), LangCode::En, Tz::UTC),
        "Friday, 01 March 2024"
    );
    assert_eq!(
        format_date(date, DateFormat::LongDate.pattern(), LangCode::Vi, Tz::UTC),
        "thứ sáu, 01 tháng 3 2024"
    );
    assert_eq!(
        format_date(date, DateFormat::MediumDate.pattern(), LangCode::En, Tz::UTC),
        "Mar 01, 2024"
    );
}

#[test]
fn formats_ordinals_quarters_and_literals() {
    assert_eq!(
        format_date("2024-03-22", DateFormat::OrdinalDate.pattern(), LangCode::En, Tz::UTC),
        "22nd March 2024"
    );
    assert_eq!(
        format_date("2024-03-01", DateFormat::OrdinalQuarterYear.pattern(), LangCode::En, Tz::UTC),
        "1st quarter 2024"
    );
    assert_eq!(
        format_date("2024-11-01", DateFormat::QuarterYear.pattern(), LangCode::En, Tz::UTC),
        "4 2024"
    );
}

#[test]
fn formats_times_and_zones() {
    assert_eq!(
        format_date("2024-03-01T00:05:00Z", DateFormat::Time12h.pattern(), LangCode::En, Tz::UTC),
        "12:05 AM"
    );
    assert_eq!(
        format_date("2024-03-01T12:34:56.789Z", DateFormat::TimeMillis.pattern(), LangCode::En, Tz::UTC),
        "12:34:56.789"
    );
    assert_eq!(
        format_date("2024-03-01T20:30:00Z", DateFormat::TimeDate.pattern(), LangCode::En, saigon()),
        "03:30 02/03/2024"
    );
    assert_eq!(
        format_date("2024-03-01T20:30:00Z", DateFormat::Iso8601.pattern(), LangCode::En, saigon()),
        "2024-03-02T03:30:00+07:00"
    );
}

#[test]
fn invalid_dates_render_empty() {
    assert_eq!(format_date("not a date", "YYYY", LangCode::En, Tz::UTC), "");
    assert_eq!(to_iso_string("2024-13-45"), "");
    assert!(parse_time_zone("Mars/Olympus").is_err());
}

#[test]
fn parses_common_shapes() {
    assert!(is_date("2024-03-01"));
    assert!(is_date("2024/03/01"));
    assert!(is_date("2024-03-01 08:15"));
    assert!(!is_date("12345"));
    assert!(!is_date("garbage"));
    assert_eq!(to_iso_string("2024-03-01T12:00:00"), "2024-03-01T12:00:00.000Z");
    assert_eq!(to_iso_string("2024-03-01T19:00:00+07:00"), "2024-03-01T12:00:00.000Z");
}

#[test]
fn relative_time_follows_thresholds() {
    let now = utc("2024-03-10T12:00:00Z");

    assert_eq!(from_now_at("2024-03-10T11:59:30Z", now, true, LangCode::En), "a few seconds");
    assert_eq!(from_now_at("2024-03-10T11:59:10Z", now, false, LangCode::En), "a minute ago");
    assert_eq!(from_now_at("2024-03-10T11:00:00Z", now, false, LangCode::En), "an hour ago");
    assert_eq!(from_now_at("2024-03-10T14:00:00Z", now, false, LangCode::En), "in 2 hours");
    assert_eq!(from_now_at("2024-03-07T12:00:00Z", now, false, LangCode::En), "3 days ago");
    assert_eq!(from_now_at("2024-01-10T12:00:00Z", now, false, LangCode::En), "2 months ago");
    assert_eq!(from_now_at("2020-03-10T12:00:00Z", now, false, LangCode::En), "4 years ago");
    assert_eq!(from_now_at("2024-03-07T12:00:00Z", now, false, LangCode::Vi), "3 ngày trước");
    assert_eq!(from_now_at("bad", now, false, LangCode::En), "");
}

#[test]
fn to_now_reverses_direction() {
    let now = utc("2024-03-10T12:00:00Z");
    assert_eq!(to_now_at("2024-03-07T12:00:00Z", now, false, LangCode::En), "in 3 days");
    assert_eq!(to_now_at("2024-03-07T12:00:00Z", now, true, LangCode::Vi), "3 ngày");
}

#[test]
fn difference_truncates_toward_zero() {
    assert_eq!(difference("2024-03-01", "2024-03-10", DiffUnit::Days), Some(9));
    assert_eq!(difference("2024-03-10", "2024-03-01", DiffUnit::Days), Some(-9));
    assert_eq!(difference("2024-01-31", "2024-03-01", DiffUnit::Months), Some(1));
    assert_eq!(difference("2020-06-01", "2024-03-01", DiffUnit::Years), Some(3));
    assert_eq!(difference("bad", "2024-03-01", DiffUnit::Days), None);
    assert_eq!("days".parse::<DiffUnit>(), Ok(DiffUnit::Days));
    assert_eq!("ms".parse::<DiffUnit>(), Ok(DiffUnit::Milliseconds));
}

#[test]
fn counts_days_in_month() {
    assert_eq!(days_in_month("2024-02-15"), Some(29));
    assert_eq!(days_in_month("2023-02-01"), Some(28));
    assert_eq!(days_in_month("2024-12-31"), Some(31));
    assert_eq!(days_in_month("nope"), None);
}

#[test]
fn time_ago_picks_largest_unit() {
    let now = utc("2024-03-10T12:00:00Z");
    assert_eq!(time_ago_at(utc("2024-03-05T12:00:00Z"), now), "5 days ago");
    assert_eq!(time_ago_at(utc("2024-03-10T11:00:00Z"), now), "1 hour ago");
    assert_eq!(time_ago_at(utc("2024-01-30T12:00:00Z"), now), "1 month ago");
    assert_eq!(time_ago_at(utc("2024-03-11T12:00:00Z"), now), "Just now");
}

#[test]
fn time_diff_reports_coarsest_positive_unit() {
    assert_eq!(
        time_diff(utc("2024-03-01T10:00:00Z"), utc("2024-03-01T12:00:00Z")),
        "2 hour(s) ago"
    );
    assert_eq!(
        time_diff(utc("2024-03-01T10:00:00Z"), utc("2024-03-01T10:00:30Z")),
        "30 second(s) ago"
    );
    assert_eq!(
        time_diff(utc("2024-03-01T10:00:00Z"), utc("2024-03-04T11:00:00Z")),
        "3 day(s) ago"
    );
}

#[test]
fn day_bounds_follow_the_zone() {
    let dt = utc("2024-03-01T15:45:00Z");
    assert_eq!(iso_string(start_of_day(dt, Tz::UTC)), "2024-03-01T00:00:00.000Z");
    assert_eq!(iso_string(end_of_day(dt, Tz::UTC)), "2024-03-01T23:59:59.999Z");

    let evening = utc("2024-03-01T20:00:00Z");
    assert_eq!(iso_string(start_of_day(evening, saigon())), "2024-03-01T17:00:00.000Z");
}

#[test]
fn timestamp_renders_per_locale() {
    assert_eq!(
        timestamp_to_date(1_709_251_200_000, Tz::UTC, LangCode::En).as_deref(),
        Some("3/1/2024, 12:00:00 AM")
    );
    assert_eq!(
        timestamp_to_date(1_709_251_200_000, Tz::UTC, LangCode::Vi).as_deref(),
        Some("00:00:00 1/3/2024")
    );
}
