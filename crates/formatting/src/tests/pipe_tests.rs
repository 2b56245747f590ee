use super::*;

fn run(kind: FormatKind, args: PipeArgs, input: &str) -> Result<String, FormatError> {
    Pipe::build(kind, &args)?.apply(input)
}

#[test]
fn kinds_parse_from_any_spelling() {
    assert_eq!("rgb-to-hex".parse::<FormatKind>(), Ok(FormatKind::RgbToHex));
    assert_eq!("remove_spaces".parse::<FormatKind>(), Ok(FormatKind::RemoveSpaces));
    assert_eq!("camelToSpaces".parse::<FormatKind>(), Ok(FormatKind::CamelToSpaces));
    assert!(matches!(
        "nope".parse::<FormatKind>(),
        Err(FormatError::UnknownKind(_))
    ));
}

#[test]
fn every_kind_round_trips_through_its_name() {
    for kind in FormatKind::ALL {
        assert_eq!(kind.name().parse::<FormatKind>(), Ok(*kind));
    }
}

#[test]
fn built_pipe_reports_its_kind() {
    let args = PipeArgs {
        count: Some(2),
        limit: Some(5),
        unit: Some("C".into()),
        ..PipeArgs::default()
    };
    for kind in FormatKind::ALL {
        let pipe = Pipe::build(*kind, &args).expect("buildable with these args");
        assert_eq!(pipe.kind(), *kind);
    }
}

#[test]
fn string_pipes_use_defaults() {
    assert_eq!(
        run(FormatKind::Truncate, PipeArgs::default(), "This text is longer than twenty").unwrap(),
        "This text is longer ..."
    );
    assert_eq!(run(FormatKind::DefaultValue, PipeArgs::default(), "").unwrap(), "N/A");
    assert_eq!(
        run(FormatKind::HideEmail, PipeArgs::default(), "example@email.com").unwrap(),
        "e***e@email.com"
    );
}

#[test]
fn required_arguments_are_reported() {
    assert_eq!(
        Pipe::build(FormatKind::Pluralize, &PipeArgs::default()),
        Err(FormatError::MissingArgument {
            kind: "pluralize",
            argument: "count"
        })
    );
    let args = PipeArgs {
        count: Some(2),
        plural: Some("people".into()),
        ..PipeArgs::default()
    };
    assert_eq!(run(FormatKind::Pluralize, args, "person").unwrap(), "2 people");
}

#[test]
fn numeric_pipes_parse_their_input() {
    let currency = PipeArgs {
        currency: Some("EUR".into()),
        locale: Some("de-DE".into()),
        ..PipeArgs::default()
    };
    assert_eq!(run(FormatKind::Currency, currency, "1234.5").unwrap(), "1.234,50\u{a0}€");
    assert_eq!(run(FormatKind::Percent, PipeArgs::default(), "0.85").unwrap(), "85%");
    assert_eq!(run(FormatKind::Ordinal, PipeArgs::default(), "22").unwrap(), "22nd");
    assert_eq!(run(FormatKind::FileSize, PipeArgs::default(), "1024").unwrap(), "1 KB");
    assert_eq!(
        run(FormatKind::Number, PipeArgs::default(), "twelve"),
        Err(FormatError::InvalidNumber("twelve".into()))
    );
}

#[test]
fn date_pipes_parse_their_input() {
    let utc = PipeArgs {
        time_zone: Some("UTC".into()),
        ..PipeArgs::default()
    };
    assert_eq!(
        run(FormatKind::StartOfDay, utc.clone(), "2024-03-01T15:45:00Z").unwrap(),
        "2024-03-01T00:00:00.000Z"
    );
    assert_eq!(
        run(FormatKind::ToUtc, PipeArgs::default(), "2024-03-01T19:00:00+07:00").unwrap(),
        "2024-03-01T12:00:00.000Z"
    );
    let end = PipeArgs {
        end: Some("2024-03-01T12:00:00Z".into()),
        ..PipeArgs::default()
    };
    assert_eq!(run(FormatKind::TimeDiff, end, "2024-03-01T10:00:00Z").unwrap(), "2 hour(s) ago");
    assert!(matches!(
        run(FormatKind::ToUtc, PipeArgs::default(), "yesterday"),
        Err(FormatError::InvalidDate(_))
    ));

    let bad_zone = PipeArgs {
        time_zone: Some("Nowhere/Town".into()),
        ..PipeArgs::default()
    };
    assert!(matches!(
        Pipe::build(FormatKind::EndOfDay, &bad_zone),
        Err(FormatError::UnknownTimeZone(_))
    ));
}

#[test]
fn time_ago_uses_injected_now() {
    let pipe = Pipe::TimeAgo {
        now: date::parse_date("2024-03-06T12:00:00Z"),
    };
    assert_eq!(pipe.apply("2024-03-01T12:00:00Z").unwrap(), "5 days ago");
}

#[test]
fn json_pipes_render_json() {
    assert_eq!(
        run(FormatKind::ObjectKeys, PipeArgs::default(), r#"{"b":1,"a":2}"#).unwrap(),
        r#"["b","a"]"#
    );
    assert_eq!(
        run(FormatKind::SortKeys, PipeArgs::default(), r#"{"b":1,"a":2}"#).unwrap(),
        r#"{"a":2,"b":1}"#
    );
    let desc = PipeArgs {
        order: Some("desc".into()),
        ..PipeArgs::default()
    };
    assert_eq!(run(FormatKind::SortArray, desc, "[1, 3, 2]").unwrap(), "[3,2,1]");
    assert_eq!(run(FormatKind::Max, PipeArgs::default(), "[]").unwrap(), "null");
    assert_eq!(run(FormatKind::Count, PipeArgs::default(), "[1, 2]").unwrap(), "2");
    assert!(matches!(
        run(FormatKind::ObjectKeys, PipeArgs::default(), "[1]"),
        Err(FormatError::InvalidJson(_))
    ));
}
