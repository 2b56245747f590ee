use super::*;

use std::collections::HashMap;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings_from(&dir.path().join("absent.toml")).expect("load");
    assert_eq!(settings, Settings::default());
}

#[test]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("toolkit.toml");
    fs::write(
        &path,
        r#"
base_api_url = "https://api.example.com"
default_language = "en"
i18n_resources = "./i18n/, https://cdn.example.com/i18n/"
request_timeout_secs = "5"
"#,
    )
    .expect("write");

    let settings = load_settings_from(&path).expect("load");
    assert_eq!(settings.base_api_url, "https://api.example.com");
    assert_eq!(settings.default_language, LangCode::En);
    assert_eq!(
        settings.i18n_resources,
        vec!["./i18n/".to_string(), "https://cdn.example.com/i18n/".to_string()]
    );
    assert_eq!(settings.request_timeout_secs, 5);
    assert_eq!(settings.access_token, None);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("toolkit.toml");
    fs::write(&path, "base_api_url = [1, 2").expect("write");
    assert!(load_settings_from(&path).is_err());
}

#[test]
fn prefixed_env_wins_over_legacy_name() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        env(&[
            ("BASE_API_URL", "http://legacy"),
            ("APP__BASE_API_URL", "http://prefixed"),
            ("APP__ACCESS_TOKEN", "secret"),
            ("APP__I18N_RESOURCES", "a/,b/"),
        ]),
    )
    .expect("overrides");

    assert_eq!(settings.base_api_url, "http://prefixed");
    assert_eq!(settings.access_token.as_deref(), Some("secret"));
    assert_eq!(settings.i18n_resources, vec!["a/".to_string(), "b/".to_string()]);
}

#[test]
fn unparsable_timeout_keeps_previous_value() {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings, env(&[("APP__REQUEST_TIMEOUT_SECS", "soon")]))
        .expect("overrides");
    assert_eq!(settings.request_timeout_secs, 30);
}

#[test]
fn unknown_language_is_rejected() {
    let mut settings = Settings::default();
    let result = apply_env_overrides(&mut settings, env(&[("APP__DEFAULT_LANGUAGE", "klingon")]));
    assert!(result.is_err());
}
