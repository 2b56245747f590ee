use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;
use shared::domain::LangCode;

pub const SETTINGS_FILE: &str = "toolkit.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_api_url: String,
    pub default_language: LangCode,
    /// Translation resource prefixes; `{prefix}{lang}.json` is loaded for
    /// each. Prefixes starting with `http` are fetched, others read from disk.
    pub i18n_resources: Vec<String>,
    pub access_token: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_api_url: "http://127.0.0.1:8080/api".into(),
            default_language: LangCode::Vi,
            i18n_resources: vec!["./assets/i18n/".into()],
            access_token: None,
            request_timeout_secs: 30,
        }
    }
}

pub fn load_settings() -> anyhow::Result<Settings> {
    let mut settings = load_settings_from(Path::new(SETTINGS_FILE))?;
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

/// Defaults overlaid with a flat `key = "value"` toml file. A missing file
/// is not an error.
pub fn load_settings_from(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(settings),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };
    let file_cfg = toml::from_str::<HashMap<String, String>>(&raw)
        .with_context(|| format!("invalid settings file '{}'", path.display()))?;

    if let Some(v) = file_cfg.get("base_api_url") {
        settings.base_api_url = v.clone();
    }
    if let Some(v) = file_cfg.get("default_language") {
        settings.default_language = parse_language(v)?;
    }
    if let Some(v) = file_cfg.get("i18n_resources") {
        settings.i18n_resources = split_list(v);
    }
    if let Some(v) = file_cfg.get("access_token") {
        settings.access_token = Some(v.clone());
    }
    if let Some(v) = file_cfg.get("request_timeout_secs") {
        settings.request_timeout_secs = v
            .parse()
            .with_context(|| format!("invalid request_timeout_secs '{v}'"))?;
    }

    Ok(settings)
}

/// `APP__*` variables win over their legacy unprefixed names.
pub fn apply_env_overrides<F>(settings: &mut Settings, var: F) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = var("BASE_API_URL") {
        settings.base_api_url = v;
    }
    if let Some(v) = var("APP__BASE_API_URL") {
        settings.base_api_url = v;
    }

    if let Some(v) = var("APP__DEFAULT_LANGUAGE") {
        settings.default_language = parse_language(&v)?;
    }

    if let Some(v) = var("APP__I18N_RESOURCES") {
        settings.i18n_resources = split_list(&v);
    }

    if let Some(v) = var("ACCESS_TOKEN") {
        settings.access_token = Some(v);
    }
    if let Some(v) = var("APP__ACCESS_TOKEN") {
        settings.access_token = Some(v);
    }

    if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    Ok(())
}

fn parse_language(value: &str) -> anyhow::Result<LangCode> {
    value
        .parse::<LangCode>()
        .map_err(anyhow::Error::msg)
        .context("invalid default_language")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
