use std::{sync::Arc, time::Duration};

use anyhow::{bail, Context};
use api_client::{ApiConfig, ApiService, NoToken, StaticToken, TokenSource};
use i18n::{
    detect_system_language, FileLoader, HttpLoader, TranslationLoader, TranslationResource,
    TranslationService,
};
use tracing::info;

use crate::config::Settings;

pub struct AppContext {
    pub api: ApiService,
    pub translations: TranslationService,
}

impl AppContext {
    /// Wires the API client and translation service, then loads the system
    /// language (or the configured default when it is unsupported).
    pub async fn bootstrap(settings: &Settings) -> anyhow::Result<Self> {
        let api = build_api(settings)?;
        let translations = TranslationService::new(build_loader(settings)?);

        let detected = detect_system_language().unwrap_or(settings.default_language);
        let lang = translations
            .init_language(Some(detected.as_str()))
            .await
            .context("failed to load translations")?;
        info!(%lang, base_api_url = %settings.base_api_url, "toolkit ready");

        Ok(Self { api, translations })
    }
}

pub fn build_api(settings: &Settings) -> anyhow::Result<ApiService> {
    let token_source: Arc<dyn TokenSource> = match &settings.access_token {
        Some(token) => Arc::new(StaticToken(token.clone())),
        None => Arc::new(NoToken),
    };
    let mut config = ApiConfig::new(settings.base_api_url.clone());
    if settings.request_timeout_secs > 0 {
        config.timeout = Some(Duration::from_secs(settings.request_timeout_secs));
    }
    ApiService::new(config, token_source).context("failed to build api client")
}

/// Resource prefixes must be all URLs or all filesystem paths.
pub fn build_loader(settings: &Settings) -> anyhow::Result<Arc<dyn TranslationLoader>> {
    let resources: Vec<TranslationResource> = settings
        .i18n_resources
        .iter()
        .map(|prefix| TranslationResource::new(prefix.as_str()))
        .collect();
    let remote = resources
        .iter()
        .filter(|resource| is_remote(&resource.prefix))
        .count();

    if remote == 0 {
        Ok(Arc::new(FileLoader::new(resources)))
    } else if remote == resources.len() {
        Ok(Arc::new(HttpLoader::new(reqwest::Client::new(), resources)))
    } else {
        bail!("i18n_resources mixes URLs and filesystem paths")
    }
}

fn is_remote(prefix: &str) -> bool {
    prefix.starts_with("http://") || prefix.starts_with("https://")
}

#[cfg(test)]
#[path = "tests/app_state_tests.rs"]
mod tests;
