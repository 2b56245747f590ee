use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use request_state::StateCell;
use shared::domain::LangCode;
use tracing::{debug, info};

use crate::{
    catalog::{interpolate, Catalog},
    loader::TranslationLoader,
    I18nError,
};

/// Holds loaded catalogs and the active language.
///
/// Lookups fall back from the current language to the default language and
/// finally to the key itself, so a missing translation never renders empty.
pub struct TranslationService {
    loader: Arc<dyn TranslationLoader>,
    catalogs: RwLock<HashMap<LangCode, Catalog>>,
    default_language: RwLock<LangCode>,
    current: StateCell<LangCode>,
}

impl TranslationService {
    pub fn new(loader: Arc<dyn TranslationLoader>) -> Self {
        Self {
            loader,
            catalogs: RwLock::new(HashMap::new()),
            default_language: RwLock::new(LangCode::En),
            current: StateCell::new(LangCode::En),
        }
    }

    /// Observable active language.
    pub fn current_language(&self) -> &StateCell<LangCode> {
        &self.current
    }

    pub fn default_language(&self) -> LangCode {
        *self
            .default_language
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_default_language(&self, lang: LangCode) {
        *self
            .default_language
            .write()
            .unwrap_or_else(PoisonError::into_inner) = lang;
    }

    /// Makes English the fallback, loads it, then switches to the detected
    /// language (or the fallback when detection yields nothing usable).
    pub async fn init_language(&self, detected: Option<&str>) -> Result<LangCode, I18nError> {
        self.set_default_language(LangCode::En);
        self.ensure_loaded(LangCode::En).await?;

        let lang = detected
            .and_then(LangCode::from_tag)
            .unwrap_or_else(|| self.default_language());
        self.use_language(lang).await?;
        Ok(lang)
    }

    pub async fn change_language(&self, lang: LangCode) -> Result<(), I18nError> {
        self.use_language(lang).await
    }

    /// Loads `lang` if needed and makes it current. The current language
    /// only changes once its catalog is available.
    pub async fn use_language(&self, lang: LangCode) -> Result<(), I18nError> {
        self.ensure_loaded(lang).await?;
        if self.current.read() != lang {
            info!(%lang, "switching language");
        }
        self.current.write(lang);
        Ok(())
    }

    pub async fn reload(&self, lang: LangCode) -> Result<(), I18nError> {
        let tree = self.loader.load(lang).await?;
        let catalog = Catalog::from_json(&tree);
        debug!(%lang, entries = catalog.len(), "translations loaded");
        self.catalogs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(lang, catalog);
        Ok(())
    }

    async fn ensure_loaded(&self, lang: LangCode) -> Result<(), I18nError> {
        let loaded = {
            let catalogs = self.catalogs.read().unwrap_or_else(PoisonError::into_inner);
            catalogs.contains_key(&lang)
        };
        if loaded {
            return Ok(());
        }
        self.reload(lang).await
    }

    fn lookup(&self, key: &str) -> Option<String> {
        let chain = [self.current.read(), self.default_language()];
        let catalogs = self.catalogs.read().unwrap_or_else(PoisonError::into_inner);
        let text = chain
            .iter()
            .filter_map(|lang| catalogs.get(lang))
            .find_map(|catalog| catalog.get(key))
            .map(str::to_string);
        text
    }

    pub fn instant(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_else(|| key.to_string())
    }

    pub fn instant_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        interpolate(&self.instant(key), params)
    }

    /// Empty input renders as an empty string; several keys are translated
    /// one by one and joined with a space.
    pub fn safe_translate<S: AsRef<str>>(&self, keys: &[S]) -> String {
        keys.iter()
            .map(|key| key.as_ref())
            .filter(|key| !key.is_empty())
            .map(|key| self.instant(key))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Language from the process locale (`LC_ALL`, `LC_MESSAGES`, `LANG`).
pub fn detect_system_language() -> Option<LangCode> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|value| LangCode::from_tag(&value))
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
