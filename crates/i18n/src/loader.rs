use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use shared::domain::LangCode;
use tracing::{debug, warn};

use crate::{catalog::deep_merge, I18nError};

/// One translation source: the file or URL is `{prefix}{lang}{suffix}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResource {
    pub prefix: String,
    pub suffix: String,
    /// Missing optional resources are skipped instead of failing the load.
    pub optional: bool,
}

impl TranslationResource {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: ".json".to_string(),
            optional: false,
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn location(&self, lang: LangCode) -> String {
        format!("{}{}{}", self.prefix, lang.as_str(), self.suffix)
    }
}

impl From<&str> for TranslationResource {
    fn from(prefix: &str) -> Self {
        Self::new(prefix)
    }
}

#[async_trait]
pub trait TranslationLoader: Send + Sync {
    /// Returns the merged translation tree for `lang`.
    async fn load(&self, lang: LangCode) -> Result<Value, I18nError>;
}

fn parse_resource(resource: &str, raw: &str) -> Result<Value, I18nError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| I18nError::Parse {
        resource: resource.to_string(),
        message: e.to_string(),
    })?;
    if !value.is_object() {
        return Err(I18nError::NotAnObject {
            resource: resource.to_string(),
        });
    }
    Ok(value)
}

/// Reads and deep-merges several JSON files per language; later resources
/// override earlier ones.
pub struct FileLoader {
    resources: Vec<TranslationResource>,
}

impl FileLoader {
    pub fn new(resources: impl IntoIterator<Item = TranslationResource>) -> Self {
        Self {
            resources: resources.into_iter().collect(),
        }
    }
}

#[async_trait]
impl TranslationLoader for FileLoader {
    async fn load(&self, lang: LangCode) -> Result<Value, I18nError> {
        let mut merged = Value::Object(Map::new());

        for resource in &self.resources {
            let path = resource.location(lang);
            let raw = match tokio::fs::read_to_string(&path).await {
                Ok(raw) => raw,
                Err(e) if resource.optional && e.kind() == std::io::ErrorKind::NotFound => {
                    warn!(%path, "optional translation file not found; skipping");
                    continue;
                }
                Err(source) => return Err(I18nError::Io { path, source }),
            };
            debug!(%path, "loaded translation file");
            deep_merge(&mut merged, parse_resource(&path, &raw)?);
        }

        Ok(merged)
    }
}

/// HTTP counterpart of [`FileLoader`]: each resource prefix is a URL.
pub struct HttpLoader {
    http: Client,
    resources: Vec<TranslationResource>,
}

impl HttpLoader {
    pub fn new(http: Client, resources: impl IntoIterator<Item = TranslationResource>) -> Self {
        Self {
            http,
            resources: resources.into_iter().collect(),
        }
    }

    async fn fetch(&self, url: &str) -> Result<Option<String>, I18nError> {
        let http_error = |e: reqwest::Error| I18nError::Http {
            url: url.to_string(),
            message: e.to_string(),
        };
        let response = self.http.get(url).send().await.map_err(http_error)?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response
            .error_for_status()
            .map_err(http_error)?
            .text()
            .await
            .map_err(http_error)?;
        Ok(Some(body))
    }
}

#[async_trait]
impl TranslationLoader for HttpLoader {
    async fn load(&self, lang: LangCode) -> Result<Value, I18nError> {
        let mut merged = Value::Object(Map::new());

        for resource in &self.resources {
            let url = resource.location(lang);
            match self.fetch(&url).await? {
                Some(raw) => deep_merge(&mut merged, parse_resource(&url, &raw)?),
                None if resource.optional => {
                    warn!(%url, "optional translation resource not found; skipping");
                }
                None => {
                    return Err(I18nError::Http {
                        url,
                        message: "404 Not Found".to_string(),
                    })
                }
            }
        }

        Ok(merged)
    }
}

/// In-memory translations, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    trees: HashMap<LangCode, Value>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, lang: LangCode, tree: Value) -> Self {
        self.trees.insert(lang, tree);
        self
    }
}

#[async_trait]
impl TranslationLoader for StaticLoader {
    async fn load(&self, lang: LangCode) -> Result<Value, I18nError> {
        Ok(self
            .trees
            .get(&lang)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new())))
    }
}

#[cfg(test)]
#[path = "tests/loader_tests.rs"]
mod tests;
