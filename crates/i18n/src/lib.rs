//! Translation catalogs and the language-switching service used by views.

pub mod catalog;
pub mod loader;
pub mod service;

use thiserror::Error;

pub use catalog::Catalog;
pub use loader::{FileLoader, HttpLoader, StaticLoader, TranslationLoader, TranslationResource};
pub use service::{detect_system_language, TranslationService};

#[derive(Debug, Error)]
pub enum I18nError {
    #[error("failed to read translation file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to fetch translation resource {url}: {message}")]
    Http { url: String, message: String },
    #[error("translation resource {resource} is not valid JSON: {message}")]
    Parse { resource: String, message: String },
    #[error("translation resource {resource} must be a JSON object")]
    NotAnObject { resource: String },
}
