use std::sync::{Arc, PoisonError, RwLock};

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    RequestBuilder,
};
use tracing::warn;
use url::form_urlencoded;

pub const ACCESS_TOKEN_COOKIE: &str = "ACCESS_TOKEN";

/// Supplies the bearer credential attached to outgoing requests. Read once
/// per request, so implementations may change their answer at any time.
pub trait TokenSource: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

pub struct NoToken;

impl TokenSource for NoToken {
    fn access_token(&self) -> Option<String> {
        None
    }
}

pub struct StaticToken(pub String);

impl TokenSource for StaticToken {
    fn access_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Token slot that can be filled after login and cleared on logout.
#[derive(Clone, Default)]
pub struct SharedToken {
    inner: Arc<RwLock<Option<String>>>,
}

impl SharedToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl TokenSource for SharedToken {
    fn access_token(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Reads the access token out of a `Cookie` header string
/// (`name=value; other=value`).
#[derive(Clone)]
pub struct CookieJarToken {
    cookie_name: String,
    header: Arc<RwLock<String>>,
}

impl CookieJarToken {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            cookie_name: ACCESS_TOKEN_COOKIE.to_string(),
            header: Arc::new(RwLock::new(header.into())),
        }
    }

    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    pub fn replace_header(&self, header: impl Into<String>) {
        *self.header.write().unwrap_or_else(PoisonError::into_inner) = header.into();
    }
}

impl TokenSource for CookieJarToken {
    fn access_token(&self) -> Option<String> {
        let header = self.header.read().unwrap_or_else(PoisonError::into_inner);
        header.split(';').find_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            (name.trim() == self.cookie_name).then(|| decode_cookie_value(value.trim()))
        })
    }
}

/// Strips optional double quotes and percent-decodes; `+` stays literal.
fn decode_cookie_value(raw: &str) -> String {
    let raw = raw
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(raw);
    let escaped = raw
        .replace('+', "%2B")
        .replace('&', "%26")
        .replace('=', "%3D");
    form_urlencoded::parse(escaped.as_bytes())
        .next()
        .map(|(decoded, _)| decoded.into_owned())
        .unwrap_or_default()
}

/// Stamps every outgoing request with the JSON content type and, when a
/// non-empty token is available, a bearer `Authorization` header.
#[derive(Clone)]
pub struct RequestInterceptor {
    token_source: Arc<dyn TokenSource>,
}

impl RequestInterceptor {
    pub fn new(token_source: Arc<dyn TokenSource>) -> Self {
        Self { token_source }
    }

    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let token = self
            .token_source
            .access_token()
            .filter(|token| !token.trim().is_empty());
        if let Some(token) = token {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("access token contains characters not allowed in a header; sending request without it"),
            }
        }

        headers
    }

    /// Applies [`headers`](Self::headers), replacing any same-named headers
    /// already on the request.
    pub fn intercept(&self, request: RequestBuilder) -> RequestBuilder {
        request.headers(self.headers())
    }
}

#[cfg(test)]
#[path = "tests/auth_tests.rs"]
mod tests;
