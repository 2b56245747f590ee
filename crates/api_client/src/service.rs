use std::{sync::Arc, time::Duration};

use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use shared::error::{ApiError, ErrorCode};
use tracing::{debug, warn};

use crate::auth::{RequestInterceptor, TokenSource};

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_api_url: String,
    pub timeout: Option<Duration>,
}

impl ApiConfig {
    pub fn new(base_api_url: impl Into<String>) -> Self {
        Self {
            base_api_url: base_api_url.into(),
            timeout: None,
        }
    }
}

/// Per-request extras: headers and query parameters.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub params: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }
}

/// JSON-over-HTTP client rooted at `base_api_url`.
#[derive(Clone)]
pub struct ApiService {
    http: Client,
    config: ApiConfig,
    interceptor: RequestInterceptor,
}

impl ApiService {
    pub fn new(config: ApiConfig, token_source: Arc<dyn TokenSource>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::new(ErrorCode::Internal, format!("failed to build http client: {e}")))?;

        Ok(Self {
            http,
            config,
            interceptor: RequestInterceptor::new(token_source),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_api_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: Option<&RequestOptions>,
    ) -> Result<T, ApiError> {
        self.send::<(), T>(Method::GET, endpoint, None, options).await
    }

    pub async fn post<B, T>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        options: Option<&RequestOptions>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, endpoint, body, options).await
    }

    pub async fn put<B, T>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        options: Option<&RequestOptions>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, endpoint, body, options).await
    }

    pub async fn patch<B, T>(
        &self,
        endpoint: &str,
        body: Option<&B>,
        options: Option<&RequestOptions>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PATCH, endpoint, body, options).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: Option<&RequestOptions>,
    ) -> Result<T, ApiError> {
        self.send::<(), T>(Method::DELETE, endpoint, None, options).await
    }

    async fn send<B, T>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        options: Option<&RequestOptions>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);
        let mut request = self.http.request(method.clone(), &url);

        if let Some(options) = options {
            for (name, value) in &options.headers {
                request = request.header(name.as_str(), value.as_str());
            }
            if !options.params.is_empty() {
                request = request.query(&options.params);
            }
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let request = self.interceptor.intercept(request);

        debug!(%method, %url, "sending api request");
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            warn!(%method, %url, status = status.as_u16(), "api request failed");
            return Err(ApiError::from_response_body(status.as_u16(), &body));
        }

        decode_body(&bytes)
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    let code = if err.is_decode() {
        ErrorCode::Decode
    } else {
        ErrorCode::Network
    };
    ApiError::new(code, err.to_string())
}

/// Empty bodies decode as JSON `null` so `()` and `Option<_>` responses work
/// for `204 No Content`.
fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        bytes
    };
    serde_json::from_slice(bytes)
        .map_err(|e| ApiError::new(ErrorCode::Decode, format!("invalid response body: {e}")))
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
