use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    RateLimited,
    Network,
    Decode,
    Internal,
}

impl ErrorCode {
    /// Classifies an HTTP status code returned by the backend.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            400 | 409 | 422 => Self::Validation,
            429 => Self::RateLimited,
            _ => Self::Internal,
        }
    }
}

/// Failure value surfaced by the HTTP layer and recorded by request trackers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code:?}: {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::from_status(status), message).with_status(status)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.code, ErrorCode::Unauthorized)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl ApiError {
    /// Builds an error from a non-success response body. Servers that reply
    /// with `{"message": ...}` keep their message; anything else is carried
    /// verbatim.
    pub fn from_response_body(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.message,
            Err(_) if body.trim().is_empty() => format!("request failed with status {status}"),
            Err(_) => body.trim().to_string(),
        };
        Self::from_status(status, message)
    }
}
