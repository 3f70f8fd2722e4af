//! Error bodies returned by the content API.

use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::FolioError;

/// A non-2xx response from the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code, if the failure came from a response
    pub status: Option<StatusCode>,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Build an error from a failed response.
    ///
    /// The message comes from the body's `error` or `message` field, falling
    /// back to the canonical reason phrase of the status.
    pub fn from_response(status: StatusCode, body: Option<&Value>) -> Self {
        let message = body
            .and_then(|body| {
                ["error", "message"]
                    .iter()
                    .find_map(|key| body.get(key).and_then(Value::as_str))
            })
            .map(str::to_string)
            .or_else(|| body.and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
            });
        Self::with_status(message, status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(StatusCode::NOT_FOUND)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({})", self.message, status.as_u16()),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ApiError> for FolioError {
    fn from(err: ApiError) -> Self {
        FolioError::Api {
            status: err.status.map(|s| s.as_u16()),
            message: err.message,
        }
    }
}
