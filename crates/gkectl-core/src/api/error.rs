//! Errors returned by the container API

use serde::Deserialize;
use thiserror::Error;

/// Failure of a single remote API call
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("HTTP {status}: {message}")]
    Unexpected { status: u16, message: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl ApiError {
    /// Build an error from a non-success HTTP status and the response body
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|e| e.error.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| body.trim().to_string());

        match status {
            400 => ApiError::BadRequest { message },
            401 => ApiError::AuthenticationFailed { message },
            403 => ApiError::PermissionDenied { message },
            404 => ApiError::NotFound { message },
            409 => ApiError::Conflict { message },
            429 => ApiError::RateLimited { message },
            500..=599 => ApiError::ServerError { status, message },
            _ => ApiError::Unexpected { status, message },
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ApiError::AuthenticationFailed { .. } | ApiError::PermissionDenied { .. }
        )
    }

    /// Whether a transport-level retry could succeed; the core never retries itself
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::RateLimited { .. } | ApiError::ServerError { .. } => true,
            ApiError::Request(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
