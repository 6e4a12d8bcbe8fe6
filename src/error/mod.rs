//! Error handling module

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Network-level failures of a device request.
///
/// A non-2xx status is not a transport error; it comes back as a result.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Malformed response body: {0}")]
    Decode(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if e.is_decode() {
            TransportError::Decode(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid backend URL '{url}': {source}")]
    InvalidBackendUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Refresh rate must be a positive number of Hz, got {0}")]
    InvalidRefreshRate(f64),

    #[error("Request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("Temperature range {0}..={1} is empty")]
    InvalidTemperatureRange(i32, i32),

    #[error("Configuration error: {0}")]
    Source(#[from] config::ConfigError),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncError {
    #[error("Panel controller has been shut down")]
    Stopped,
}

/// HTTP-facing error shared by the panel and mock device routers
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl From<SyncError> for AppError {
    fn from(e: SyncError) -> Self {
        AppError::Unavailable(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
        };

        let body = Json(serde_json::json!({
            "detail": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
