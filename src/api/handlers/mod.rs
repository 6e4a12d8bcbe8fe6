//! HTTP handlers module

mod control;
mod panel;

pub use self::control::*;
pub use self::panel::*;

use axum::{response::IntoResponse, Json};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Health check handler
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "robot-panel".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Acknowledgement for queued user actions
#[derive(Serialize)]
pub struct AcceptedResponse {
    pub message: String,
}

impl AcceptedResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
