//! API module - panel HTTP handlers and routes

pub mod handlers;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::sync::PanelHandle;

pub fn routes() -> Router<PanelHandle> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Render state
        .route("/api/panel", get(handlers::get_panel))
        // Power controls
        .route("/api/power/switch", post(handlers::switch_power))
        .route("/api/power/reset", post(handlers::reset_robot))
        // Fan controls
        .route("/api/fan/mode", put(handlers::set_fan_mode))
        .route("/api/fan/speed", put(handlers::set_fan_speed))
}
