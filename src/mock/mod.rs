//! Simulated robot device serving the robot API
//!
//! - `robot`: device state machine and simulation tick
//! - `service`: validation and background simulation loop
//! - `routes`: `/robot` HTTP endpoints

pub mod robot;
pub mod routes;
pub mod service;

pub use robot::{MockRobot, RobotState, RobotStatus, SimulationParams};
pub use service::RobotService;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::MockRobotConfig;

const ANY_ORIGIN: &str = "*";

/// CORS limited to the configured panel origins. A `*` entry admits any
/// origin by echoing it back, since credentials rule out a literal wildcard.
pub fn cors_layer(config: &MockRobotConfig) -> CorsLayer {
    let allow_origin = if config.allowed_origins.iter().any(|o| o == ANY_ORIGIN) {
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("[MockRobot] Ignoring invalid origin: {}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Build the device service and its router. The simulation loop is not started.
pub fn build(config: &MockRobotConfig) -> (Arc<RobotService>, Router) {
    let robot = MockRobot::new(SimulationParams::from(config));
    let service = Arc::new(RobotService::new(robot, config.tick_interval()));
    let app = routes::routes().with_state(service.clone());
    (service, app)
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use super::*;

    async fn allowed_origin(config: &MockRobotConfig, origin: &str) -> Option<String> {
        let (_service, app) = build(config);
        let app = app.layer(cors_layer(config));

        let response = app
            .oneshot(
                Request::get("/robot")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_cors_configured_origins_only() {
        let config = MockRobotConfig::default();

        assert_eq!(
            allowed_origin(&config, "http://localhost:3000").await.as_deref(),
            Some("http://localhost:3000")
        );
        assert_eq!(allowed_origin(&config, "http://evil.example").await, None);
    }

    #[tokio::test]
    async fn test_cors_wildcard_echoes_origin() {
        let config = MockRobotConfig {
            allowed_origins: vec![ANY_ORIGIN.to_string()],
            ..MockRobotConfig::default()
        };

        assert_eq!(
            allowed_origin(&config, "http://panel.example:8080").await.as_deref(),
            Some("http://panel.example:8080")
        );
    }
}
