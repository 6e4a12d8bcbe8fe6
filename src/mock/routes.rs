//! Mock device HTTP handlers

use std::sync::Arc;

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use super::service::RobotService;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct SwitchFanRequest {
    /// `proportional` or `static`
    pub mode: String,
    /// Fan power in %, required for `static`
    #[serde(default)]
    pub value: Option<i64>,
}

pub fn routes() -> Router<Arc<RobotService>> {
    Router::new()
        .route("/robot", get(get_robot_state))
        .route("/robot/switch", post(switch_robot))
        .route("/robot/reset", post(reset_robot))
        .route("/robot/fan", post(switch_fan))
}

/// GET /robot
async fn get_robot_state(State(service): State<Arc<RobotService>>) -> impl IntoResponse {
    Json(service.get_state().await)
}

/// POST /robot/switch
async fn switch_robot(
    State(service): State<Arc<RobotService>>,
) -> Result<impl IntoResponse, AppError> {
    service.switch().await?;
    Ok(Json(serde_json::Value::Null))
}

/// POST /robot/reset
async fn reset_robot(
    State(service): State<Arc<RobotService>>,
) -> Result<impl IntoResponse, AppError> {
    service.reset().await?;
    Ok(Json(serde_json::Value::Null))
}

/// POST /robot/fan
async fn switch_fan(
    State(service): State<Arc<RobotService>>,
    Json(payload): Json<SwitchFanRequest>,
) -> Result<impl IntoResponse, AppError> {
    service.switch_fan(&payload.mode, payload.value).await?;
    Ok(Json(serde_json::Value::Null))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::config::MockRobotConfig;
    use crate::mock::robot::{MockRobot, SimulationParams};

    fn app() -> Router {
        let robot = MockRobot::new(SimulationParams::from(&MockRobotConfig::default()));
        let service = Arc::new(RobotService::new(robot, Duration::from_millis(100)));
        routes().with_state(service)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_empty(uri: &str) -> Request<Body> {
        Request::post(uri).body(Body::empty()).unwrap()
    }

    async fn state(app: &Router) -> serde_json::Value {
        let response = app
            .clone()
            .oneshot(Request::get("/robot").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_initial_state_shape() {
        let app = app();
        let body = state(&app).await;

        assert_eq!(body["status"], "idle");
        assert_eq!(body["uptime"], "0:00:00");
        assert_eq!(body["logs"], json!([]));
        assert!(body["current_temperature"].is_number());
        assert_eq!(body["fan_speed"], 0);
    }

    #[tokio::test]
    async fn test_switch_then_reset_refused_while_running() {
        let app = app();

        let response = app.clone().oneshot(post_empty("/robot/switch")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state(&app).await["status"], "running");

        let response = app.clone().oneshot(post_empty("/robot/reset")).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let logs = state(&app).await["logs"].clone();
        assert_eq!(
            logs,
            json!(["WARN: Unable to reset with current state: 'running'"])
        );
    }

    #[tokio::test]
    async fn test_fan_validation() {
        let app = app();

        let cases = [
            (json!({ "mode": "proportional" }), StatusCode::OK),
            (json!({ "mode": "static", "value": 37 }), StatusCode::OK),
            (json!({ "mode": "static", "value": 101 }), StatusCode::BAD_REQUEST),
            (json!({ "mode": "static", "value": -5 }), StatusCode::BAD_REQUEST),
            (json!({ "mode": "static" }), StatusCode::BAD_REQUEST),
            (json!({ "mode": "turbo" }), StatusCode::BAD_REQUEST),
        ];

        for (body, expected) in cases {
            let response = app.clone().oneshot(post_json("/robot/fan", body.clone())).await.unwrap();
            assert_eq!(response.status(), expected, "body: {}", body);
        }

        let fan_speed = state(&app).await["fan_speed"].clone();
        assert!(fan_speed.is_u64());
        assert_eq!(fan_speed, 37);
    }
}
