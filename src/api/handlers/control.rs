//! Control handlers
//!
//! Each handler queues a user action and answers right away. Device outcomes
//! are never reported back; they only show up through later polls.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::FanMode;
use crate::sync::state::MAX_FAN_SPEED;
use crate::sync::{PanelHandle, UserAction};

use super::AcceptedResponse;

#[derive(Debug, Deserialize)]
pub struct FanModeRequest {
    pub mode: FanMode,
}

#[derive(Debug, Deserialize)]
pub struct FanSpeedRequest {
    pub speed: i64,
}

fn accepted(message: &str) -> impl IntoResponse {
    (StatusCode::ACCEPTED, Json(AcceptedResponse::new(message)))
}

/// POST /api/power/switch - Toggle the robot on/off
pub async fn switch_power(State(panel): State<PanelHandle>) -> Result<impl IntoResponse, AppError> {
    panel.dispatch(UserAction::SwitchPower)?;
    Ok(accepted("Switch request dispatched"))
}

/// POST /api/power/reset - Reset the robot
pub async fn reset_robot(State(panel): State<PanelHandle>) -> Result<impl IntoResponse, AppError> {
    panel.dispatch(UserAction::Reset)?;
    Ok(accepted("Reset request dispatched"))
}

/// PUT /api/fan/mode - Change the fan operation mode
pub async fn set_fan_mode(
    State(panel): State<PanelHandle>,
    Json(payload): Json<FanModeRequest>,
) -> Result<impl IntoResponse, AppError> {
    panel.dispatch(UserAction::SetFanMode(payload.mode))?;
    Ok(accepted("Fan mode update dispatched"))
}

/// PUT /api/fan/speed - Change the static fan speed (0-100)
pub async fn set_fan_speed(
    State(panel): State<PanelHandle>,
    Json(payload): Json<FanSpeedRequest>,
) -> Result<impl IntoResponse, AppError> {
    let speed = u8::try_from(payload.speed)
        .ok()
        .filter(|speed| *speed <= MAX_FAN_SPEED)
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Fan speed out of range (0-{}): {}",
                MAX_FAN_SPEED, payload.speed
            ))
        })?;

    panel.dispatch(UserAction::SetFanSpeed(speed))?;
    Ok(accepted("Fan speed update dispatched"))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{body::Body, http::Request};
    use serde_json::json;
    use tower::ServiceExt;

    use super::super::test_support::{body_json, json_request, panel_app};
    use super::*;

    #[tokio::test]
    async fn test_fan_speed_out_of_range() {
        let (controller, app) = panel_app();

        for speed in [-1, 101, 1000] {
            let response = app
                .clone()
                .oneshot(json_request("PUT", "/api/fan/speed", json!({ "speed": speed })))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        controller.shutdown().await;
    }

    #[tokio::test]
    async fn test_fan_updates_reach_control_state() {
        let (controller, app) = panel_app();
        let handle = controller.handle();

        let response = app
            .clone()
            .oneshot(json_request("PUT", "/api/fan/mode", json!({ "mode": "static" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let response = app
            .clone()
            .oneshot(json_request("PUT", "/api/fan/speed", json!({ "speed": 64 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let mut rx = handle.subscribe();
        let view = tokio::time::timeout(
            Duration::from_secs(2),
            rx.wait_for(|v| v.fan_speed_setting == 64),
        )
        .await
        .unwrap()
        .unwrap()
        .clone();
        assert_eq!(view.fan_mode, FanMode::Static);
        assert!(view.fan_speed_editable);

        controller.shutdown().await;
    }

    #[tokio::test]
    async fn test_unknown_fan_mode_rejected() {
        let (controller, app) = panel_app();

        let response = app
            .oneshot(json_request("PUT", "/api/fan/mode", json!({ "mode": "turbo" })))
            .await
            .unwrap();
        assert!(response.status().is_client_error());

        controller.shutdown().await;
    }

    #[tokio::test]
    async fn test_commands_after_shutdown_unavailable() {
        let (controller, app) = panel_app();
        controller.shutdown().await;

        let response = app
            .oneshot(
                Request::post("/api/power/switch")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = body_json(response).await;
        assert_eq!(body["status"], 503);
    }
}
