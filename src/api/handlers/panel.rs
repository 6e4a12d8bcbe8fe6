//! Render state handler

use axum::{extract::State, response::IntoResponse, Json};

use crate::sync::PanelHandle;

/// GET /api/panel - Current render state
pub async fn get_panel(State(panel): State<PanelHandle>) -> impl IntoResponse {
    Json(panel.view())
}
