//! GET /health

use axum::Json;
use axum::extract::State;
use std::sync::Arc;

use crate::types::HealthResponse;

/// Health check: returns OK and whether token validation is enforced.
pub async fn health(State(state): State<Arc<crate::AppState>>) -> Json<HealthResponse> {
    let antiforgery = if state.config.validate_antiforgery {
        "enabled"
    } else {
        "disabled"
    };
    Json(HealthResponse {
        status: "ok".into(),
        mode: "form-guard".into(),
        antiforgery: antiforgery.into(),
    })
}
