//! Service information endpoints.

use axum::{extract::State, Json};

use crate::state::AppState;

pub const HEALTH_MESSAGE: &str = "Service is healthy.";

/// GET /health
pub async fn health() -> Json<&'static str> {
    Json(HEALTH_MESSAGE)
}

/// GET /version
pub async fn version(State(state): State<AppState>) -> Json<String> {
    Json(state.version)
}

/// GET /rest-version
pub async fn rest_version(State(state): State<AppState>) -> Json<String> {
    Json(state.rest_api_version)
}
