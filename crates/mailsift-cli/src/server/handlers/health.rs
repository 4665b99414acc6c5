//! Health check handler.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::server::state::AppState;

/// Response for the health endpoint.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Name of the configured oracle.
    pub oracle: String,
}

/// Report liveness and the active oracle.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        oracle: state.oracle_name().to_string(),
    })
}
