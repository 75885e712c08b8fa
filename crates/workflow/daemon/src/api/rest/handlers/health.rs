//! Health check handler

use crate::api::rest::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheckResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub version: String,
    pub uptime: String,
    pub definitions: usize,
    pub instances: usize,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Daemon is up", body = HealthCheckResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    let stats = state.engine.stats();

    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
        definitions: stats.definitions,
        instances: stats.instances,
    })
}
