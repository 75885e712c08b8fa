//! Workflow definition handlers

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult, ErrorResponse};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    Json,
};
use workflow_types::{WorkflowDefinition, WorkflowDefinitionId, WorkflowError};

/// List all workflow definitions
#[utoipa::path(
    get,
    path = "/workflows/definitions",
    tag = "definitions",
    responses(
        (status = 200, description = "All registered definitions", body = [WorkflowDefinition])
    )
)]
pub async fn list_definitions(State(state): State<AppState>) -> Json<Vec<WorkflowDefinition>> {
    Json(state.engine.list_definitions())
}

/// Get a workflow definition by ID
#[utoipa::path(
    get,
    path = "/workflows/definitions/{id}",
    tag = "definitions",
    params(("id" = String, Path, description = "Workflow definition ID")),
    responses(
        (status = 200, description = "Definition found", body = WorkflowDefinition),
        (status = 404, description = "Unknown definition", body = ErrorResponse)
    )
)]
pub async fn get_definition(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<WorkflowDefinition>> {
    let id = WorkflowDefinitionId::new(id);
    state
        .engine
        .get_definition(&id)
        .map(Json)
        .ok_or_else(|| WorkflowError::DefinitionNotFound(id).into())
}

/// Validate and register a workflow definition
#[utoipa::path(
    post,
    path = "/workflows/definitions",
    tag = "definitions",
    request_body = WorkflowDefinition,
    responses(
        (status = 201, description = "Definition registered", body = WorkflowDefinition),
        (status = 400, description = "Definition is not a valid state machine", body = ErrorResponse),
        (status = 409, description = "Definition ID already taken", body = ErrorResponse)
    )
)]
pub async fn create_definition(
    State(state): State<AppState>,
    payload: Result<Json<WorkflowDefinition>, JsonRejection>,
) -> ApiResult<(StatusCode, [(header::HeaderName, String); 1], Json<WorkflowDefinition>)> {
    let Json(definition) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let created = state.engine.create_definition(definition)?;
    let location = format!("/workflows/definitions/{}", created.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}
