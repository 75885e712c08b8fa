//! Workflow instance handlers

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use workflow_types::{
    Action, ActionId, WorkflowDefinitionId, WorkflowError, WorkflowInstance, WorkflowInstanceId,
};

/// Definition selector for starting an instance, given as the
/// `definitionId` query parameter or as a JSON body
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StartInstanceRequest {
    /// Workflow definition to instantiate
    #[serde(default, alias = "workflowDefinitionId")]
    pub definition_id: Option<String>,
}

/// List all workflow instances
#[utoipa::path(
    get,
    path = "/workflows/instances",
    tag = "instances",
    responses(
        (status = 200, description = "All instances", body = [WorkflowInstance])
    )
)]
pub async fn list_instances(State(state): State<AppState>) -> Json<Vec<WorkflowInstance>> {
    Json(state.engine.list_instances())
}

/// Get a workflow instance by ID
#[utoipa::path(
    get,
    path = "/workflows/instances/{id}",
    tag = "instances",
    params(("id" = String, Path, description = "Workflow instance ID")),
    responses(
        (status = 200, description = "Instance found", body = WorkflowInstance),
        (status = 404, description = "Unknown instance", body = ErrorResponse)
    )
)]
pub async fn get_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<WorkflowInstance>> {
    let id = WorkflowInstanceId::new(id);
    state
        .engine
        .get_instance(&id)
        .map(Json)
        .ok_or_else(|| WorkflowError::InstanceNotFound(id).into())
}

/// Start a new instance of a workflow definition
#[utoipa::path(
    post,
    path = "/workflows/instances",
    tag = "instances",
    params(StartInstanceRequest),
    request_body(content = StartInstanceRequest, description = "Used when the query parameter is absent"),
    responses(
        (status = 201, description = "Instance started in the initial state", body = WorkflowInstance),
        (status = 400, description = "No definition ID given", body = ErrorResponse),
        (status = 404, description = "Unknown definition", body = ErrorResponse)
    )
)]
pub async fn start_instance(
    State(state): State<AppState>,
    Query(query): Query<StartInstanceRequest>,
    body: Option<Json<StartInstanceRequest>>,
) -> ApiResult<(StatusCode, [(header::HeaderName, String); 1], Json<WorkflowInstance>)> {
    let definition_id = query
        .definition_id
        .or_else(|| body.and_then(|Json(b)| b.definition_id))
        .ok_or_else(|| ApiError::BadRequest("definitionId is required".to_string()))?;

    let instance = state
        .engine
        .start_instance(&WorkflowDefinitionId::new(definition_id))?;
    let location = format!("/workflows/instances/{}", instance.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(instance),
    ))
}

/// Execute an action on a workflow instance
#[utoipa::path(
    post,
    path = "/workflows/instances/{id}/execute/{action_id}",
    tag = "instances",
    params(
        ("id" = String, Path, description = "Workflow instance ID"),
        ("action_id" = String, Path, description = "Action to execute")
    ),
    responses(
        (status = 200, description = "Action applied", body = WorkflowInstance),
        (status = 400, description = "Action refused by the definition's rules", body = ErrorResponse),
        (status = 404, description = "Unknown instance or action", body = ErrorResponse)
    )
)]
pub async fn execute_action(
    State(state): State<AppState>,
    Path((id, action_id)): Path<(String, String)>,
) -> ApiResult<Json<WorkflowInstance>> {
    let instance = state
        .engine
        .execute_action(&WorkflowInstanceId::new(id), &ActionId::new(action_id))?;
    Ok(Json(instance))
}

/// List actions that may currently be executed on an instance
#[utoipa::path(
    get,
    path = "/workflows/instances/{id}/actions",
    tag = "instances",
    params(("id" = String, Path, description = "Workflow instance ID")),
    responses(
        (status = 200, description = "Actions that would pass every rule", body = [Action]),
        (status = 404, description = "Unknown instance", body = ErrorResponse)
    )
)]
pub async fn list_available_actions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Action>>> {
    let actions = state
        .engine
        .available_actions(&WorkflowInstanceId::new(id))?;
    Ok(Json(actions))
}
