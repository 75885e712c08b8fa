//! OpenAPI documentation

use super::handlers;
use super::state::AppState;
use crate::error::ErrorResponse;
use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use workflow_types::{Action, HistoryEntry, State, WorkflowDefinition, WorkflowInstance};

/// Path of the generated OpenAPI document
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// OpenAPI documentation for the workflow REST API
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health_check,
        handlers::list_definitions,
        handlers::get_definition,
        handlers::create_definition,
        handlers::list_instances,
        handlers::get_instance,
        handlers::start_instance,
        handlers::execute_action,
        handlers::list_available_actions,
    ),
    components(
        schemas(
            WorkflowDefinition,
            State,
            Action,
            WorkflowInstance,
            HistoryEntry,
            handlers::StartInstanceRequest,
            handlers::HealthCheckResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Daemon health"),
        (name = "definitions", description = "Workflow definitions"),
        (name = "instances", description = "Workflow instances and transitions"),
    ),
    info(
        title = "Workflow Engine API",
        description = "Validated state-machine workflows: definitions, instances, and transitions.",
        license(name = "MIT OR Apache-2.0"),
    ),
)]
pub struct ApiDoc;

/// Swagger UI under `/docs`, backed by the generated document
pub fn create_docs_routes() -> Router<AppState> {
    Router::new().merge(SwaggerUi::new("/docs").url(OPENAPI_JSON_PATH, ApiDoc::openapi()))
}
