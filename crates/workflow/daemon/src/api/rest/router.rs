//! API Router configuration

use super::handlers;
use super::openapi;
use super::state::AppState;
use crate::config::ServerConfig;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let workflow_routes = Router::new()
        // Definitions
        .route(
            "/definitions",
            get(handlers::list_definitions).post(handlers::create_definition),
        )
        .route("/definitions/:id", get(handlers::get_definition))
        // Instances
        .route(
            "/instances",
            get(handlers::list_instances).post(handlers::start_instance),
        )
        .route("/instances/:id", get(handlers::get_instance))
        .route("/instances/:id/actions", get(handlers::list_available_actions))
        .route(
            "/instances/:id/execute/:action_id",
            post(handlers::execute_action),
        );

    // Build router with middleware
    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/workflows", workflow_routes)
        .merge(openapi::create_docs_routes())
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(TraceLayer::new_for_http());

    let router = if config.enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}
