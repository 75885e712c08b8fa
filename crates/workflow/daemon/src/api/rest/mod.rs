//! REST API: routes, handlers, OpenAPI docs, and shared state

pub mod handlers;
pub mod openapi;
pub mod router;
pub mod state;
