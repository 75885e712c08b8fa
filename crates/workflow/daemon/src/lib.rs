//! Workflow daemon library
//!
//! Components of the `workflowd` service:
//! - REST API over the workflow engine
//! - Layered configuration
//! - Server lifecycle management

pub mod api;
pub mod config;
pub mod error;
pub mod server;

pub use config::DaemonConfig;
pub use error::{ApiError, DaemonError};
pub use server::Server;
