//! Server setup and lifecycle management

use crate::api::create_router;
use crate::api::rest::state::AppState;
use crate::config::DaemonConfig;
use crate::error::{DaemonError, DaemonResult};
use tokio::net::TcpListener;
use workflow_engine::WorkflowEngine;

/// Workflow Daemon Server
pub struct Server {
    config: DaemonConfig,
    engine: WorkflowEngine,
}

impl Server {
    /// Create a new server backed by in-memory storage
    pub fn new(config: DaemonConfig) -> Self {
        Self::with_engine(config, WorkflowEngine::in_memory())
    }

    /// Create a server around an existing engine
    pub fn with_engine(config: DaemonConfig, engine: WorkflowEngine) -> Self {
        Self { config, engine }
    }

    /// Run the server until a shutdown signal arrives
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        let state = AppState::new(self.engine);
        let app = create_router(state, &self.config.server);

        let listener = TcpListener::bind(addr).await?;

        tracing::info!(
            %addr,
            cors = self.config.server.enable_cors,
            max_body_size = self.config.server.max_body_size,
            "Workflow daemon listening"
        );

        // Run server with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("Workflow daemon shutting down");

        Ok(())
    }
}

/// Graceful shutdown signal handler
///
/// A handler that cannot be installed never fires; the other one still can.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
