//! HTTP server
//!
//! # Endpoints
//!
//! - `POST /tsp` - Optimal closed tour for a labelled distance matrix
//! - `GET /health` - Health check
//! - `GET /swagger-ui` - OpenAPI documentation

pub mod api;
pub mod state;
pub mod tsp;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use salesman_milp::MilpSolver;

use crate::config::ServerConfig;

pub use api::build_router;
pub use state::ServerState;

/// Bind the configured address and serve until Ctrl-C
pub async fn serve(config: ServerConfig, solver: Arc<dyn MilpSolver>) -> Result<()> {
    let state = Arc::new(ServerState::new(solver, &config));
    let app = build_router(Arc::clone(&state), &config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!(
        addr = %addr,
        solver = state.solver.name(),
        max_locations = config.max_locations,
        solver_workers = config.solver_workers,
        time_limit_secs = ?config.solver.time_limit_secs,
        "server listening"
    );
    info!("swagger UI: http://{}/swagger-ui/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available: run until the process is killed
        std::future::pending::<()>().await;
    }
}
