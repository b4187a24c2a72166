//! HTTP surface of the search gateway
//!
//! Exposes the liveness probe, the asynchronous save endpoint, synchronous
//! search and the engine connectivity check over a single axum router.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod api;
mod rest_server;

pub use api::models::{ErrorResponse, LivenessResponse, SaveResponse, SearchResponse};
pub use rest_server::{build_router, ApiError, AppState};
pub use searchgate_core::error::{Error, Result};

use searchgate_core::config::ServerConfig;
use std::future::Future;
use tracing::info;

/// Serve the gateway until `shutdown` resolves
///
/// In-flight requests are allowed to complete before this returns.
pub async fn run_server<F>(config: &ServerConfig, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to {addr}: {e}")))?;

    info!("HTTP server listening on http://{addr}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| Error::with_context("HTTP server error", e))?;

    info!("HTTP server stopped");
    Ok(())
}
