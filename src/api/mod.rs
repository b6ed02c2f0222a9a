//! REST API for estimate results.
//!
//! Provides three endpoints:
//! - `GET /summary`: configuration and self-consumption report
//! - `GET /rows`: joined hourly rows with optional range filtering
//! - `POST /estimate`: runs the pipeline on posted inputs

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::config::PipelineConfig;
use crate::pipeline::Estimate;

pub use types::{ErrorResponse, EstimateRequest, EstimateResponse, RowRecord, SummaryResponse};

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the CLI run completes and wrapped in `Arc`.
/// On-demand estimates never touch it beyond reading the configuration.
pub struct AppState {
    /// Configuration used for the served run and as base for requests.
    pub config: PipelineConfig,
    /// Result of the served run.
    pub estimate: Estimate,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/summary", get(handlers::get_summary))
        .route("/rows", get(handlers::get_rows))
        .route("/estimate", post(handlers::post_estimate))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
