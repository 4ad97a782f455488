pub mod stats;

use axum::{http::StatusCode, routing::get, Json, Router};
use std::sync::Arc;
use std::time::Duration;

use crate::types::HealthResponse;

pub struct AppState {
    pub docker_bin: String,
    pub stats_timeout: Duration,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Container stats
        .route("/docker-stats", get(stats::docker_stats))
        // Health check
        .route("/health", get(health))
        .with_state(state)
}

/// GET /health - Health check endpoint
///
/// The `service` string is matched verbatim by the fleet dashboards that
/// predate this daemon.
async fn health() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            service: "flask-api".to_string(),
        }),
    )
}
