use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use crate::api::AppState;
use crate::docker::{self, StatsError};
use crate::types::ErrorBody;

/// GET /docker-stats - One-shot resource usage for every running container
///
/// Every failure is materialized as a 500 response; the process itself
/// never exits on a bad request.
pub async fn docker_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Value>>, (StatusCode, Json<ErrorBody>)> {
    match docker::collect_stats(&state.docker_bin, state.stats_timeout).await {
        Ok(stats) => Ok(Json(stats)),
        Err(err) => {
            warn!("docker stats failed: {}", err);
            let body = match err {
                StatsError::Timeout => ErrorBody {
                    error: "Timeout getting docker stats".to_string(),
                    message: None,
                },
                StatsError::NonZeroExit { stderr } => ErrorBody {
                    error: "Failed to get docker stats".to_string(),
                    message: Some(stderr),
                },
                StatsError::Io(e) => ErrorBody {
                    error: "Error getting docker stats".to_string(),
                    message: Some(e.to_string()),
                },
            };
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(body)))
        }
    }
}
