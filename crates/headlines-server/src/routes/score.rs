use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use headlines_core::Label;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{ApiError, ApiResult};
use crate::state::ServerState;

/// `{"headlines": [string, ...]}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub headlines: Vec<String>,
}

/// `{"labels": [label, ...]}`, position-aligned with the request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub labels: Vec<Label>,
}

/// `POST /score_headlines`
///
/// Headlines are scored exactly as sent: unlike the file reader, no trimming
/// and no dropping of empty strings. Scoring runs on the blocking pool; a
/// failure becomes a 500 and leaves the service up for the next request.
pub async fn score_headlines(
    State(state): State<ServerState>,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> ApiResult<Json<ScoreResponse>> {
    let Json(request) = payload.inspect_err(|e| info!(error = %e, "rejected request body"))?;
    info!(count = request.headlines.len(), "received request to score headlines");

    let models = state.models.clone();
    let labels = tokio::task::spawn_blocking(move || models.score(&request.headlines))
        .await
        .map_err(|e| {
            error!(error = %e, "scoring task panicked");
            ApiError::Internal(format!("scoring task failed: {e}"))
        })?
        .inspect_err(|e| error!(stage = %e.stage, error = %e, "failed to score headlines"))?;

    Ok(Json(ScoreResponse { labels }))
}
