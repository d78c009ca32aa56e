use axum::{extract::State, response::Json};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::core::chunker::ChunkPlan;
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// Request body for `POST /audio/chunks`
#[derive(Debug, Deserialize)]
pub struct ChunkRequest {
    /// Encoded audio, normally a `data:` URL
    pub audio: String,
}

/// Plan how a TTS payload is split across avatar video requests
///
/// Malformed payloads are not rejected; they come back as a single opaque chunk.
pub async fn plan_chunks(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChunkRequest>,
) -> AppResult<Json<ChunkPlan>> {
    if request.audio.trim().is_empty() {
        return Err(AppError::BadRequest("audio must not be empty".to_string()));
    }

    let plan = state.chunker.get_chunk_config(&request.audio);
    debug!(
        "Chunk plan: should_chunk={}, chunks={}, total_duration={:.2}s",
        plan.should_chunk,
        plan.chunks.len(),
        plan.total_duration_secs
    );

    Ok(Json(plan))
}
