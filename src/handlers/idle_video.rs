use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::avatar::IdleVideoGenerator;
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

const MAX_FIGURE_ID_LEN: usize = 128;

/// Request body for idle video generation and preloading
#[derive(Debug, Deserialize)]
pub struct IdleVideoRequest {
    /// Publicly reachable image of the figure
    pub source_url: String,
}

/// Idle video state of one figure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdleVideoStatus {
    pub figure_id: String,
    pub video_url: Option<String>,
    pub is_generating: bool,
    pub error: Option<String>,
}

impl IdleVideoStatus {
    fn snapshot(state: &AppState, figure_id: &str) -> Self {
        let entry = state.idle_videos.entry(figure_id);
        Self {
            figure_id: figure_id.to_string(),
            video_url: state.idle_videos.get_cached(figure_id),
            is_generating: state.idle_videos.is_generating(figure_id),
            error: entry.and_then(|entry| entry.error),
        }
    }
}

fn is_valid_figure_id(figure_id: &str) -> bool {
    !figure_id.is_empty()
        && figure_id.len() <= MAX_FIGURE_ID_LEN
        && figure_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn validate_figure_id(figure_id: &str) -> AppResult<()> {
    if is_valid_figure_id(figure_id) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid figure_id format".to_string()))
    }
}

fn validate_source_url(source_url: &str) -> AppResult<()> {
    let parsed = url::Url::parse(source_url)
        .map_err(|e| AppError::BadRequest(format!("Invalid source_url: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::BadRequest(
            "source_url must use http or https".to_string(),
        ));
    }

    Ok(())
}

fn require_generator(state: &AppState) -> AppResult<Arc<dyn IdleVideoGenerator>> {
    state.avatar.clone().ok_or_else(|| {
        AppError::ProviderNotConfigured("Avatar provider not configured".to_string())
    })
}

/// Generate (or reuse) the idle video of a figure and wait for it
///
/// Concurrent requests for the same figure share one provider render.
pub async fn generate_idle_video(
    State(state): State<Arc<AppState>>,
    Path(figure_id): Path<String>,
    Json(request): Json<IdleVideoRequest>,
) -> AppResult<Json<IdleVideoStatus>> {
    validate_figure_id(&figure_id)?;
    validate_source_url(&request.source_url)?;

    if let Some(video_url) = state.idle_videos.get_cached(&figure_id) {
        return Ok(Json(IdleVideoStatus {
            figure_id,
            video_url: Some(video_url),
            is_generating: false,
            error: None,
        }));
    }

    let generator = require_generator(&state)?;
    info!(
        "Idle video requested - figure_id={}, provider={}",
        figure_id,
        generator.provider_name()
    );

    let source_url = request.source_url;
    let outcome = state
        .idle_videos
        .try_get_or_generate(&figure_id, move || async move {
            generator.generate_idle_video(&source_url).await
        })
        .await;

    match outcome {
        Ok(video_url) => Ok(Json(IdleVideoStatus {
            figure_id,
            video_url: Some(video_url),
            is_generating: false,
            error: None,
        })),
        Err(reason) => {
            warn!(
                "Idle video generation failed - figure_id={}: {}",
                figure_id, reason
            );
            Err(AppError::GenerationFailed(reason))
        }
    }
}

/// Start an idle video render in the background
pub async fn preload_idle_video(
    State(state): State<Arc<AppState>>,
    Path(figure_id): Path<String>,
    Json(request): Json<IdleVideoRequest>,
) -> AppResult<Response> {
    validate_figure_id(&figure_id)?;
    validate_source_url(&request.source_url)?;

    if state.idle_videos.get_cached(&figure_id).is_none() {
        let generator = require_generator(&state)?;
        let source_url = request.source_url;
        state
            .idle_videos
            .fire_and_forget(&figure_id, move || async move {
                generator.generate_idle_video(&source_url).await
            });
        info!("Idle video preload started - figure_id={}", figure_id);
    }

    let status = IdleVideoStatus::snapshot(&state, &figure_id);
    Ok((StatusCode::ACCEPTED, Json(status)).into_response())
}

/// Report the cached idle video state of a figure without generating
pub async fn idle_video_status(
    State(state): State<Arc<AppState>>,
    Path(figure_id): Path<String>,
) -> AppResult<Json<IdleVideoStatus>> {
    validate_figure_id(&figure_id)?;

    Ok(Json(IdleVideoStatus::snapshot(&state, &figure_id)))
}

/// Forget every cached idle video
pub async fn clear_idle_videos(State(state): State<Arc<AppState>>) -> StatusCode {
    state.idle_videos.clear();
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_figure_id() {
        assert!(is_valid_figure_id("figure-42"));
        assert!(is_valid_figure_id("Figure_A"));
        assert!(is_valid_figure_id(&"a".repeat(MAX_FIGURE_ID_LEN)));

        assert!(!is_valid_figure_id(""));
        assert!(!is_valid_figure_id(&"a".repeat(MAX_FIGURE_ID_LEN + 1)));
        assert!(!is_valid_figure_id("../etc"));
        assert!(!is_valid_figure_id("figure 1"));
        assert!(!is_valid_figure_id("fígura"));
    }

    #[test]
    fn test_validate_source_url() {
        assert!(validate_source_url("https://cdn.example.com/figure.png").is_ok());
        assert!(validate_source_url("http://localhost:8080/a.jpg").is_ok());

        assert!(matches!(
            validate_source_url("ftp://example.com/a.png"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            validate_source_url("figure.png"),
            Err(AppError::BadRequest(_))
        ));
    }
}
