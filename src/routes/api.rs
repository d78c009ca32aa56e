use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{audio, idle_video};
use crate::state::AppState;
use std::sync::Arc;

/// Create the API router
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/audio/chunks", post(audio::plan_chunks))
        .route(
            "/idle-videos/{figure_id}",
            get(idle_video::idle_video_status).post(idle_video::generate_idle_video),
        )
        .route(
            "/idle-videos/{figure_id}/preload",
            post(idle_video::preload_idle_video),
        )
        .route("/idle-videos", delete(idle_video::clear_idle_videos))
        .layer(TraceLayer::new_for_http())
}
