use axum::{extract::State, response::Json};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::state::AppState;

/// Health check handler
pub async fn health_check(State(_state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "status": "OK" }))
}
