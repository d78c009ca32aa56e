use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::core::avatar::AvatarError;

/// Errors surfaced to HTTP clients
///
/// Every variant renders as `{"error": "<message>"}` with a matching status code.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed path parameter or request body
    #[error("{0}")]
    BadRequest(String),

    /// No avatar provider credentials on this server
    #[error("{0}")]
    ProviderNotConfigured(String),

    /// The avatar provider failed to produce a video
    #[error("{0}")]
    GenerationFailed(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ProviderNotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AvatarError> for AppError {
    fn from(err: AvatarError) -> Self {
        match err {
            AvatarError::MissingApiKey => AppError::ProviderNotConfigured(err.to_string()),
            AvatarError::InvalidConfiguration(message) => AppError::Internal(message),
            other => AppError::GenerationFailed(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed with {}: {}", status, self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::BadRequest("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::ProviderNotConfigured("none".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::GenerationFailed("boom".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Internal("oops".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_avatar_error() {
        let err: AppError = AvatarError::MissingApiKey.into();
        assert!(matches!(err, AppError::ProviderNotConfigured(_)));

        let err: AppError = AvatarError::Timeout { attempts: 2 }.into();
        assert!(matches!(err, AppError::GenerationFailed(_)));
        assert!(err.to_string().contains("2 status checks"));
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = AppError::BadRequest("Invalid figure_id".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "Invalid figure_id");
    }
}
