use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while rendering an idle video.
///
/// The `Display` text of these errors is what the coalescing cache records as
/// a figure's last failure.
#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("Avatar provider API key not configured")]
    MissingApiKey,

    #[error("Invalid avatar configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Request to avatar provider failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Avatar provider returned {status}: {message}")]
    ProviderError { status: u16, message: String },

    #[error("Failed to parse avatar provider response: {0}")]
    ParseError(String),

    #[error("Idle video generation failed: {0}")]
    GenerationFailed(String),

    #[error("Idle video not ready after {attempts} status checks")]
    Timeout { attempts: u32 },
}

pub type AvatarResult<T> = Result<T, AvatarError>;

/// Anything that can turn a figure's source image into an idle-loop video URL.
#[async_trait]
pub trait IdleVideoGenerator: Send + Sync {
    /// Renders the idle video and returns the URL of the finished file.
    async fn generate_idle_video(&self, source_url: &str) -> AvatarResult<String>;

    /// Provider name used in logs.
    fn provider_name(&self) -> &'static str;
}
