//! Avatar provider configuration.

use std::time::Duration;

use super::{
    DEFAULT_IDLE_SCRIPT, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_VOICE_ID, DID_API_URL,
};
use super::base::{AvatarError, AvatarResult};

/// Settings for [`DidAvatarClient`](super::DidAvatarClient).
#[derive(Clone)]
pub struct AvatarConfig {
    pub api_key: String,
    /// Base URL without a trailing slash, e.g. `https://api.d-id.com`.
    pub api_url: String,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
    pub request_timeout: Duration,
    /// SSML spoken by the avatar in the idle loop.
    pub idle_script: String,
    pub voice_id: String,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: DID_API_URL.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            idle_script: DEFAULT_IDLE_SCRIPT.to_string(),
            voice_id: DEFAULT_VOICE_ID.to_string(),
        }
    }
}

// Keep the API key out of logs.
impl std::fmt::Debug for AvatarConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("poll_interval", &self.poll_interval)
            .field("max_poll_attempts", &self.max_poll_attempts)
            .field("request_timeout", &self.request_timeout)
            .field("voice_id", &self.voice_id)
            .finish()
    }
}

impl AvatarConfig {
    pub fn validate(&self) -> AvatarResult<()> {
        if self.api_key.is_empty() {
            return Err(AvatarError::MissingApiKey);
        }
        if self.max_poll_attempts == 0 {
            return Err(AvatarError::InvalidConfiguration(
                "max_poll_attempts must be at least 1".to_string(),
            ));
        }
        if self.idle_script.trim().is_empty() {
            return Err(AvatarError::InvalidConfiguration(
                "idle_script must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// URL of the talks collection.
    pub fn talks_url(&self) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), super::TALKS_PATH)
    }

    /// URL of a single talk.
    pub fn talk_url(&self, talk_id: &str) -> String {
        format!("{}/{}", self.talks_url(), talk_id)
    }
}
