//! D-ID talks client.
//!
//! Creates a talk for the figure image, then polls it until the provider
//! reports a terminal status.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, info};

use super::base::{AvatarError, AvatarResult, IdleVideoGenerator};
use super::config::AvatarConfig;
use super::messages::{CreateTalkRequest, CreateTalkResponse, TalkStatus, TalkStatusResponse};

/// HTTP client for a D-ID compatible talks API.
#[derive(Debug, Clone)]
pub struct DidAvatarClient {
    client: reqwest::Client,
    config: AvatarConfig,
}

impl DidAvatarClient {
    /// Creates a client after validating `config`.
    pub fn new(config: AvatarConfig) -> AvatarResult<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AvatarConfig {
        &self.config
    }

    fn authorization(&self) -> String {
        format!("Basic {}", self.config.api_key)
    }

    /// Submits a new idle-loop talk for `source_url`.
    pub async fn create_talk(&self, source_url: &str) -> AvatarResult<CreateTalkResponse> {
        let body = CreateTalkRequest::idle(
            source_url,
            &self.config.idle_script,
            &self.config.voice_id,
        );

        debug!(
            "Creating idle talk: source_url={}, voice_id={}",
            source_url, self.config.voice_id
        );

        let response = self
            .client
            .post(self.config.talks_url())
            .header(AUTHORIZATION, self.authorization())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let response = error_for_status(response).await?;
        response
            .json::<CreateTalkResponse>()
            .await
            .map_err(|e| AvatarError::ParseError(e.to_string()))
    }

    /// Fetches the current state of a talk.
    pub async fn get_talk(&self, talk_id: &str) -> AvatarResult<TalkStatusResponse> {
        let response = self
            .client
            .get(self.config.talk_url(talk_id))
            .header(AUTHORIZATION, self.authorization())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let response = error_for_status(response).await?;
        response
            .json::<TalkStatusResponse>()
            .await
            .map_err(|e| AvatarError::ParseError(e.to_string()))
    }

    /// Polls a talk until it is done, failed, or the attempt budget runs out.
    pub async fn wait_for_talk(&self, talk_id: &str) -> AvatarResult<String> {
        let max_attempts = self.config.max_poll_attempts;

        for attempt in 1..=max_attempts {
            let talk = self.get_talk(talk_id).await?;

            match talk.status {
                TalkStatus::Done => {
                    return talk
                        .result_url
                        .filter(|url| !url.is_empty())
                        .ok_or_else(|| {
                            AvatarError::GenerationFailed(format!(
                                "talk {talk_id} finished without a result_url"
                            ))
                        });
                }
                TalkStatus::Error | TalkStatus::Rejected => {
                    return Err(AvatarError::GenerationFailed(talk.error_message()));
                }
                TalkStatus::Created | TalkStatus::Started => {
                    debug!(
                        talk_id,
                        attempt,
                        status = %talk.status,
                        "Idle talk still rendering"
                    );
                    if attempt < max_attempts {
                        tokio::time::sleep(self.config.poll_interval).await;
                    }
                }
            }
        }

        Err(AvatarError::Timeout {
            attempts: max_attempts,
        })
    }
}

#[async_trait]
impl IdleVideoGenerator for DidAvatarClient {
    async fn generate_idle_video(&self, source_url: &str) -> AvatarResult<String> {
        let talk = self.create_talk(source_url).await?;
        info!(talk_id = %talk.id, "Idle talk created");

        let url = self.wait_for_talk(&talk.id).await?;
        info!(talk_id = %talk.id, "Idle video ready");

        Ok(url)
    }

    fn provider_name(&self) -> &'static str {
        "d-id"
    }
}

/// Turns a non-2xx response into [`AvatarError::ProviderError`].
async fn error_for_status(response: reqwest::Response) -> AvatarResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(AvatarError::ProviderError {
        status: status.as_u16(),
        message,
    })
}
