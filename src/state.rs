use std::sync::Arc;

use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::core::avatar::{DidAvatarClient, IdleVideoGenerator};
use crate::core::cache::CoalescingCache;
use crate::core::chunker::AudioChunker;

/// Application state shared by all handlers
pub struct AppState {
    pub config: ServerConfig,
    /// Idle video URLs keyed by figure id
    pub idle_videos: CoalescingCache,
    pub chunker: AudioChunker,
    /// `None` when no avatar API key is configured
    pub avatar: Option<Arc<dyn IdleVideoGenerator>>,
}

impl AppState {
    /// Build state from configuration
    ///
    /// A missing or invalid avatar configuration is not fatal: the server
    /// still starts and the idle video endpoints answer 503.
    pub async fn new(config: ServerConfig) -> Arc<Self> {
        let avatar: Option<Arc<dyn IdleVideoGenerator>> = if config.has_avatar_provider() {
            match config
                .avatar_config()
                .and_then(|avatar| DidAvatarClient::new(avatar).map_err(|e| e.to_string()))
            {
                Ok(client) => {
                    info!(
                        "Avatar provider initialized: {}",
                        client.config().api_url
                    );
                    let client: Arc<dyn IdleVideoGenerator> = Arc::new(client);
                    Some(client)
                }
                Err(e) => {
                    warn!("Avatar provider disabled: {}", e);
                    None
                }
            }
        } else {
            info!("No avatar API key configured; idle video generation disabled");
            None
        };

        Self::build(config, avatar)
    }

    /// Build state around a caller-supplied generator
    pub fn with_generator(config: ServerConfig, generator: Arc<dyn IdleVideoGenerator>) -> Arc<Self> {
        Self::build(config, Some(generator))
    }

    fn build(config: ServerConfig, avatar: Option<Arc<dyn IdleVideoGenerator>>) -> Arc<Self> {
        let chunker = AudioChunker::new(config.chunker_config());

        Arc::new(Self {
            config,
            idle_videos: CoalescingCache::new(),
            chunker,
            avatar,
        })
    }
}
