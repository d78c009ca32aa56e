//! Talking-avatar idle video provider.
//!
//! The gateway pre-renders a short silent "idle loop" video for every avatar
//! figure so the front-end has something to play between answers. This module
//! talks to a D-ID compatible REST API to produce those videos.
//!
//! # API Reference
//!
//! - Create talk: `POST {api_url}/talks`
//! - Talk status: `GET {api_url}/talks/{id}`
//!
//! A talk is created with the figure's source image and a script that only
//! contains a pause. The provider renders asynchronously; the client polls the
//! status endpoint until the talk is `done` and returns its `result_url`.
//!
//! # Authentication
//!
//! D-ID uses HTTP Basic authentication with the API key as the credential:
//! `Authorization: Basic {api_key}`.

mod base;
pub mod config;
pub mod messages;
pub mod provider;

pub use base::{AvatarError, AvatarResult, IdleVideoGenerator};
pub use config::AvatarConfig;
pub use messages::{CreateTalkRequest, CreateTalkResponse, TalkStatus, TalkStatusResponse};
pub use provider::DidAvatarClient;

// =============================================================================
// API Constants
// =============================================================================

/// Default D-ID API base URL.
pub const DID_API_URL: &str = "https://api.d-id.com";

/// Path of the talks resource, relative to the API base URL.
pub const TALKS_PATH: &str = "/talks";

// =============================================================================
// Limits and Defaults
// =============================================================================

/// Delay between two status polls.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// Number of status polls before a render is considered timed out.
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 60;

/// Per-request HTTP timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// SSML script for the idle loop: five seconds of silence.
pub const DEFAULT_IDLE_SCRIPT: &str = r#"<speak><break time="5000ms"/></speak>"#;

/// Voice used to "speak" the idle script. Only affects the silence timing.
pub const DEFAULT_VOICE_ID: &str = "en-US-JennyNeural";

/// TTS provider named in the talk script.
pub const DEFAULT_VOICE_PROVIDER: &str = "microsoft";
