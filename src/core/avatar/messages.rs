//! D-ID talks API message types.
//!
//! Request and response bodies for creating a talk and polling its status.

use serde::{Deserialize, Serialize};

use super::DEFAULT_VOICE_PROVIDER;

// =============================================================================
// Create Talk
// =============================================================================

/// Body of `POST /talks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTalkRequest {
    /// Publicly reachable image of the avatar figure.
    pub source_url: String,
    pub script: TalkScript,
    pub config: TalkConfig,
}

impl CreateTalkRequest {
    /// Builds a request that renders `ssml` spoken by `voice_id`.
    pub fn idle(source_url: &str, ssml: &str, voice_id: &str) -> Self {
        Self {
            source_url: source_url.to_string(),
            script: TalkScript {
                kind: "text".to_string(),
                input: ssml.to_string(),
                ssml: true,
                provider: ScriptProvider {
                    kind: DEFAULT_VOICE_PROVIDER.to_string(),
                    voice_id: voice_id.to_string(),
                },
            },
            config: TalkConfig::default(),
        }
    }
}

/// Script the avatar performs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TalkScript {
    #[serde(rename = "type")]
    pub kind: String,
    pub input: String,
    #[serde(default)]
    pub ssml: bool,
    pub provider: ScriptProvider,
}

/// TTS voice used for a text script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptProvider {
    #[serde(rename = "type")]
    pub kind: String,
    pub voice_id: String,
}

/// Rendering options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TalkConfig {
    /// Blend the end of the clip back into the first frame.
    pub fluent: bool,
    /// Seconds of silence padded after the audio.
    pub pad_audio: f32,
}

impl Default for TalkConfig {
    fn default() -> Self {
        Self {
            fluent: false,
            pad_audio: 0.0,
        }
    }
}

/// Response of `POST /talks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTalkResponse {
    pub id: String,
    #[serde(default)]
    pub status: TalkStatus,
}

// =============================================================================
// Talk Status
// =============================================================================

/// Render state of a talk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TalkStatus {
    /// Accepted, not yet picked up
    #[default]
    Created,
    /// Rendering
    Started,
    /// Finished; `result_url` is set
    Done,
    /// Rendering failed
    Error,
    /// Refused by moderation
    Rejected,
}

impl TalkStatus {
    /// True once the talk will not change state anymore.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error | Self::Rejected)
    }
}

impl std::fmt::Display for TalkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Started => write!(f, "started"),
            Self::Done => write!(f, "done"),
            Self::Error => write!(f, "error"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Response of `GET /talks/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TalkStatusResponse {
    pub id: String,
    pub status: TalkStatus,
    #[serde(default)]
    pub result_url: Option<String>,
    /// Provider error object, shape varies by failure kind.
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl TalkStatusResponse {
    /// Human-readable failure reason extracted from `error`.
    pub fn error_message(&self) -> String {
        match &self.error {
            Some(serde_json::Value::String(message)) => message.clone(),
            Some(value) => value
                .get("description")
                .or_else(|| value.get("message"))
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string()),
            None => format!("talk {} ended with status {}", self.id, self.status),
        }
    }
}
