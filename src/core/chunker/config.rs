use serde::{Deserialize, Serialize};

use super::{
    DEFAULT_BYTES_PER_SECOND, DEFAULT_FALLBACK_DURATION_SECS, DEFAULT_MAX_CHUNK_DURATION_SECS,
};

/// Tuning knobs for [`AudioChunker`](super::AudioChunker).
///
/// All three values are heuristics. `bytes_per_second` in particular is only an
/// approximation of compressed speech and should be overridden when the
/// upstream TTS encodes at a different bitrate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Decoded bytes that correspond to one second of audio.
    pub bytes_per_second: f64,
    /// Maximum estimated duration of a single chunk, in seconds.
    pub max_chunk_duration_secs: f64,
    /// Duration assumed for payloads without a parseable body.
    pub fallback_duration_secs: f64,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            bytes_per_second: DEFAULT_BYTES_PER_SECOND,
            max_chunk_duration_secs: DEFAULT_MAX_CHUNK_DURATION_SECS,
            fallback_duration_secs: DEFAULT_FALLBACK_DURATION_SECS,
        }
    }
}

impl ChunkerConfig {
    /// Checks that every value is finite and strictly positive.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("bytes_per_second", self.bytes_per_second),
            ("max_chunk_duration_secs", self.max_chunk_duration_secs),
            ("fallback_duration_secs", self.fallback_duration_secs),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!(
                    "Chunker setting {name} must be a positive number, got {value}"
                ));
            }
        }

        Ok(())
    }
}
