use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::data_url::EncodedPayload;
use super::{BASE64_BLOCK_LEN, ChunkerConfig};

/// Ratio of decoded bytes to base64 characters.
const DECODED_BYTES_PER_CHAR: f64 = 3.0 / 4.0;

// =============================================================================
// Chunk Types
// =============================================================================

/// One bounded slice of an audio data URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioChunk {
    /// Position of this chunk, starting at 0.
    pub index: usize,
    /// Self-contained payload: this slice behind the original header, if any.
    pub data_url: String,
    /// Estimated playback length of this slice in seconds.
    #[serde(rename = "estimatedDurationSec")]
    pub estimated_duration_secs: f64,
}

impl AudioChunk {
    fn whole(payload: &str, estimated_duration_secs: f64) -> Self {
        Self {
            index: 0,
            data_url: payload.to_string(),
            estimated_duration_secs,
        }
    }

    /// The encoded text after the header, or the whole payload when there is
    /// no comma.
    pub fn body(&self) -> &str {
        self.data_url
            .split_once(',')
            .map_or(self.data_url.as_str(), |(_, body)| body)
    }

    /// Decodes the chunk body as standard base64.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(self.body())
    }
}

/// Splitting decision plus the chunks to submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkPlan {
    #[serde(rename = "shouldChunk")]
    pub should_chunk: bool,
    pub chunks: Vec<AudioChunk>,
    #[serde(rename = "totalDuration")]
    pub total_duration_secs: f64,
}

// =============================================================================
// AudioChunker
// =============================================================================

/// Splits oversized audio data URLs into provider-sized chunks.
///
/// Every operation is a pure function of its input and never fails: payloads
/// that are not recognisable data URLs come back as a single opaque chunk.
#[derive(Debug, Clone, Default)]
pub struct AudioChunker {
    config: ChunkerConfig,
}

impl AudioChunker {
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Estimates playback duration from the length of the encoded body.
    ///
    /// The body is the text after the comma of a `data:` URL, or the whole
    /// payload when it is headerless base64. Anything else, or an empty body,
    /// gets the configured fallback duration.
    pub fn estimate_duration(&self, payload: &str) -> f64 {
        EncodedPayload::parse(payload)
            .body()
            .map(|body| self.duration_for_len(body.len()))
            .unwrap_or(self.config.fallback_duration_secs)
    }

    /// Returns true when the estimated duration exceeds the per-chunk budget.
    pub fn should_chunk(&self, payload: &str) -> bool {
        self.estimate_duration(payload) > self.config.max_chunk_duration_secs
    }

    /// Splits `payload` into ordered chunks no longer than the duration budget.
    ///
    /// Slices are `ceil(len / n)` characters rounded up to a whole base64
    /// block, so every chunk but the last decodes on its own. The last chunk
    /// is the plain remainder; it is block aligned exactly when the input body
    /// is. Chunks of a `data:` URL carry its header, chunks of a headerless
    /// body stay headerless.
    pub fn split(&self, payload: &str) -> Vec<AudioChunk> {
        let parsed = EncodedPayload::parse(payload);
        let Some(body) = parsed.body() else {
            debug!("Payload has no encoded body, returning it as a single chunk");
            return vec![AudioChunk::whole(
                payload,
                self.config.fallback_duration_secs,
            )];
        };

        let total_duration = self.duration_for_len(body.len());
        if total_duration <= self.config.max_chunk_duration_secs {
            return vec![AudioChunk::whole(payload, total_duration)];
        }

        if body.len() % BASE64_BLOCK_LEN != 0 {
            warn!(
                body_len = body.len(),
                "Audio body is not base64 block aligned, final chunk will not decode on its own"
            );
        }

        let num_chunks = (total_duration / self.config.max_chunk_duration_secs).ceil() as usize;
        let chars_per_chunk = body
            .len()
            .div_ceil(num_chunks)
            .next_multiple_of(BASE64_BLOCK_LEN);

        let mut chunks = Vec::with_capacity(num_chunks);
        let mut start = 0;
        while start < body.len() {
            let mut end = (start + chars_per_chunk).min(body.len());
            // Base64 is ASCII; this only moves for malformed non-ASCII bodies.
            while !body.is_char_boundary(end) {
                end += 1;
            }

            let slice = &body[start..end];
            chunks.push(AudioChunk {
                index: chunks.len(),
                data_url: parsed.with_body(slice),
                estimated_duration_secs: self.duration_for_len(slice.len()),
            });
            start = end;
        }

        debug!(
            total_duration,
            num_chunks,
            chars_per_chunk,
            produced = chunks.len(),
            "Split audio payload"
        );

        chunks
    }

    /// Combines [`should_chunk`](Self::should_chunk), [`split`](Self::split)
    /// and [`estimate_duration`](Self::estimate_duration).
    pub fn get_chunk_config(&self, payload: &str) -> ChunkPlan {
        ChunkPlan {
            should_chunk: self.should_chunk(payload),
            chunks: self.split(payload),
            total_duration_secs: self.estimate_duration(payload),
        }
    }

    #[inline]
    fn duration_for_len(&self, encoded_len: usize) -> f64 {
        encoded_len as f64 * DECODED_BYTES_PER_CHAR / self.config.bytes_per_second
    }
}
