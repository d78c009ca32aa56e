//! Bounded audio chunk splitter.
//!
//! Talking-avatar providers cap the length of the audio they accept per video
//! request. This module decides whether a base64 audio data URL exceeds that
//! budget and, if so, slices it into ordered, block-aligned chunks that can be
//! submitted to the provider in parallel.
//!
//! Durations are estimated from the encoded body length with a fixed
//! bytes-per-second rate. The split is purely by character count: it never
//! looks at the audio itself, so a chunk boundary may land mid-word.
//!
//! # Example
//!
//! ```rust
//! use avatar_gateway::core::chunker::AudioChunker;
//!
//! let chunker = AudioChunker::default();
//! let payload = format!("data:audio/mp3;base64,{}", "A".repeat(90_000));
//!
//! let plan = chunker.get_chunk_config(&payload);
//! assert!(plan.should_chunk);
//! assert_eq!(plan.chunks.len(), 2);
//! ```

mod config;
mod data_url;
mod splitter;

pub use config::ChunkerConfig;
pub use data_url::DataUrl;
pub use splitter::{AudioChunk, AudioChunker, ChunkPlan};

// =============================================================================
// Defaults
// =============================================================================

/// Approximate encoded bytes per second of low-bitrate compressed speech.
pub const DEFAULT_BYTES_PER_SECOND: f64 = 2000.0;

/// Longest audio segment a single avatar video request may carry.
pub const DEFAULT_MAX_CHUNK_DURATION_SECS: f64 = 30.0;

/// Duration reported for payloads whose body cannot be located.
pub const DEFAULT_FALLBACK_DURATION_SECS: f64 = 10.0;

/// Marker every well-formed payload header starts with.
pub const DATA_URL_SCHEME: &str = "data:";

/// Number of characters in one base64 block.
pub const BASE64_BLOCK_LEN: usize = 4;
