pub mod avatar;
pub mod cache;
pub mod chunker;

// Re-export commonly used types for convenience
pub use avatar::{AvatarConfig, AvatarError, AvatarResult, DidAvatarClient, IdleVideoGenerator};
pub use cache::{CacheEntry, CoalescingCache};
pub use chunker::{AudioChunk, AudioChunker, ChunkPlan, ChunkerConfig};
