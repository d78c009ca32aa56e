//! Request coalescing cache for expensive per-key generation.
//!
//! Avatar idle-loop videos take tens of seconds to render and are billed per
//! request, so the gateway must never start two renders for the same figure.
//! [`CoalescingCache`] guarantees that:
//!
//! - a successful result is computed once per key and kept until [`clear`];
//! - concurrent callers for a key in flight share the same pending outcome;
//! - a failed attempt is recorded and the next call retries.
//!
//! The check-cache / check-pending / start-new decision runs under a single
//! mutex. Generation itself runs on a spawned task, so callers that give up
//! waiting do not cancel it.
//!
//! # Example
//!
//! ```rust,no_run
//! use avatar_gateway::core::cache::CoalescingCache;
//!
//! # async fn run() {
//! let cache = CoalescingCache::new();
//! let url = cache
//!     .get_or_generate("figure-1", || async {
//!         Ok::<_, std::io::Error>("https://cdn.example.com/idle.mp4".to_string())
//!     })
//!     .await;
//! assert_eq!(url.as_deref(), Some("https://cdn.example.com/idle.mp4"));
//! # }
//! ```
//!
//! [`clear`]: CoalescingCache::clear

mod coalescing;
mod entry;

pub use coalescing::CoalescingCache;
pub use entry::CacheEntry;

/// Error recorded when a generation succeeds without producing a value.
pub const EMPTY_RESULT_ERROR: &str = "Generation returned an empty result";

/// Error recorded when a generation task panics.
pub const PANICKED_ERROR: &str = "Generation task panicked";
