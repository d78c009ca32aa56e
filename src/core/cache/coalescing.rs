use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::entry::CacheEntry;
use super::{EMPTY_RESULT_ERROR, PANICKED_ERROR};

/// Outcome shared by every caller waiting on the same generation.
///
/// Failures carry the reason, so waiters never have to re-read the entry.
type PendingOutcome = Shared<BoxFuture<'static, Result<String, String>>>;

struct Pending {
    id: u64,
    outcome: PendingOutcome,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    pending: HashMap<String, Pending>,
    /// Bumped by `clear()`; settlements from an older epoch are ignored.
    epoch: u64,
    next_id: u64,
}

enum Lookup {
    Cached(String),
    Pending(PendingOutcome),
}

/// Per-key cache that runs each generation at most once at a time.
///
/// Cloning is cheap and every clone shares the same entries. Generation
/// functions run on the ambient tokio runtime, so all operations that may
/// start one must be called from within a runtime.
#[derive(Clone, Default)]
pub struct CoalescingCache {
    state: Arc<Mutex<CacheState>>,
}

impl CoalescingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, joining or starting a generation if
    /// there is none.
    ///
    /// `generate` is invoked only when the key has no cached value and no
    /// generation in flight. A generation that fails, panics or yields an
    /// empty string resolves to `None` for every waiter; the reason is kept in
    /// [`CacheEntry::error`] and the next call tries again.
    pub async fn get_or_generate<F, Fut, E>(&self, key: &str, generate: F) -> Option<String>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<String, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        self.try_get_or_generate(key, generate).await.ok()
    }

    /// Same as [`get_or_generate`](Self::get_or_generate), but a failed
    /// generation yields the reason it failed with.
    ///
    /// The reason travels with the shared outcome, so it is the one produced
    /// by the generation this caller joined even if the cache was cleared or
    /// the key retried before the caller woke up.
    pub async fn try_get_or_generate<F, Fut, E>(
        &self,
        key: &str,
        generate: F,
    ) -> Result<String, String>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<String, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        match self.lookup_or_start(key, generate) {
            Lookup::Cached(value) => Ok(value),
            Lookup::Pending(outcome) => outcome.await,
        }
    }

    /// Starts (or joins) a generation for `key` without waiting for it.
    ///
    /// The outcome is only observable through the cache afterwards.
    pub fn fire_and_forget<F, Fut, E>(&self, key: &str, generate: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<String, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        if let Lookup::Cached(_) = self.lookup_or_start(key, generate) {
            debug!(key, "Skipping warm-up, value already cached");
        }
    }

    pub fn is_generating(&self, key: &str) -> bool {
        self.state.lock().pending.contains_key(key)
    }

    /// Returns the cached value without ever starting a generation.
    pub fn get_cached(&self, key: &str) -> Option<String> {
        self.state
            .lock()
            .entries
            .get(key)
            .and_then(|entry| entry.result.clone())
    }

    /// Snapshot of the state recorded for `key`.
    pub fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.state.lock().entries.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Drops every entry and stops tracking in-flight generations.
    ///
    /// Running generations are not aborted. When they settle their results
    /// still reach the callers already waiting on them, but the cache ignores
    /// them.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        let detached = state.pending.len();
        state.entries.clear();
        state.pending.clear();
        state.epoch = state.epoch.wrapping_add(1);
        info!(detached, "Cleared coalescing cache");
    }

    fn lookup_or_start<F, Fut, E>(&self, key: &str, generate: F) -> Lookup
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<String, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let mut state = self.state.lock();

        if let Some(value) = state.entries.get(key).and_then(|e| e.result.clone()) {
            debug!(key, "Cache hit");
            return Lookup::Cached(value);
        }

        if let Some(pending) = state.pending.get(key) {
            debug!(key, "Joining in-flight generation");
            return Lookup::Pending(pending.outcome.clone());
        }

        let id = state.next_id;
        state.next_id = state.next_id.wrapping_add(1);
        let epoch = state.epoch;

        state
            .entries
            .entry(key.to_string())
            .or_insert_with(|| CacheEntry::new(key))
            .start();

        let cache = self.clone();
        let task_key = key.to_string();
        let task = tokio::spawn(async move {
            let result = AssertUnwindSafe(async move { generate().await })
                .catch_unwind()
                .await;
            let outcome = match result {
                Ok(Ok(value)) if !value.is_empty() => Ok(value),
                Ok(Ok(_)) => Err(EMPTY_RESULT_ERROR.to_string()),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err(PANICKED_ERROR.to_string()),
            };
            cache.settle(&task_key, id, epoch, outcome)
        });

        let join_key = key.to_string();
        let outcome = task
            .map(move |joined| {
                joined.unwrap_or_else(|e| {
                    warn!(key = %join_key, error = %e, "Generation task did not complete");
                    Err(format!("Generation task did not complete: {e}"))
                })
            })
            .boxed()
            .shared();

        state.pending.insert(
            key.to_string(),
            Pending {
                id,
                outcome: outcome.clone(),
            },
        );
        info!(key, "Started generation");

        Lookup::Pending(outcome)
    }

    fn settle(
        &self,
        key: &str,
        id: u64,
        epoch: u64,
        outcome: Result<String, String>,
    ) -> Result<String, String> {
        let mut state = self.state.lock();

        if state.epoch != epoch {
            debug!(key, "Ignoring generation that settled after the cache was cleared");
            return outcome;
        }

        if state.pending.get(key).is_some_and(|p| p.id == id) {
            state.pending.remove(key);
        }

        if let Some(entry) = state.entries.get_mut(key) {
            entry.settle(&outcome);
        }

        match &outcome {
            Ok(_) => info!(key, "Generation succeeded"),
            Err(error) => warn!(key, %error, "Generation failed"),
        }

        outcome
    }
}

impl std::fmt::Debug for CoalescingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("CoalescingCache")
            .field("entries", &state.entries.len())
            .field("pending", &state.pending.len())
            .finish()
    }
}
