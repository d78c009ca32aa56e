use serde::Serialize;

/// Observable state of one key in a [`CoalescingCache`](super::CoalescingCache).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntry {
    pub key: String,
    /// Value from the last successful generation. Never replaced by a failure.
    pub result: Option<String>,
    /// True while a generation for this key is registered and unsettled.
    pub is_generating: bool,
    /// Reason of the last failed attempt, cleared when a new attempt starts.
    pub error: Option<String>,
}

impl CacheEntry {
    pub(crate) fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            result: None,
            is_generating: false,
            error: None,
        }
    }

    pub(crate) fn start(&mut self) {
        self.is_generating = true;
        self.error = None;
    }

    pub(crate) fn settle(&mut self, outcome: &Result<String, String>) {
        self.is_generating = false;
        match outcome {
            Ok(value) => {
                self.result = Some(value.clone());
                self.error = None;
            }
            Err(message) => {
                self.error = Some(message.clone());
            }
        }
    }
}
