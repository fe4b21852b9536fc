//! Message-id deduplication across feed re-creations and recovery reads.

use std::time::{Duration, Instant};

use crate::cache::TtlCache;

/// Ids of messages delivered within the last `window`, capped at
/// `max_entries` (oldest dropped first).
#[derive(Debug)]
pub struct DedupWindow {
    seen: TtlCache<String, ()>,
}

impl DedupWindow {
    pub fn new(window: Duration, max_entries: usize) -> Self {
        Self {
            seen: TtlCache::new(window, max_entries),
        }
    }

    pub fn window(&self) -> Duration {
        self.seen.ttl()
    }

    /// Record `message_id` and return true, or return false if it was
    /// already delivered inside the window. A repeat does not extend the
    /// original delivery's lifetime.
    pub fn insert_if_new(&mut self, message_id: &str, now: Instant) -> bool {
        if self.seen.contains(message_id, now) {
            return false;
        }
        self.seen.insert(message_id.to_string(), (), now);
        true
    }

    pub fn contains(&mut self, message_id: &str, now: Instant) -> bool {
        self.seen.contains(message_id, now)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
