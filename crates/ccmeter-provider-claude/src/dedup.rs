//! Record deduplication
//!
//! Claude Code re-logs the same assistant turn in several places (resumed
//! sessions copy earlier history into a new file), so a record is identified by
//! `message.id` plus the top-level `requestId`. Records missing either half have
//! no stable identity and are always counted.
//!
//! A strategy instance belongs to exactly one ingestion run; every run starts
//! from an empty set.

use std::collections::HashSet;
use tracing::trace;

/// Seen-key set for one ingestion run
#[derive(Debug, Default)]
pub struct DeduplicationStrategy {
    seen: HashSet<String>,
    duplicates: usize,
}

impl DeduplicationStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the composite key, only when both halves are present
    pub fn key_for(message_id: Option<&str>, request_id: Option<&str>) -> Option<String> {
        match (message_id, request_id) {
            (Some(msg_id), Some(req_id)) => Some(format!("{msg_id}:{req_id}")),
            _ => None,
        }
    }

    /// Test-and-set: true the first time `key` is offered, false afterwards
    pub fn should_include(&mut self, key: &str) -> bool {
        if self.seen.contains(key) {
            self.duplicates += 1;
            trace!("Skipping duplicate entry with key: {}", key);
            return false;
        }
        self.seen.insert(key.to_owned());
        true
    }

    /// Like [`should_include`](Self::should_include), but keyless records pass
    pub fn should_include_record(&mut self, key: Option<&str>) -> bool {
        match key {
            Some(key) => self.should_include(key),
            None => true,
        }
    }

    /// Forget every key and reset the duplicate counter
    pub fn reset(&mut self) {
        self.seen.clear();
        self.duplicates = 0;
    }

    /// Number of distinct keys seen
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Number of records rejected as duplicates
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}
