//! Cache entry bookkeeping

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::time::Duration;

/// A cached resource together with its age information
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Cached resource graph
    pub value: Value,
    /// When the entry was stored
    pub created_at: DateTime<Utc>,
    /// When the entry was last read or written
    pub last_accessed_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(value: Value, now: DateTime<Utc>) -> Self {
        Self {
            value,
            created_at: now,
            last_accessed_at: now,
        }
    }

    /// Whether the entry outlived its time-to-live or sat idle for longer
    /// than its time-to-idle. A zero duration disables that policy.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration, tti: Duration) -> bool {
        exceeded(self.created_at, now, ttl) || exceeded(self.last_accessed_at, now, tti)
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_accessed_at = now;
    }
}

fn exceeded(since: DateTime<Utc>, now: DateTime<Utc>, limit: Duration) -> bool {
    if limit.is_zero() {
        return false;
    }
    match (now - since).to_std() {
        Ok(elapsed) => elapsed > limit,
        // Clock moved backwards, the entry cannot have aged
        Err(_) => false,
    }
}
