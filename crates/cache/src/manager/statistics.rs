//! Cache statistics tracking and reporting

use serde::{Deserialize, Serialize};

/// Cumulative statistics for one cache region
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub puts: u64,
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub size: u64,
}

impl CacheStats {
    /// Create new statistics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a write; only a previously absent key grows the region
    pub fn record_put(&mut self, new_key: bool) {
        self.puts += 1;
        if new_key {
            self.size += 1;
        }
    }

    /// Record a cache hit
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Record a cache miss, noting whether it was caused by expiry
    pub fn record_miss(&mut self, expired: bool) {
        self.misses += 1;
        if expired {
            self.expirations += 1;
        }
    }

    /// Record the removal of an entry
    pub fn record_removal(&mut self) {
        self.size = self.size.saturating_sub(1);
    }

    /// `[puts, hits, misses, expirations, size]`
    pub fn summary(&self) -> [u64; 5] {
        [self.puts, self.hits, self.misses, self.expirations, self.size]
    }

    /// Calculate hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}
