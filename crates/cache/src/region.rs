//! A single named cache region

use crate::entry::CacheEntry;
use crate::manager::CacheStats;
use idstore_core::Clock;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Outcome of a region lookup
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Hit(Value),
    /// The key was never stored or has been deleted
    Miss,
    /// The key was stored but its entry had expired
    Expired,
}

impl CacheLookup {
    pub fn into_value(self) -> Option<Value> {
        match self {
            CacheLookup::Hit(value) => Some(value),
            CacheLookup::Miss | CacheLookup::Expired => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }
}

#[derive(Debug, Default)]
struct RegionState {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
}

/// Bounded-lifetime key → resource store for one resource category.
///
/// Entries and statistics sit behind one lock so every operation, including
/// its statistics update, is atomic with respect to other callers.
#[derive(Debug)]
pub struct CacheRegion {
    name: String,
    ttl: Duration,
    tti: Duration,
    clock: Arc<dyn Clock>,
    state: Mutex<RegionState>,
}

impl CacheRegion {
    pub fn new(name: impl Into<String>, ttl: Duration, tti: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            name: name.into(),
            ttl,
            tti,
            clock,
            state: Mutex::new(RegionState::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn tti(&self) -> Duration {
        self.tti
    }

    /// Cached value for `key`, if present and fresh
    pub fn get(&self, key: &str) -> Option<Value> {
        self.lookup(key).into_value()
    }

    /// Look up `key`, distinguishing absent entries from expired ones
    pub fn lookup(&self, key: &str) -> CacheLookup {
        let now = self.clock.now();
        let mut guard = self.state.lock();
        let state = &mut *guard;

        match state.entries.get_mut(key) {
            None => {
                state.stats.record_miss(false);
                trace!(region = %self.name, key, "cache miss");
                return CacheLookup::Miss;
            }
            Some(entry) if !entry.is_expired(now, self.ttl, self.tti) => {
                entry.touch(now);
                state.stats.record_hit();
                trace!(region = %self.name, key, "cache hit");
                return CacheLookup::Hit(entry.value.clone());
            }
            Some(_) => {}
        }

        state.entries.remove(key);
        state.stats.record_removal();
        state.stats.record_miss(true);
        trace!(region = %self.name, key, "cache entry expired");
        CacheLookup::Expired
    }

    /// Insert or overwrite the value stored under `key`
    pub fn put(&self, key: impl Into<String>, value: Value) {
        let key = key.into();
        let now = self.clock.now();
        let mut state = self.state.lock();

        let new_key = state
            .entries
            .insert(key.clone(), CacheEntry::new(value, now))
            .is_none();
        state.stats.record_put(new_key);
        trace!(region = %self.name, key = %key, new_key, "cache put");
    }

    /// Remove `key`; absent keys are ignored. Returns whether an entry existed.
    pub fn delete(&self, key: &str) -> bool {
        let mut state = self.state.lock();
        let removed = state.entries.remove(key).is_some();
        if removed {
            state.stats.record_removal();
            trace!(region = %self.name, key, "cache delete");
        }
        removed
    }

    /// Snapshot of the region's statistics
    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry; statistics other than `size` are preserved
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.stats.size = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use idstore_core::testing::ManualClock;
    use serde_json::json;

    fn region_with_clock(ttl: u64, tti: u64) -> (CacheRegion, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let region = CacheRegion::new(
            "accounts",
            Duration::from_secs(ttl),
            Duration::from_secs(tti),
            clock.clone(),
        );
        (region, clock)
    }

    #[test]
    fn test_put_then_get_round_trip() {
        let (region, _) = region_with_clock(300, 300);
        let value = json!({"href": "/accounts/1", "email": "a@b.c"});

        region.put("/accounts/1", value.clone());

        assert_eq!(region.get("/accounts/1"), Some(value));
        assert_eq!(region.stats().summary(), [1, 1, 0, 0, 1]);
    }

    #[test]
    fn test_absent_key_is_plain_miss() {
        let (region, _) = region_with_clock(300, 300);
        assert_eq!(region.lookup("/accounts/nope"), CacheLookup::Miss);
        assert_eq!(region.stats().misses, 1);
        assert_eq!(region.stats().expirations, 0);
    }

    #[test]
    fn test_expiry_counts_miss_and_expiration_once() {
        let (region, clock) = region_with_clock(300, 300);
        region.put("/accounts/1", json!({"href": "/accounts/1", "x": 1}));

        clock.advance(chrono::Duration::seconds(301));

        assert_eq!(region.lookup("/accounts/1"), CacheLookup::Expired);
        let stats = region.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.size, 0);

        // the expired entry is gone, so the next lookup is a plain miss
        assert_eq!(region.lookup("/accounts/1"), CacheLookup::Miss);
        assert_eq!(region.stats().expirations, 1);
    }

    #[test]
    fn test_hit_refreshes_idle_timer() {
        let (region, clock) = region_with_clock(0, 10);
        region.put("k", json!(1));

        for _ in 0..5 {
            clock.advance(chrono::Duration::seconds(8));
            assert!(region.lookup("k").is_hit());
        }

        clock.advance(chrono::Duration::seconds(11));
        assert_eq!(region.lookup("k"), CacheLookup::Expired);
    }

    #[test]
    fn test_overwrite_does_not_double_count_size() {
        let (region, _) = region_with_clock(300, 300);
        region.put("k", json!(1));
        region.put("k", json!(2));

        let stats = region.stats();
        assert_eq!(stats.puts, 2);
        assert_eq!(stats.size, 1);
        assert_eq!(region.get("k"), Some(json!(2)));
    }

    #[test]
    fn test_delete_absent_key_is_noop() {
        let (region, _) = region_with_clock(300, 300);
        region.put("k", json!(1));

        assert!(!region.delete("other"));
        assert_eq!(region.stats().size, 1);
        assert!(region.delete("k"));
        assert_eq!(region.stats().size, 0);
        assert!(region.is_empty());
    }

    #[test]
    fn test_concurrent_puts_keep_size_consistent() {
        let (region, _) = region_with_clock(300, 300);
        let region = Arc::new(region);

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let region = Arc::clone(&region);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        region.put(format!("k{}", i % 50), json!(t));
                        region.get(&format!("k{i}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = region.stats();
        assert_eq!(stats.puts, 800);
        assert_eq!(stats.size, 50);
        assert_eq!(region.len(), 50);
        assert_eq!(stats.hits + stats.misses, 800);
    }
}
