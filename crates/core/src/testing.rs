//! Deterministic clock and nonce sources for tests and reproducible signing

use crate::types::{Clock, NonceGenerator};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// A clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Always returns the same nonce. Only safe for reproducing a known signature.
#[derive(Debug, Clone)]
pub struct FixedNonceGenerator(pub String);

impl NonceGenerator for FixedNonceGenerator {
    fn next_nonce(&self) -> String {
        self.0.clone()
    }
}

/// Produces `<prefix>-0`, `<prefix>-1`, ...
#[derive(Debug)]
pub struct SequentialNonceGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialNonceGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl NonceGenerator for SequentialNonceGenerator {
    fn next_nonce(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_advances() {
        let start = Utc.with_ymd_and_hms(2013, 7, 1, 0, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        clock.advance(Duration::seconds(90));
        assert_eq!(clock.now(), start + Duration::seconds(90));
    }

    #[test]
    fn test_sequential_nonces() {
        let nonces = SequentialNonceGenerator::new("n");
        assert_eq!(nonces.next_nonce(), "n-0");
        assert_eq!(nonces.next_nonce(), "n-1");
    }
}
