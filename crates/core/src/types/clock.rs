//! Time and nonce sources used when signing requests and aging cache entries

use chrono::{DateTime, Utc};
use std::fmt;

/// Source of the current UTC time
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of single-use tokens bound into each request signature.
///
/// Implementations must never hand out the same value twice.
pub trait NonceGenerator: Send + Sync + fmt::Debug {
    fn next_nonce(&self) -> String;
}

/// Random v4 UUID nonces
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidNonceGenerator;

impl NonceGenerator for UuidNonceGenerator {
    fn next_nonce(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_nonces_are_unique() {
        let generator = UuidNonceGenerator;
        let first = generator.next_nonce();
        let second = generator.next_nonce();
        assert_ne!(first, second);
        assert_eq!(first.len(), 36);
    }
}
