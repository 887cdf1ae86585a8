//! Injectable time source for the hold-expiration engine.
//!
//! The service never reads the wall clock directly; it holds a `Box<dyn
//! Clock>` so tests can freeze and advance time deterministically without
//! a background timer.

use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

pub trait Clock: std::fmt::Debug + Send + Sync {
    /// Milliseconds since an arbitrary but fixed epoch. Must be
    /// non-decreasing across successive calls.
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        SystemTime::now().duration_since(UNIX_EPOCH).expect("system clock before UNIX epoch").as_millis() as i64
    }
}

/// A clock tests can pin and advance by hand.
#[derive(Debug, Clone)]
pub struct MockClock {
    millis: Arc<RwLock<i64>>,
}

impl MockClock {
    pub fn new(start_millis: i64) -> Self {
        Self { millis: Arc::new(RwLock::new(start_millis)) }
    }

    pub fn set(&self, millis: i64) {
        *self.millis.write().expect("MockClock poisoned") = millis;
    }

    pub fn advance(&self, delta_millis: i64) {
        let mut guard = self.millis.write().expect("MockClock poisoned");
        *guard += delta_millis;
    }
}

impl Clock for MockClock {
    fn now_millis(&self) -> i64 {
        *self.millis.read().expect("MockClock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_clock_advances_monotonically() {
        let clock = MockClock::new(1_000);
        assert_eq!(clock.now_millis(), 1_000);
        clock.advance(250);
        assert_eq!(clock.now_millis(), 1_250);
        clock.set(5_000);
        assert_eq!(clock.now_millis(), 5_000);
    }
}
