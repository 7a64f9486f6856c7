//! Time sources for rate limiting.
//!
//! The limiter never reads the clock itself; callers sample a [`Clock`] once
//! per request and pass the instant in. Tests use [`MockClock`] to move time
//! explicitly.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// System clock implementation using `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually driven clock.
///
/// Clones share the same underlying time, so advancing one clone advances
/// them all.
#[derive(Debug, Clone)]
pub struct MockClock {
    current_time: Arc<Mutex<Instant>>,
}

impl MockClock {
    /// Create a mock clock starting at a specific instant.
    pub fn new(start: Instant) -> Self {
        Self {
            current_time: Arc::new(Mutex::new(start)),
        }
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: Duration) {
        *self.current_time.lock() += duration;
    }

    /// Set the clock to a specific instant.
    pub fn set(&self, instant: Instant) {
        *self.current_time.lock() = instant;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        *self.current_time.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock() {
        let clock = SystemClock::new();
        let t1 = clock.now();
        std::thread::sleep(Duration::from_millis(10));
        let t2 = clock.now();

        assert!(t2 > t1);
    }

    #[test]
    fn test_mock_clock() {
        let start = Instant::now();
        let clock = MockClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::from_secs(10));
        assert_eq!(clock.now(), start + Duration::from_secs(10));

        let shared = clock.clone();
        shared.set(start + Duration::from_secs(100));
        assert_eq!(clock.now(), start + Duration::from_secs(100));
    }
}
