//! Rate limit policy definition.

use std::time::Duration;

use crate::error::{BiblioError, Result};

/// How many requests a caller may make within a sliding window.
///
/// A capacity of zero is a valid policy that denies every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    capacity: u64,
    window: Duration,
}

impl RateLimitPolicy {
    /// Create a policy. The window must be longer than zero.
    pub fn new(capacity: u64, window: Duration) -> Result<Self> {
        if window.is_zero() {
            return Err(BiblioError::InvalidPolicy(
                "window duration must be greater than zero".to_string(),
            ));
        }
        Ok(Self { capacity, window })
    }

    /// Maximum number of admissions per window.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Width of the sliding window.
    pub fn window(&self) -> Duration {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_accessors() {
        let policy = RateLimitPolicy::new(10, Duration::from_secs(60)).unwrap();
        assert_eq!(policy.capacity(), 10);
        assert_eq!(policy.window(), Duration::from_secs(60));
    }

    #[test]
    fn test_zero_capacity_allowed() {
        assert!(RateLimitPolicy::new(0, Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn test_zero_window_rejected() {
        let err = RateLimitPolicy::new(5, Duration::ZERO).unwrap_err();
        assert!(matches!(err, BiblioError::InvalidPolicy(_)));
    }
}
