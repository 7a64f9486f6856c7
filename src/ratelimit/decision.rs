//! Outcome of a single admission check.

use std::time::Duration;

/// The result of checking one request against a caller's window.
///
/// A denial is an ordinary value here: the request pipeline turns it into a
/// `429 Too Many Requests` response carrying the same counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether the request was admitted and recorded
    pub allowed: bool,
    /// The policy capacity
    pub limit: u64,
    /// Admissions still available in the current window
    pub remaining: u64,
    /// Time until the oldest counted request leaves the window
    pub reset_after: Duration,
}

impl Decision {
    pub(crate) fn admitted(limit: u64, remaining: u64, reset_after: Duration) -> Self {
        Self {
            allowed: true,
            limit,
            remaining,
            reset_after,
        }
    }

    pub(crate) fn denied(limit: u64, reset_after: Duration) -> Self {
        Self {
            allowed: false,
            limit,
            remaining: 0,
            reset_after,
        }
    }

    /// Whole seconds until reset, rounded up so clients never retry early.
    pub fn reset_after_secs(&self) -> u64 {
        let secs = self.reset_after.as_secs();
        if self.reset_after.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_after_secs_rounds_up() {
        let decision = Decision::denied(5, Duration::from_millis(39_500));
        assert_eq!(decision.reset_after_secs(), 40);

        let decision = Decision::denied(5, Duration::from_secs(40));
        assert_eq!(decision.reset_after_secs(), 40);

        let decision = Decision::denied(5, Duration::ZERO);
        assert_eq!(decision.reset_after_secs(), 0);
    }

    #[test]
    fn test_denied_has_no_remaining() {
        let decision = Decision::denied(3, Duration::from_secs(1));
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
        assert_eq!(decision.limit, 3);
    }
}
