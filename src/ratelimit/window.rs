//! Sliding window log for a single caller.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::decision::Decision;
use super::policy::RateLimitPolicy;

/// Timestamps of the requests admitted for one caller.
///
/// The log is exact: every admitted request is kept until it is older than
/// the window, so there is no double counting at window boundaries. Its
/// length never exceeds the capacity of the policy it is checked against.
#[derive(Debug, Clone)]
pub struct ClientWindow {
    /// Admission instants, oldest first
    events: VecDeque<Instant>,
    /// Window width of the last policy applied, used for eviction
    window: Duration,
    /// Last time this caller was checked
    last_seen: Instant,
}

impl ClientWindow {
    /// Create an empty window for a caller first seen at `now`.
    pub fn new(window: Duration, now: Instant) -> Self {
        Self {
            events: VecDeque::new(),
            window,
            last_seen: now,
        }
    }

    /// Check one request against `policy` and record it if admitted.
    pub fn check_and_record(&mut self, policy: &RateLimitPolicy, now: Instant) -> Decision {
        self.window = policy.window();
        self.last_seen = now;
        self.prune(now);

        let limit = policy.capacity();
        let remaining = limit.saturating_sub(self.events.len() as u64);
        let reset_after = match self.events.front() {
            Some(oldest) => self
                .window
                .saturating_sub(now.saturating_duration_since(*oldest)),
            None => self.window,
        };

        if remaining > 0 {
            self.events.push_back(now);
            Decision::admitted(limit, remaining - 1, reset_after)
        } else {
            Decision::denied(limit, reset_after)
        }
    }

    /// Whether the window holds no live events and has not been touched for
    /// a full window width.
    pub fn is_idle(&mut self, now: Instant) -> bool {
        self.prune(now);
        self.events.is_empty() && now.saturating_duration_since(self.last_seen) >= self.window
    }

    /// Number of events currently recorded.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop events strictly older than `now - window`.
    fn prune(&mut self, now: Instant) {
        while let Some(oldest) = self.events.front() {
            if now.saturating_duration_since(*oldest) > self.window {
                self.events.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(capacity: u64, secs: u64) -> RateLimitPolicy {
        RateLimitPolicy::new(capacity, Duration::from_secs(secs)).unwrap()
    }

    #[test]
    fn test_first_request_admitted_with_full_reset() {
        let start = Instant::now();
        let policy = policy(3, 60);
        let mut window = ClientWindow::new(policy.window(), start);

        let decision = window.check_and_record(&policy, start);
        assert!(decision.allowed);
        assert_eq!(decision.limit, 3);
        assert_eq!(decision.remaining, 2);
        assert_eq!(decision.reset_after, Duration::from_secs(60));
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_denied_request_not_recorded() {
        let start = Instant::now();
        let policy = policy(1, 60);
        let mut window = ClientWindow::new(policy.window(), start);

        assert!(window.check_and_record(&policy, start).allowed);
        let decision = window.check_and_record(&policy, start + Duration::from_secs(1));
        assert!(!decision.allowed);
        assert_eq!(window.len(), 1);
    }

    #[test]
    fn test_event_exactly_window_old_still_counts() {
        let start = Instant::now();
        let policy = policy(1, 60);
        let mut window = ClientWindow::new(policy.window(), start);

        window.check_and_record(&policy, start);

        let decision = window.check_and_record(&policy, start + Duration::from_secs(60));
        assert!(!decision.allowed);
        assert_eq!(decision.reset_after, Duration::ZERO);

        let just_after = start + Duration::from_secs(60) + Duration::from_nanos(1);
        let decision = window.check_and_record(&policy, just_after);
        assert!(decision.allowed);
    }

    #[test]
    fn test_zero_capacity_denies_everything() {
        let start = Instant::now();
        let policy = policy(0, 60);
        let mut window = ClientWindow::new(policy.window(), start);

        for i in 0..3 {
            let decision = window.check_and_record(&policy, start + Duration::from_secs(i * 100));
            assert!(!decision.allowed);
            assert_eq!(decision.remaining, 0);
            assert_eq!(decision.reset_after, Duration::from_secs(60));
        }
        assert!(window.is_empty());
    }

    #[test]
    fn test_idle_after_full_window() {
        let start = Instant::now();
        let policy = policy(5, 10);
        let mut window = ClientWindow::new(policy.window(), start);

        window.check_and_record(&policy, start);
        assert!(!window.is_idle(start + Duration::from_secs(5)));
        assert!(!window.is_idle(start + Duration::from_secs(10)));
        assert!(window.is_idle(start + Duration::from_secs(11)));
    }
}
