//! Core rate limiter implementation.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::client::{fingerprint, ClientId};
use super::clock::Clock;
use super::decision::Decision;
use super::policy::RateLimitPolicy;
use super::window::ClientWindow;

/// Registry of per-caller sliding windows.
///
/// One instance is built at server start and shared by handle. Each check
/// runs under the map shard's write lock for that caller, so the
/// prune-decide-append sequence is atomic per identifier while callers in
/// other shards proceed in parallel.
#[derive(Debug, Default)]
pub struct RateLimiter {
    /// Sliding windows indexed by caller
    windows: DashMap<ClientId, ClientWindow>,
}

impl RateLimiter {
    /// Create an empty rate limiter.
    pub fn new() -> Self {
        Self {
            windows: DashMap::new(),
        }
    }

    /// Check one request from `identifier` against `policy` at `now`.
    ///
    /// Admitted requests are recorded; denied requests leave the window
    /// untouched.
    pub fn check_and_record(
        &self,
        identifier: &str,
        policy: &RateLimitPolicy,
        now: Instant,
    ) -> Decision {
        trace!(client = %fingerprint(identifier), "Checking rate limit");

        let decision = match self.windows.get_mut(identifier) {
            Some(mut window) => window.check_and_record(policy, now),
            None => {
                let mut window = self
                    .windows
                    .entry(ClientId::new(identifier))
                    .or_insert_with(|| {
                        debug!(
                            client = %fingerprint(identifier),
                            limit = policy.capacity(),
                            window = ?policy.window(),
                            "Creating client window"
                        );
                        ClientWindow::new(policy.window(), now)
                    });
                window.check_and_record(policy, now)
            }
        };

        if !decision.allowed {
            debug!(
                client = %fingerprint(identifier),
                reset_after = ?decision.reset_after,
                "Rate limit exceeded"
            );
        }

        decision
    }

    /// Remove windows that are empty and have been idle for their full width.
    ///
    /// Returns the number of windows removed.
    pub fn evict_idle(&self, now: Instant) -> usize {
        let mut evicted = 0;
        self.windows.retain(|_, window| {
            let idle = window.is_idle(now);
            if idle {
                evicted += 1;
            }
            !idle
        });
        evicted
    }

    /// Spawn a task that calls [`evict_idle`](Self::evict_idle) every `period`.
    ///
    /// The task runs until the returned handle is aborted.
    pub fn spawn_eviction(
        self: Arc<Self>,
        clock: Arc<dyn Clock>,
        period: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let evicted = self.evict_idle(clock.now());
                if evicted > 0 {
                    debug!(
                        evicted,
                        remaining = self.window_count(),
                        "Evicted idle client windows"
                    );
                }
            }
        })
    }

    /// Number of events currently recorded for a caller.
    ///
    /// Returns `None` if the caller has no window.
    pub fn recorded(&self, identifier: &str) -> Option<usize> {
        self.windows.get(identifier).map(|w| w.len())
    }

    /// Get the number of tracked callers.
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Clear all windows.
    pub fn clear(&self) {
        self.windows.clear();
    }
}
