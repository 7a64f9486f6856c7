//! Shared application state handed to every handler.

use std::sync::Arc;
use std::time::Duration;

use super::auth::AuthGate;
use crate::config::BiblioConfig;
use crate::error::Result;
use crate::ratelimit::{Clock, RateLimitPolicy, RateLimiter, SystemClock};
use crate::store::{BookStore, MessageStore};

#[derive(Clone)]
pub struct AppState {
    pub limiter: Arc<RateLimiter>,
    pub policy: RateLimitPolicy,
    pub auth: Arc<AuthGate>,
    pub clock: Arc<dyn Clock>,
    pub books: Arc<BookStore>,
    pub messages: Arc<MessageStore>,
    pub stream_poll_interval: Duration,
}

impl AppState {
    /// Build the state for a freshly started server: seeded book catalogue,
    /// empty limiter registry and the system clock.
    pub fn from_config(config: &BiblioConfig) -> Result<Self> {
        Ok(Self {
            limiter: Arc::new(RateLimiter::new()),
            policy: config.rate_limiting.policy()?,
            auth: Arc::new(AuthGate::new(&config.auth.token)),
            clock: Arc::new(SystemClock::new()),
            books: Arc::new(BookStore::seeded()),
            messages: Arc::new(MessageStore::new()),
            stream_poll_interval: config.stream_poll_interval(),
        })
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
