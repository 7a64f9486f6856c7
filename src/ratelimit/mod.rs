//! Rate limiting logic and state management.

mod client;
mod clock;
mod decision;
mod limiter;
mod policy;
mod window;

pub use client::ClientId;
pub use clock::{Clock, MockClock, SystemClock};
pub use decision::Decision;
pub use limiter::RateLimiter;
pub use policy::RateLimitPolicy;
pub use window::ClientWindow;
