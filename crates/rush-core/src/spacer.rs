//! Request pacing for rate-limited providers.
//!
//! Nominatim allows one request per second per client. A [`RequestSpacer`]
//! wraps a GCRA limiter with a burst of one, so calls routed through the same
//! spacer (or any clone of it) start at least `interval` apart.

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

#[derive(Clone)]
pub struct RequestSpacer {
    interval: Duration,
    limiter: Option<Arc<DirectLimiter>>,
}

impl RequestSpacer {
    /// A zero interval yields a spacer that never waits.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            limiter: Quota::with_period(interval).map(|quota| Arc::new(RateLimiter::direct(quota))),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for the next slot and claim it. Returns how long the caller waited.
    pub async fn acquire(&self) -> Duration {
        let Some(limiter) = &self.limiter else {
            return Duration::ZERO;
        };
        let started = Instant::now();
        limiter.until_ready().await;
        started.elapsed()
    }
}

impl fmt::Debug for RequestSpacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSpacer")
            .field("interval", &self.interval)
            .finish()
    }
}
