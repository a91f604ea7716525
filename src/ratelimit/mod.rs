//! Rate limiting strategies shared by [`crate::workflow::rate_limited::RateLimited`]
//!
//! Four interchangeable algorithms, all behind one [`RateLimitStrategy`]
//! trait: fixed window, sliding window (log-based), token bucket, and leaky
//! bucket. The window algorithms are grounded on the teacher pack's
//! `tower-resilience-ratelimiter` crate, which has no direct counterpart in
//! `everruns-durable`.

mod fixed_window;
mod leaky_bucket;
mod sliding_window;
mod token_bucket;

pub use fixed_window::FixedWindowLimiter;
pub use leaky_bucket::LeakyBucketLimiter;
pub use sliding_window::SlidingWindowLimiter;
pub use token_bucket::TokenBucketLimiter;

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use crate::error::EngineError;

/// A pluggable admission-control strategy.
///
/// Every method is non-blocking with respect to the strategy's internal
/// lock: `acquire` polls and sleeps between attempts rather than holding
/// the lock across a wait, so strategies stay cheap to share across many
/// concurrent callers via an `Arc`.
#[async_trait]
pub trait RateLimitStrategy: Send + Sync {
    /// Block until a permit is available.
    async fn acquire(&self) -> Result<(), EngineError> {
        loop {
            if self.try_acquire() {
                return Ok(());
            }
            sleep(self.poll_interval()).await;
        }
    }

    /// Non-blocking: acquire a permit immediately if one is available.
    fn try_acquire(&self) -> bool;

    /// Block until a permit is available or `timeout` elapses, whichever
    /// comes first. Returns [`EngineError::Timeout`] on expiry.
    async fn try_acquire_timeout(&self, timeout: Duration) -> Result<(), EngineError> {
        match tokio::time::timeout(timeout, self.acquire()).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::timeout("rate limiter permit")),
        }
    }

    /// Permits currently available without waiting.
    fn available_permits(&self) -> usize;

    /// Reset the strategy to its initial, fully-replenished state.
    fn reset(&self);

    /// How long `acquire` sleeps between polling attempts. 10ms by default;
    /// override for tests or coarser-grained limiters.
    fn poll_interval(&self) -> Duration {
        Duration::from_millis(10)
    }
}
