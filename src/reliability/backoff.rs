//! Pluggable backoff strategies, independent of [`RetryPolicy`](super::RetryPolicy)
//!
//! `RetryPolicy` bakes exponential backoff in directly (matching the
//! teacher's original shape); `BackoffStrategy` exists alongside it for
//! composites that want to pick a strategy without carrying the rest of
//! `RetryPolicy`'s fields (e.g. a bare `Repeat` between-iteration delay).

use std::time::Duration;

use rand::Rng;

/// A pure function from attempt number (1-based) to delay before that attempt.
pub trait BackoffStrategy: Send + Sync {
    fn delay_for(&self, attempt: u32) -> Duration;
}

/// Always the same delay, after the first attempt.
pub struct ConstantBackoff {
    pub interval: Duration,
}

impl BackoffStrategy for ConstantBackoff {
    fn delay_for(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            Duration::ZERO
        } else {
            self.interval
        }
    }
}

/// Delay grows linearly: `interval * (attempt - 1)`.
pub struct LinearBackoff {
    pub interval: Duration,
    pub max_interval: Duration,
}

impl BackoffStrategy for LinearBackoff {
    fn delay_for(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let scaled = self.interval * (attempt - 1);
        scaled.min(self.max_interval)
    }
}

/// Delay doubles (or scales by `coefficient`) each retry, capped at `max_interval`.
pub struct ExponentialBackoff {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub coefficient: f64,
}

impl BackoffStrategy for ExponentialBackoff {
    fn delay_for(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let retry_num = attempt - 1;
        let base = self.initial_interval.as_secs_f64() * self.coefficient.powi(retry_num as i32 - 1);
        Duration::from_secs_f64(base.min(self.max_interval.as_secs_f64()))
    }
}

/// Wraps another strategy and adds +/-`factor` jitter, `factor` in `[0.0, 1.0]`.
pub struct JitteredBackoff<B: BackoffStrategy> {
    pub inner: B,
    pub factor: f64,
}

impl<B: BackoffStrategy> BackoffStrategy for JitteredBackoff<B> {
    fn delay_for(&self, attempt: u32) -> Duration {
        let base = self.inner.delay_for(attempt);
        if self.factor <= 0.0 || base.is_zero() {
            return base;
        }
        let base_secs = base.as_secs_f64();
        let range = base_secs * self.factor;
        let offset = rand::thread_rng().gen_range(-range..range);
        Duration::from_secs_f64((base_secs + offset).max(0.0))
    }
}
