//! Reliability building blocks shared across composites
//!
//! - [`RetryPolicy`] — attempt count, backoff shape, non-retryable kinds
//! - [`backoff`] — standalone [`BackoffStrategy`](backoff::BackoffStrategy) implementations
//! - [`TimeoutPolicy`] — a bare wall-clock deadline
//! - [`Sleeper`] — injectable delay, for deterministic retry/backoff tests

pub mod backoff;
mod retry;
mod sleeper;
mod timeout;

pub use retry::RetryPolicy;
pub use sleeper::{NoopSleeper, RecordingSleeper, Sleeper, SystemSleeper};
pub use timeout::TimeoutPolicy;
