//! Injectable sleep, so retry/backoff delays are testable without a real clock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

/// Abstraction over "wait this long", so tests can skip or record delays
/// instead of actually sleeping through a five-attempt exponential backoff.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// The default sleeper: delegates to `tokio::time::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSleeper;

#[async_trait]
impl Sleeper for SystemSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// A sleeper that never actually waits; counts how many times it was asked to.
#[derive(Debug, Default)]
pub struct NoopSleeper {
    calls: AtomicUsize,
}

impl NoopSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Sleeper for NoopSleeper {
    async fn sleep(&self, _duration: Duration) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// A sleeper that never waits but records every requested duration, in order.
/// Used by retry/backoff tests that assert on the exact delay sequence.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    requested: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requested(&self) -> Vec<Duration> {
        self.requested.lock().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.requested.lock().push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_sleeper_counts_calls_without_waiting() {
        let sleeper = NoopSleeper::new();
        sleeper.sleep(Duration::from_secs(60)).await;
        sleeper.sleep(Duration::from_secs(60)).await;
        assert_eq!(sleeper.call_count(), 2);
    }

    #[tokio::test]
    async fn recording_sleeper_preserves_order() {
        let sleeper = RecordingSleeper::new();
        sleeper.sleep(Duration::from_millis(1)).await;
        sleeper.sleep(Duration::from_millis(2)).await;
        assert_eq!(
            sleeper.requested(),
            vec![Duration::from_millis(1), Duration::from_millis(2)]
        );
    }
}
