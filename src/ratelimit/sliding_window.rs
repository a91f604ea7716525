use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::RateLimitStrategy;

/// Tracks the timestamp of every admitted request inside a trailing window.
///
/// Exact (no boundary-burst artifact like [`super::FixedWindowLimiter`]), at
/// the cost of O(limit) memory per limiter.
pub struct SlidingWindowLimiter {
    limit: usize,
    window: Duration,
    log: Mutex<VecDeque<Instant>>,
}

impl SlidingWindowLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            log: Mutex::new(VecDeque::with_capacity(limit)),
        }
    }

    fn evict_expired(&self, log: &mut VecDeque<Instant>, now: Instant) {
        while let Some(&oldest) = log.front() {
            if now.duration_since(oldest) >= self.window {
                log.pop_front();
            } else {
                break;
            }
        }
    }
}

impl RateLimitStrategy for SlidingWindowLimiter {
    fn try_acquire(&self) -> bool {
        let now = Instant::now();
        let mut log = self.log.lock();
        self.evict_expired(&mut log, now);
        if log.len() < self.limit {
            log.push_back(now);
            true
        } else {
            false
        }
    }

    fn available_permits(&self) -> usize {
        let now = Instant::now();
        let mut log = self.log.lock();
        self.evict_expired(&mut log, now);
        self.limit.saturating_sub(log.len())
    }

    fn reset(&self) {
        self.log.lock().clear();
    }
}
