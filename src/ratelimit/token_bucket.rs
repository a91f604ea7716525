use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::RateLimitStrategy;

struct State {
    tokens: f64,
    last_refill: Instant,
}

/// Tokens accrue continuously at `refill_rate` per second, up to `capacity`;
/// each acquire spends one. Unlike the window limiters, unused capacity
/// carries forward, allowing short bursts up to the full bucket size.
pub struct TokenBucketLimiter {
    capacity: f64,
    refill_rate: f64,
    state: Mutex<State>,
}

impl TokenBucketLimiter {
    pub fn new(capacity: usize, refill_rate_per_sec: f64) -> Self {
        Self {
            capacity: capacity as f64,
            refill_rate: refill_rate_per_sec,
            state: Mutex::new(State {
                tokens: capacity as f64,
                last_refill: Instant::now(),
            }),
        }
    }

    fn refill(&self, state: &mut State, now: Instant) {
        let elapsed = now.duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.refill_rate).min(self.capacity);
        state.last_refill = now;
    }
}

impl RateLimitStrategy for TokenBucketLimiter {
    fn try_acquire(&self) -> bool {
        let mut state = self.state.lock();
        self.refill(&mut state, Instant::now());
        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn available_permits(&self) -> usize {
        let mut state = self.state.lock();
        self.refill(&mut state, Instant::now());
        state.tokens.floor() as usize
    }

    fn reset(&self) {
        let mut state = self.state.lock();
        state.tokens = self.capacity;
        state.last_refill = Instant::now();
    }
}
