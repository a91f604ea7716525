use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::RateLimitStrategy;

struct State {
    level: f64,
    last_leak: Instant,
}

/// Requests fill a bucket that leaks at a constant `leak_rate` per second;
/// admission is granted as long as the bucket has not reached `capacity`.
/// Unlike [`super::TokenBucketLimiter`], output is smoothed to a strictly
/// constant rate rather than allowing a burst to drain the whole capacity
/// at once.
pub struct LeakyBucketLimiter {
    capacity: f64,
    leak_rate: f64,
    state: Mutex<State>,
}

impl LeakyBucketLimiter {
    pub fn new(capacity: usize, leak_rate_per_sec: f64) -> Self {
        Self {
            capacity: capacity as f64,
            leak_rate: leak_rate_per_sec,
            state: Mutex::new(State {
                level: 0.0,
                last_leak: Instant::now(),
            }),
        }
    }

    fn leak(&self, state: &mut State, now: Instant) {
        let elapsed = now.duration_since(state.last_leak).as_secs_f64();
        state.level = (state.level - elapsed * self.leak_rate).max(0.0);
        state.last_leak = now;
    }
}

impl RateLimitStrategy for LeakyBucketLimiter {
    fn try_acquire(&self) -> bool {
        let mut state = self.state.lock();
        self.leak(&mut state, Instant::now());
        if state.level < self.capacity {
            state.level += 1.0;
            true
        } else {
            false
        }
    }

    fn available_permits(&self) -> usize {
        let mut state = self.state.lock();
        self.leak(&mut state, Instant::now());
        (self.capacity - state.level).floor().max(0.0) as usize
    }

    fn reset(&self) {
        let mut state = self.state.lock();
        state.level = 0.0;
        state.last_leak = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_up_to_capacity_then_denies() {
        let limiter = LeakyBucketLimiter::new(2, 1.0);
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn leaking_over_time_frees_capacity() {
        let limiter = LeakyBucketLimiter::new(1, 100.0);
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
        std::thread::sleep(Duration::from_millis(20));
        assert!(limiter.try_acquire());
    }
}
