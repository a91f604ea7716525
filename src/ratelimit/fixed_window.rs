use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::RateLimitStrategy;

struct State {
    available: usize,
    window_start: Instant,
}

/// Resets the full permit count at fixed interval boundaries.
///
/// Simple and cheap, but allows a burst of up to `2 * limit` permits across
/// a window boundary (a client exhausting the tail of one window and the
/// head of the next in quick succession).
pub struct FixedWindowLimiter {
    limit: usize,
    window: Duration,
    state: Mutex<State>,
}

impl FixedWindowLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            state: Mutex::new(State {
                available: limit,
                window_start: Instant::now(),
            }),
        }
    }

    fn refresh_if_elapsed(&self, state: &mut State, now: Instant) {
        if now.duration_since(state.window_start) >= self.window {
            state.available = self.limit;
            state.window_start = now;
        }
    }
}

impl RateLimitStrategy for FixedWindowLimiter {
    fn try_acquire(&self) -> bool {
        let mut state = self.state.lock();
        self.refresh_if_elapsed(&mut state, Instant::now());
        if state.available > 0 {
            state.available -= 1;
            true
        } else {
            false
        }
    }

    fn available_permits(&self) -> usize {
        let mut state = self.state.lock();
        self.refresh_if_elapsed(&mut state, Instant::now());
        state.available
    }

    fn reset(&self) {
        let mut state = self.state.lock();
        state.available = self.limit;
        state.window_start = Instant::now();
    }
}
