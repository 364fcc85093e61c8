//! Trailing-edge debouncing for bursty input such as search keystrokes.
//!
//! Time is passed in explicitly so callers decide whether it comes from a
//! clock or from a script, and tests never sleep.

use std::time::{Duration, Instant};

/// Default quiet period before a pushed value is released.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Holds the latest pushed value until no newer one arrives for `delay`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replaces any pending value and restarts the quiet period at `now`.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Releases the pending value once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = self
            .pending
            .as_ref()
            .is_some_and(|(_, pushed_at)| now.saturating_duration_since(*pushed_at) >= self.delay);
        if ready {
            self.flush()
        } else {
            None
        }
    }

    /// Releases the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Time left before the pending value is released; zero when nothing is pending.
    pub fn remaining(&self, now: Instant) -> Duration {
        match &self.pending {
            Some((_, pushed_at)) => self
                .delay
                .saturating_sub(now.saturating_duration_since(*pushed_at)),
            None => Duration::ZERO,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
