//! Trailing-edge debouncer polled with explicit instants

use std::time::{Duration, Instant};

/// Holds the latest pushed value until no new value arrived for `window`
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<T>,
    last_push: Option<Instant>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            last_push: None,
        }
    }

    /// Replaces the pending value and restarts the window
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(value);
        self.last_push = Some(now);
    }

    /// Takes the pending value once the window has elapsed since the last push
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let last = self.last_push?;
        if now.saturating_duration_since(last) < self.window {
            return None;
        }
        self.last_push = None;
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
        self.last_push = None;
    }
}
