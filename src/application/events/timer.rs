//! Self-rescheduling refresh timer for "last fetched" descriptions

use std::time::{Duration, Instant};

use crate::domain::services::refresh_interval_for;

/// Outcome of polling a [`RefreshTimer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Not due yet, or stopped
    Idle,
    /// Due; `rescheduled` is set when the period changed on this tick
    Fired { rescheduled: bool },
}

/// Recurring timer whose period depends on the age of the data it describes
#[derive(Debug, Clone)]
pub struct RefreshTimer {
    interval: Option<Duration>,
    next_due: Instant,
}

impl RefreshTimer {
    /// Starts a timer for data that is `age` old at `now`.
    ///
    /// Returns `None` when data of that age needs no timer at all.
    pub fn start(age: Duration, now: Instant) -> Option<Self> {
        let interval = refresh_interval_for(age)?;
        Some(Self {
            interval: Some(interval),
            next_due: now + interval,
        })
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.interval.map(|_| self.next_due)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.interval.is_some() && now >= self.next_due
    }

    /// Fires when due, re-deriving the period from the data's `age` now.
    ///
    /// An unknown age stops the timer.
    pub fn poll(&mut self, now: Instant, age: Option<Duration>) -> TimerTick {
        if !self.is_due(now) {
            return TimerTick::Idle;
        }

        let ideal = age.and_then(refresh_interval_for);
        let rescheduled = ideal != self.interval;
        self.interval = ideal;
        if let Some(interval) = ideal {
            self.next_due = now + interval;
        }
        TimerTick::Fired { rescheduled }
    }
}
