//! Recurring migration trigger polled by the host event loop.
//!
//! The schedule owns no thread: the host calls `poll` from its own loop and
//! runs a migration whenever it returns `true`, keeping every command on one
//! logical thread.

use std::time::{Duration, Instant};

const MIN_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct MigrationSchedule {
    interval: Duration,
    next_due: Instant,
    stopped: bool,
}

impl MigrationSchedule {
    /// First run is due one `interval` after `now`; intervals below one second
    /// are raised to one second.
    pub fn new(interval: Duration, now: Instant) -> Self {
        let interval = interval.max(MIN_INTERVAL);
        Self {
            interval,
            next_due: now + interval,
            stopped: false,
        }
    }

    /// Returns `true` when a migration is due and re-arms for `now + interval`.
    ///
    /// Missed periods collapse into a single run.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.stopped || now < self.next_due {
            return false;
        }
        self.next_due = now + self.interval;
        true
    }

    /// Time left until the next run, `None` once stopped.
    ///
    /// Lets the host sleep until the next poll instead of ticking.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        if self.stopped {
            return None;
        }
        Some(self.next_due.saturating_duration_since(now))
    }

    /// Cancels future runs; used on shutdown.
    pub fn stop(&mut self) {
        self.stopped = true;
    }
}
