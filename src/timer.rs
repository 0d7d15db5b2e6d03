//! Countdown timer with explicit start / stop / reset.
//!
//! No threads and no callbacks: callers poll [`Timer::is_elapsed`] with
//! the current instant.  Elapsed time accumulates across stop/start
//! pairs; comparisons are made in whole milliseconds and a timer only
//! counts as elapsed once it has run strictly longer than its duration.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct Timer {
    duration: Duration,
    started_at: Instant,
    accumulated: Duration,
    running: bool,
}

impl Timer {
    /// A stopped timer with nothing accumulated.
    pub fn new(duration: Duration, now: Instant) -> Self {
        Self {
            duration,
            started_at: now,
            accumulated: Duration::ZERO,
            running: false,
        }
    }

    /// Convenience: a fresh timer already running from `now`.
    pub fn started(duration: Duration, now: Instant) -> Self {
        let mut t = Self::new(duration, now);
        t.start(now);
        t
    }

    pub fn start(&mut self, now: Instant) {
        self.started_at = now;
        self.running = true;
    }

    /// Bank the time since the last start.  No-op when already stopped.
    pub fn stop(&mut self, now: Instant) {
        if !self.running {
            return;
        }
        self.running = false;
        self.accumulated += now.saturating_duration_since(self.started_at);
    }

    /// Zero the accumulated time; a running timer keeps running from `now`.
    pub fn reset(&mut self, now: Instant) {
        self.started_at = now;
        self.accumulated = Duration::ZERO;
    }

    /// Total run time, truncated to whole milliseconds.
    pub fn elapsed(&self, now: Instant) -> Duration {
        let mut total = self.accumulated;
        if self.running {
            total += now.saturating_duration_since(self.started_at);
        }
        Duration::from_millis(total.as_millis() as u64)
    }

    /// Time left, saturating at zero.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.whole_ms_duration().saturating_sub(self.elapsed(now))
    }

    pub fn is_elapsed(&self, now: Instant) -> bool {
        self.elapsed(now) > self.whole_ms_duration()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    fn whole_ms_duration(&self) -> Duration {
        Duration::from_millis(self.duration.as_millis() as u64)
    }
}
