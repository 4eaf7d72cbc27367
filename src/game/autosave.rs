//! Auto-save timer
//!
//! A scheduled task with an explicit start/stop lifecycle. The game loop
//! feeds it frame deltas; it reports when a save is due.

use std::time::Duration;

/// Default interval between auto-saves
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Periodic auto-save schedule
#[derive(Debug, Clone)]
pub struct AutoSave {
    /// Time between saves
    interval: Duration,
    /// Time since the last save (or since start)
    since_last: Duration,
    running: bool,
}

impl AutoSave {
    /// Create a stopped auto-save timer
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            since_last: Duration::ZERO,
            running: false,
        }
    }

    /// Start (or restart) the schedule from zero
    pub fn start(&mut self) {
        self.since_last = Duration::ZERO;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.since_last = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance time and return true if a save is due.
    ///
    /// Leftover time carries into the next interval, so saves stay on
    /// schedule whatever the frame length. A frame spanning several
    /// intervals fires once now and again on the following updates.
    pub fn update(&mut self, delta: Duration) -> bool {
        if !self.running || self.interval.is_zero() {
            return false;
        }

        self.since_last += delta;
        if self.since_last >= self.interval {
            self.since_last -= self.interval;
            true
        } else {
            false
        }
    }
}

impl Default for AutoSave {
    fn default() -> Self {
        Self::new(AUTOSAVE_INTERVAL)
    }
}
