//! Fixed-duration countdown sampled once per frame.
//!
//! The countdown stores only its start instant; every sample recomputes
//! `remaining = max(0, duration − (now − start))` from a monotonic clock, so a
//! slow frame can never make the clock drift.  Expiry is reported exactly once,
//! after which the countdown stops producing ticks.

/// A single sample of the countdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountdownTick {
    /// Milliseconds left; never negative.
    pub remaining_ms: f64,
    /// `remaining_ms` in seconds rounded to one decimal place.
    pub display_secs: f64,
    /// `true` only on the first sample that observed `remaining_ms == 0`.
    pub expired: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    duration_ms: f64,
    started_at_ms: Option<f64>,
    expiry_signalled: bool,
}

impl Countdown {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms: duration_ms.max(0.0),
            started_at_ms: None,
            expiry_signalled: false,
        }
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Begin counting down from `now_ms`.  Restarting re-arms expiry.
    pub fn start(&mut self, now_ms: f64) {
        self.started_at_ms = Some(now_ms);
        self.expiry_signalled = false;
    }

    /// Stop scheduling ticks; later samples return `None`.
    pub fn cancel(&mut self) {
        self.started_at_ms = None;
    }

    /// `true` while the countdown will still produce ticks.
    pub fn is_running(&self) -> bool {
        self.started_at_ms.is_some() && !self.expiry_signalled
    }

    /// Remaining time at `now_ms` without advancing expiry bookkeeping.
    pub fn remaining_at(&self, now_ms: f64) -> Option<f64> {
        let start = self.started_at_ms?;
        let elapsed = (now_ms - start).max(0.0);
        Some((self.duration_ms - elapsed).max(0.0))
    }

    /// Sample the countdown.
    ///
    /// Returns `None` when the countdown was never started, was cancelled, or
    /// has already reported expiry.
    pub fn sample(&mut self, now_ms: f64) -> Option<CountdownTick> {
        if !self.is_running() {
            return None;
        }
        let remaining_ms = self.remaining_at(now_ms)?;
        let expired = remaining_ms <= 0.0;
        if expired {
            self.expiry_signalled = true;
        }
        Some(CountdownTick {
            remaining_ms,
            display_secs: display_seconds(remaining_ms),
            expired,
        })
    }
}

/// Milliseconds → seconds rounded to one decimal place (`29_950 → 30.0`).
pub fn display_seconds(remaining_ms: f64) -> f64 {
    (remaining_ms / 100.0).round() / 10.0
}
