//! Cutting-pass progress state machine and its fixed-interval ticker.
//!
//! Nothing in here owns a timer. The page calls `Ticker::advance` (or
//! `CuttingProgress::tick` directly) on its own schedule, and `reset`
//! invalidates whatever that schedule still has in flight.

use serde::Serialize;
use std::fmt;

pub const PROGRESS_MAX: u32 = 100;
pub const DEFAULT_PROGRESS_STEP: u32 = 2;
pub const DEFAULT_TICK_INTERVAL_MS: f64 = 50.0;
pub const DEFAULT_SECONDS_PER_PERCENT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CuttingState {
    Ready,
    Running,
    Complete,
}

impl CuttingState {
    pub fn label(self) -> &'static str {
        match self {
            CuttingState::Ready => "Ready",
            CuttingState::Running => "Cutting in progress",
            CuttingState::Complete => "Complete",
        }
    }
}

impl fmt::Display for CuttingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Progress of one simulated cutting pass, 0..=100.
#[derive(Debug, Clone)]
pub struct CuttingProgress {
    progress: u32,
    animating: bool,
    step: u32,
    seconds_per_percent: f64,
    // Bumped on every start/reset; ticks tagged with an older value are stale.
    session: u32,
}

impl Default for CuttingProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl CuttingProgress {
    pub fn new() -> Self {
        Self::with_rate(DEFAULT_PROGRESS_STEP, DEFAULT_SECONDS_PER_PERCENT)
    }

    /// `step` is clamped to 1..=100 so a pass always terminates.
    pub fn with_rate(step: u32, seconds_per_percent: f64) -> Self {
        Self {
            progress: 0,
            animating: false,
            step: step.clamp(1, PROGRESS_MAX),
            seconds_per_percent,
            session: 0,
        }
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn animating(&self) -> bool {
        self.animating
    }

    pub fn session(&self) -> u32 {
        self.session
    }

    pub fn state(&self) -> CuttingState {
        if self.animating {
            CuttingState::Running
        } else if self.progress >= PROGRESS_MAX {
            CuttingState::Complete
        } else {
            CuttingState::Ready
        }
    }

    /// Begin a pass. Returns false (and changes nothing) if one is running.
    pub fn start(&mut self) -> bool {
        if self.animating {
            return false;
        }
        self.progress = 0;
        self.animating = true;
        self.session = self.session.wrapping_add(1);
        true
    }

    /// Advance one fixed step. Returns true if progress changed.
    pub fn tick(&mut self) -> bool {
        if !self.animating {
            return false;
        }
        self.progress += self.step;
        if self.progress >= PROGRESS_MAX {
            self.progress = PROGRESS_MAX;
            self.animating = false;
        }
        true
    }

    /// `tick` for a timer created during `session`; ignored once that run is over.
    pub fn tick_session(&mut self, session: u32) -> bool {
        if session != self.session {
            return false;
        }
        self.tick()
    }

    pub fn reset(&mut self) {
        self.progress = 0;
        self.animating = false;
        self.session = self.session.wrapping_add(1);
    }

    /// Whole seconds left at the nominal cutting rate, rounded half up.
    pub fn estimated_remaining_seconds(&self) -> u32 {
        let left = (PROGRESS_MAX - self.progress) as f64 * self.seconds_per_percent;
        left.round().max(0.0) as u32
    }
}

/// Turns elapsed wall-clock milliseconds into whole fixed-interval ticks.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval_ms: f64,
    pending_ms: f64,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL_MS)
    }
}

impl Ticker {
    /// `interval_ms` must be positive and finite; anything else falls back to the default.
    pub fn new(interval_ms: f64) -> Self {
        let interval_ms = if interval_ms.is_finite() && interval_ms > 0.0 {
            interval_ms
        } else {
            DEFAULT_TICK_INTERVAL_MS
        };
        Self { interval_ms, pending_ms: 0.0 }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Add `dt_ms` of elapsed time and return how many ticks are now due.
    pub fn advance(&mut self, dt_ms: f64) -> u32 {
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return 0;
        }
        self.pending_ms += dt_ms;
        let due = (self.pending_ms / self.interval_ms).floor();
        self.pending_ms -= due * self.interval_ms;
        due as u32
    }

    /// Drop any partially elapsed interval.
    pub fn cancel(&mut self) {
        self.pending_ms = 0.0;
    }
}
