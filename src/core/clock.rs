//! Simulation Clock
//!
//! Tick-based time shared by the orchestrator and the game modes.
//! The clock itself is external: callers pass the current `GameTime` into
//! every update, nothing here reads wall time.

use serde::{Deserialize, Serialize};

/// Simulation step counter.
pub type Tick = u64;

/// Current simulation time as seen by one update.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameTime {
    /// Current tick.
    pub tick: Tick,
    /// Duration of one tick in seconds.
    pub tick_interval: f32,
}

impl GameTime {
    /// Create a new time sample.
    pub const fn new(tick: Tick, tick_interval: f32) -> Self {
        Self { tick, tick_interval }
    }

    /// Seconds elapsed since `earlier`. Zero if `earlier` lies in the future.
    #[inline]
    pub fn seconds_since(&self, earlier: Tick) -> f64 {
        self.tick.saturating_sub(earlier) as f64 * self.tick_interval as f64
    }

    /// Number of whole ticks covering `seconds`, rounded to the nearest tick.
    pub fn ticks_for(&self, seconds: f32) -> Tick {
        if self.tick_interval <= 0.0 || seconds <= 0.0 {
            return 0;
        }
        (seconds as f64 / self.tick_interval as f64).round() as Tick
    }

    /// The same clock advanced by one tick.
    #[inline]
    pub fn next(self) -> Self {
        Self {
            tick: self.tick + 1,
            ..self
        }
    }
}

impl Default for GameTime {
    fn default() -> Self {
        Self::new(0, 1.0 / 60.0)
    }
}

/// Countdown over the simulation clock.
///
/// Holds only a start tick and a duration; `remaining_seconds` is derived.
/// Re-arming overwrites both, so there is never a stale countdown to cancel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    start: Tick,
    duration_seconds: f32,
}

impl Timer {
    /// Arm a timer starting at `now`.
    pub fn started(now: GameTime, duration_seconds: f32) -> Self {
        Self {
            start: now.tick,
            duration_seconds,
        }
    }

    /// Tick the timer was armed at.
    pub fn start(&self) -> Tick {
        self.start
    }

    /// Configured duration in seconds.
    pub fn duration_seconds(&self) -> f32 {
        self.duration_seconds
    }

    /// `max(0, floor(start + duration - now))` in whole seconds.
    pub fn remaining_seconds(&self, now: GameTime) -> i32 {
        let remaining = self.duration_seconds as f64 - now.seconds_since(self.start);
        remaining.floor().max(0.0) as i32
    }

    /// True once the countdown has reached zero.
    #[inline]
    pub fn is_expired(&self, now: GameTime) -> bool {
        self.remaining_seconds(now) == 0
    }
}
