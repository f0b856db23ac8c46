//! Objective Contest
//!
//! Per-tick capture progress of the active assault point.
//!
//! Progress scales with the square root of the occupant count: two attackers
//! capture about 1.41x as fast as one, four capture exactly twice as fast.
//! `capture_time_seconds` is the time one lone attacker needs from zero.

use crate::game::level::{CapturePoint, CaptureStatus};

/// Live occupants of the capture zone, by side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContestTally {
    /// Attackers inside the zone
    pub attacking: u32,
    /// Defenders inside the zone
    pub defending: u32,
}

impl ContestTally {
    /// Create a tally.
    pub const fn new(attacking: u32, defending: u32) -> Self {
        Self { attacking, defending }
    }
}

/// Progress made in one tick by `occupants` uncontested players.
pub fn capture_rate(occupants: u32, tick_interval: f32, capture_time_seconds: f32) -> f32 {
    if capture_time_seconds <= 0.0 {
        return 1.0;
    }
    tick_interval * (occupants as f32).sqrt() / capture_time_seconds
}

/// Advance `point` by one tick and return its new status.
///
/// Progress only ever moves toward 0 or 1 and stays within [0, 1].
pub fn advance(point: &mut CapturePoint, tally: ContestTally, tick_interval: f32) -> CaptureStatus {
    let ContestTally { attacking, defending } = tally;

    point.status = match (attacking > 0, defending > 0) {
        (true, true) => CaptureStatus::Contested,
        (true, false) => {
            let rate = capture_rate(attacking, tick_interval, point.capture_time_seconds);
            point.captured = (point.captured + rate).clamp(0.0, 1.0);
            if point.captured == 1.0 {
                CaptureStatus::Completed
            } else {
                CaptureStatus::Capturing
            }
        }
        (false, true) => {
            let rate = capture_rate(defending, tick_interval, point.capture_time_seconds);
            point.captured = (point.captured - rate).clamp(0.0, 1.0);
            CaptureStatus::Healing
        }
        (false, false) => CaptureStatus::Active,
    };

    #[cfg(feature = "debug-tracing")]
    tracing::debug!(
        point = %point.name,
        attacking,
        defending,
        captured = point.captured,
        status = ?point.status,
        "contest tick"
    );

    point.status
}
