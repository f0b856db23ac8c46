//! Level Content
//!
//! Static geometry authored with the map: generic spawn points, team base
//! volumes and the ordered capture points used by assault. The match engine
//! only writes capture progress and status; everything else is read-only.

use serde::{Serialize, Deserialize};

use crate::core::vec3::{Transform, Vec3};
use crate::core::volume::{Aabb, Cylinder};

/// Generic per-team spawn location.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Owning team
    pub team_index: usize,
    /// Spawn transform
    pub transform: Transform,
}

/// Team base volume. Players inside their own base may switch character.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamBase {
    /// Owning team
    pub team_index: usize,
    /// Base bounds
    pub bounds: Aabb,
}

/// Capture point lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptureStatus {
    /// Not yet reachable
    #[default]
    Locked,
    /// Current objective, nobody inside
    Active,
    /// Attackers and defenders both inside
    Contested,
    /// Only attackers inside
    Capturing,
    /// Only defenders inside
    Healing,
    /// Fully captured
    Completed,
}

/// A contestable zone in assault mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapturePoint {
    /// Display name used in announcements
    pub name: String,
    /// Fixed capture order (ascending)
    pub capture_index: i32,
    /// Current status
    pub status: CaptureStatus,
    /// Capture progress in [0, 1]
    pub captured: f32,
    /// Seconds a single attacker needs to capture from zero
    pub capture_time_seconds: f32,
    /// Capture zone
    pub zone: Cylinder,
    /// Spawns used by whichever team holds this point as its base
    pub spawns: Vec<Transform>,
}

impl CapturePoint {
    /// Create a locked, uncaptured point.
    pub fn new(name: impl Into<String>, capture_index: i32, capture_time_seconds: f32, zone: Cylinder) -> Self {
        Self {
            name: name.into(),
            capture_index,
            status: CaptureStatus::Locked,
            captured: 0.0,
            capture_time_seconds,
            zone,
            spawns: Vec::new(),
        }
    }

    /// Attach base spawns.
    pub fn with_spawns(mut self, spawns: Vec<Transform>) -> Self {
        self.spawns = spawns;
        self
    }

    /// Return to the initial locked, uncaptured state.
    pub fn reset(&mut self) {
        self.status = CaptureStatus::Locked;
        self.captured = 0.0;
    }
}

/// All level geometry the match engine reads.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelContent {
    /// Generic team spawns
    pub spawn_points: Vec<SpawnPoint>,
    /// Team base volumes
    pub team_bases: Vec<TeamBase>,
    /// Assault capture points (any order; sorted by `capture_index` on use)
    pub capture_points: Vec<CapturePoint>,
}

impl LevelContent {
    /// Whether `position` lies in a base owned by `team_index`.
    pub fn in_team_base(&self, team_index: usize, position: Vec3) -> bool {
        self.team_bases
            .iter()
            .any(|base| base.team_index == team_index && base.bounds.contains(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_base_ownership() {
        let level = LevelContent {
            team_bases: vec![
                TeamBase { team_index: 0, bounds: Aabb::new(Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0)) },
                TeamBase { team_index: 1, bounds: Aabb::new(Vec3::new(50.0, 0.0, 0.0), Vec3::new(5.0, 5.0, 5.0)) },
            ],
            ..Default::default()
        };

        assert!(level.in_team_base(0, Vec3::new(1.0, 0.0, 1.0)));
        assert!(!level.in_team_base(1, Vec3::new(1.0, 0.0, 1.0)));
        assert!(level.in_team_base(1, Vec3::new(52.0, 0.0, 0.0)));
        assert!(!level.in_team_base(2, Vec3::new(1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_capture_point_reset() {
        let mut point = CapturePoint::new("A", 0, 10.0, Cylinder::new(Vec3::ZERO, 2.0, 4.0));
        point.status = CaptureStatus::Completed;
        point.captured = 1.0;

        point.reset();
        assert_eq!(point.status, CaptureStatus::Locked);
        assert_eq!(point.captured, 0.0);
    }

    #[test]
    fn test_new_point_starts_locked() {
        let point = CapturePoint::new("A", 0, 10.0, Cylinder::new(Vec3::ZERO, 2.0, 4.0));
        assert_eq!(point.status, CaptureStatus::default());
        assert_eq!(CaptureStatus::default(), CaptureStatus::Locked);
    }
}
