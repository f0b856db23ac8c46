//! Spawn Selection
//!
//! Round-robin choice among a team's spawn points. The cursor survives
//! between calls so back-to-back spawns land on different points whenever
//! the team has at least two.

use std::collections::BTreeMap;

use crate::core::vec3::Transform;
use crate::game::level::SpawnPoint;

/// Advance `cursor` to the next slot of `count` and return it.
///
/// `count` must be non-zero.
#[inline]
pub fn advance_cursor(cursor: &mut usize, count: usize) -> usize {
    *cursor = (*cursor + 1) % count;
    *cursor
}

/// Per-team round-robin spawn picker.
#[derive(Clone, Debug, Default)]
pub struct SpawnSelector {
    cursors: BTreeMap<usize, usize>,
}

impl SpawnSelector {
    /// Create a selector with all cursors at rest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next spawn for `team_index`, or `None` when the team has no spawn points.
    pub fn pick(&mut self, spawn_points: &[SpawnPoint], team_index: usize) -> Option<Transform> {
        let team_spawns: Vec<&SpawnPoint> = spawn_points
            .iter()
            .filter(|s| s.team_index == team_index)
            .collect();
        if team_spawns.is_empty() {
            return None;
        }

        let cursor = self.cursors.entry(team_index).or_insert(0);
        let index = advance_cursor(cursor, team_spawns.len());
        Some(team_spawns[index].transform)
    }

    /// Forget every cursor.
    pub fn reset(&mut self) {
        self.cursors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec3::Vec3;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn spawns(team: usize, count: usize) -> Vec<SpawnPoint> {
        (0..count)
            .map(|i| SpawnPoint {
                team_index: team,
                transform: Transform::at(Vec3::new(i as f32, 0.0, team as f32)),
            })
            .collect()
    }

    #[test]
    fn test_no_spawns_for_team() {
        let mut selector = SpawnSelector::new();
        assert!(selector.pick(&spawns(0, 3), 1).is_none());
        assert!(selector.pick(&[], 0).is_none());
    }

    #[test]
    fn test_consecutive_picks_differ() {
        let mut selector = SpawnSelector::new();
        let points = spawns(0, 2);

        let a = selector.pick(&points, 0).unwrap();
        let b = selector.pick(&points, 0).unwrap();
        let c = selector.pick(&points, 0).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_cursors_are_per_team() {
        let mut selector = SpawnSelector::new();
        let mut points = spawns(0, 3);
        points.extend(spawns(1, 3));

        let red = selector.pick(&points, 0).unwrap();
        let blue = selector.pick(&points, 1).unwrap();
        assert_eq!(red.position.z, 0.0);
        assert_eq!(blue.position.z, 1.0);
        assert_eq!(red.position.x, blue.position.x);
    }

    #[test]
    fn test_single_spawn_repeats() {
        let mut selector = SpawnSelector::new();
        let points = spawns(0, 1);
        assert_eq!(selector.pick(&points, 0), selector.pick(&points, 0));
    }

    proptest! {
        #[test]
        fn prop_round_robin_visits_every_point_once(count in 1usize..12, warmup in 0usize..20) {
            let mut selector = SpawnSelector::new();
            let points = spawns(0, count);
            for _ in 0..warmup {
                selector.pick(&points, 0);
            }

            let seen: BTreeSet<u32> = (0..count)
                .map(|_| selector.pick(&points, 0).unwrap().position.x as u32)
                .collect();
            prop_assert_eq!(seen.len(), count);
        }
    }
}
