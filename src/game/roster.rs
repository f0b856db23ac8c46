//! Team Roster
//!
//! Ordered team list and size-balanced team assignment.

use serde::{Serialize, Deserialize};

use crate::game::state::{PlayerId, PlayerState};

/// A team in the current match mode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Display name
    pub name: String,
    /// Team score; `Team::NO_SCORE` when the mode does not keep one
    pub score: i32,
}

impl Team {
    /// Neutral score written on restart; presentation hides it.
    pub const NO_SCORE: i32 = -1;
}

/// Teams of the active mode, in creation order.
///
/// Created once per mode initialization; never shrinks during a round.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TeamRoster {
    teams: Vec<Team>,
}

impl TeamRoster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a team and return its index.
    pub fn create_team(&mut self, name: impl Into<String>) -> usize {
        self.teams.push(Team {
            name: name.into(),
            score: 0,
        });
        self.teams.len() - 1
    }

    /// All teams.
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Team by index.
    pub fn team(&self, index: usize) -> Option<&Team> {
        self.teams.get(index)
    }

    /// Team by index, mutably.
    pub fn team_mut(&mut self, index: usize) -> Option<&mut Team> {
        self.teams.get_mut(index)
    }

    /// Team name, or an empty string for unknown indices.
    pub fn team_name(&self, index: usize) -> &str {
        self.teams.get(index).map(|t| t.name.as_str()).unwrap_or("")
    }

    /// Number of teams.
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    /// No teams created yet.
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Drop every team (mode change).
    pub fn clear(&mut self) {
        self.teams.clear();
    }

    /// Overwrite every team's score.
    pub fn reset_scores(&mut self, score: i32) {
        for team in &mut self.teams {
            team.score = score;
        }
    }

    /// Team with the fewest members among `players`, ignoring `player` itself.
    ///
    /// Ties go to the lowest index: a later team wins only with a strictly
    /// smaller count. Returns `None` when there are no teams.
    pub fn balanced_team<'a>(
        &self,
        player: PlayerId,
        players: impl IntoIterator<Item = &'a PlayerState>,
    ) -> Option<usize> {
        if self.teams.is_empty() {
            return None;
        }

        let mut counts = vec![0usize; self.teams.len()];
        for other in players {
            if other.id == player {
                continue;
            }
            if let Some(count) = other.team_index.and_then(|t| counts.get_mut(t)) {
                *count += 1;
            }
        }

        let mut best = 0;
        for (index, count) in counts.iter().enumerate().skip(1) {
            if *count < counts[best] {
                best = index;
            }
        }
        Some(best)
    }
}
