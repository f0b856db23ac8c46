//! Match Events
//!
//! Everything the match engine announces during a tick, for presentation
//! and for tests. Announcement text goes to the broadcast channel as-is.

use serde::{Serialize, Deserialize};

use crate::core::clock::Tick;
use crate::game::state::PlayerId;

/// Event payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MatchEventData {
    /// Free text for the announcement channel
    Announcement {
        /// Message shown to every player
        text: String,
    },

    /// A mode's phase machine moved
    PhaseChanged {
        /// Phase left
        old_phase: String,
        /// Phase entered
        new_phase: String,
    },

    /// Active mode was swapped
    ModeChanged {
        /// New mode name
        mode: String,
    },

    /// A player was placed on a team
    TeamAssigned {
        /// Player
        player_id: PlayerId,
        /// Team index
        team_index: usize,
    },

    /// A controlled entity died
    PlayerKilled {
        /// Victim
        victim_id: PlayerId,
        /// Killer, `None` for suicides and environment deaths
        killer_id: Option<PlayerId>,
    },

    /// An assault capture point completed
    PointCaptured {
        /// Capture order index of the point
        capture_index: i32,
        /// Points completed so far
        captured: usize,
        /// Total points in the level
        total: usize,
    },

    /// A round ended
    MatchEnded {
        /// Winning team, `None` on a tie
        winning_team: Option<usize>,
    },
}

/// A match event with timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    /// Tick when event occurred
    pub tick: Tick,

    /// Event data
    pub data: MatchEventData,
}

impl MatchEvent {
    /// Create a new event.
    pub fn new(tick: Tick, data: MatchEventData) -> Self {
        Self { tick, data }
    }

    /// Create announcement event.
    pub fn announcement(tick: Tick, text: impl Into<String>) -> Self {
        Self::new(tick, MatchEventData::Announcement { text: text.into() })
    }

    /// Create phase changed event.
    pub fn phase_changed(tick: Tick, old_phase: impl Into<String>, new_phase: impl Into<String>) -> Self {
        Self::new(
            tick,
            MatchEventData::PhaseChanged {
                old_phase: old_phase.into(),
                new_phase: new_phase.into(),
            },
        )
    }

    /// Create player killed event.
    pub fn player_killed(tick: Tick, victim_id: PlayerId, killer_id: Option<PlayerId>) -> Self {
        Self::new(tick, MatchEventData::PlayerKilled { victim_id, killer_id })
    }

    /// Create match ended event.
    pub fn match_ended(tick: Tick, winning_team: Option<usize>) -> Self {
        Self::new(tick, MatchEventData::MatchEnded { winning_team })
    }

    /// Announcement text, if this is an announcement.
    pub fn text(&self) -> Option<&str> {
        match &self.data {
            MatchEventData::Announcement { text } => Some(text),
            _ => None,
        }
    }
}
