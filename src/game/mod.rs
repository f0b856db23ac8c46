//! Match Logic Module
//!
//! Everything the match engine decides each tick. Deterministic given the
//! same players, inputs and announcement seed.
//!
//! ## Module Structure
//!
//! - `state`: Players, entities, and the in-memory world that owns them
//! - `level`: Spawn points, team bases, capture points
//! - `command`: Deferred spawn/despawn/kill requests
//! - `events`: Match events for presentation and replay logs
//! - `announce`: Kill-feed templates
//! - `roster`: Teams and balanced assignment
//! - `spawn`: Round-robin spawn selection
//! - `mode`: Deathmatch, assault and the capture contest
//! - `orchestrator`: Per-tick driver

pub mod state;
pub mod level;
pub mod command;
pub mod events;
pub mod announce;
pub mod roster;
pub mod spawn;
pub mod mode;
pub mod orchestrator;

// Re-export key types
pub use state::{MatchWorld, PlayerState, PlayerId, EntityId, CharacterKind};
pub use level::{LevelContent, CapturePoint, CaptureStatus, SpawnPoint, TeamBase};
pub use command::EntityCommand;
pub use events::{MatchEvent, MatchEventData};
pub use roster::{Team, TeamRoster};
pub use mode::{GameModeStrategy, ModeSignal};
pub use orchestrator::{MatchContext, MatchHud, MatchOrchestrator};
