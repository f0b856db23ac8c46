//! # Arena Match Server
//!
//! Server-authoritative match lifecycle and objective-contest engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   ARENA MATCH SERVER                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/              - Deterministic primitives               │
//! │  ├── clock.rs       - Tick clock and countdown timer         │
//! │  ├── rng.rs         - Deterministic Xorshift128+ PRNG        │
//! │  ├── vec3.rs        - World positions and rotations          │
//! │  └── volume.rs      - Cylinder and box containment           │
//! │                                                              │
//! │  config.rs          - String-keyed match options             │
//! │                                                              │
//! │  game/              - Match logic                            │
//! │  ├── state.rs       - Players, entities, world store         │
//! │  ├── level.rs       - Spawns, bases, capture points          │
//! │  ├── roster.rs      - Teams and balanced assignment          │
//! │  ├── spawn.rs       - Round-robin spawn selection            │
//! │  ├── mode/          - Deathmatch, assault, capture contest   │
//! │  └── orchestrator.rs- Per-tick driver                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tick Contract
//!
//! The host calls [`MatchOrchestrator::update`] once per fixed tick, then
//! applies the drained [`EntityCommand`]s to its entity store. Nothing here
//! reads wall time, spawns threads, or blocks.
//!
//! ```
//! use arena_match::{GameTime, LevelContent, MatchConfig, MatchOrchestrator, MatchWorld, PlayerId};
//!
//! let mut world = MatchWorld::new(LevelContent::default());
//! world.add_player(PlayerId::new([1; 16]), "ana");
//!
//! let mut orchestrator = MatchOrchestrator::new(MatchConfig::default());
//! for tick in 0..3 {
//!     orchestrator.update(&mut world, GameTime::new(tick, 1.0 / 60.0));
//!     let commands = orchestrator.take_commands();
//!     world.apply_commands(commands);
//! }
//!
//! assert_eq!(orchestrator.roster().len(), 2);
//! assert!(world.players.values().all(|p| p.team_index.is_some()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;

// Re-export commonly used types
pub use config::{ConfigError, MatchConfig};
pub use core::clock::{GameTime, Tick, Timer};
pub use core::rng::DeterministicRng;
pub use core::vec3::{Quat, Transform, Vec3};
pub use game::command::EntityCommand;
pub use game::events::{MatchEvent, MatchEventData};
pub use game::level::LevelContent;
pub use game::orchestrator::{MatchHud, MatchOrchestrator};
pub use game::state::{MatchWorld, PlayerId, PlayerState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;
