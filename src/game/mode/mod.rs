//! Game Modes
//!
//! The active rule set is a tagged variant; the orchestrator dispatches with
//! a `match`, so adding a mode is a compile error until every hook handles it.
//!
//! Every hook borrows the shared [`MatchContext`] and the [`MatchWorld`]
//! separately, which lets a mode read players while it queues commands.

pub mod assault;
pub mod contest;
pub mod deathmatch;

use tracing::warn;

use crate::config::{MODE_ASSAULT, MODE_DEATHMATCH};
use crate::core::vec3::Transform;
use crate::game::orchestrator::MatchContext;
use crate::game::state::{MatchWorld, PlayerId};

pub use assault::{Assault, AssaultPhase};
pub use contest::ContestTally;
pub use deathmatch::{Deathmatch, DeathmatchPhase};

/// What the orchestrator should do after a mode update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeSignal {
    /// Keep running
    Continue,
    /// Post-match finished; restart the match
    Restart,
}

/// Active game mode.
#[derive(Clone, Debug)]
pub enum GameModeStrategy {
    /// Team deathmatch
    Deathmatch(Deathmatch),
    /// Ordered capture points, attackers against defenders
    Assault(Assault),
    /// Unknown mode name; the match stays inert
    Null,
}

impl GameModeStrategy {
    /// Strategy for a configured mode name. Unknown names get `Null`.
    pub fn from_name(name: &str) -> Self {
        match name {
            MODE_DEATHMATCH => Self::Deathmatch(Deathmatch::new()),
            MODE_ASSAULT => Self::Assault(Assault::new()),
            other => {
                warn!(mode = other, "unknown game mode, match will be inert");
                Self::Null
            }
        }
    }

    /// Mode name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deathmatch(_) => MODE_DEATHMATCH,
            Self::Assault(_) => MODE_ASSAULT,
            Self::Null => "null",
        }
    }

    /// Current phase name for logs and events.
    pub fn phase_name(&self) -> &'static str {
        match self {
            Self::Deathmatch(mode) => mode.phase().name(),
            Self::Assault(mode) => mode.phase().name(),
            Self::Null => "none",
        }
    }

    /// One-time setup after the mode is selected (teams, level state).
    pub fn initialize(&mut self, ctx: &mut MatchContext, world: &mut MatchWorld) {
        match self {
            Self::Deathmatch(mode) => mode.initialize(ctx),
            Self::Assault(mode) => mode.initialize(ctx, world),
            Self::Null => {}
        }
    }

    /// Return to the initial phase. Called after the orchestrator's own reset.
    pub fn restart(&mut self, ctx: &mut MatchContext, world: &mut MatchWorld) {
        match self {
            Self::Deathmatch(mode) => mode.restart(ctx),
            Self::Assault(mode) => mode.restart(ctx, world),
            Self::Null => {}
        }
    }

    /// Per-tick rules.
    pub fn update(&mut self, ctx: &mut MatchContext, world: &mut MatchWorld) -> ModeSignal {
        match self {
            Self::Deathmatch(mode) => mode.update(ctx, world),
            Self::Assault(mode) => mode.update(ctx, world),
            Self::Null => ModeSignal::Continue,
        }
    }

    /// A player entered the mode and needs a team.
    pub fn on_player_join(&mut self, ctx: &mut MatchContext, world: &mut MatchWorld, player: PlayerId) {
        match self {
            Self::Deathmatch(_) | Self::Assault(_) => {
                ctx.assign_team(world, player);
            }
            Self::Null => {}
        }
    }

    /// A controlled entity died on this tick.
    pub fn on_player_killed(
        &mut self,
        ctx: &mut MatchContext,
        world: &mut MatchWorld,
        victim: PlayerId,
        killer: Option<PlayerId>,
    ) {
        match self {
            Self::Deathmatch(mode) => mode.on_player_killed(ctx, world, victim, killer),
            Self::Assault(_) | Self::Null => {}
        }
    }

    /// Where `player` should spawn.
    pub fn on_player_respawn(&mut self, ctx: &mut MatchContext, world: &mut MatchWorld, player: PlayerId) -> Transform {
        let team_index = world.player(&player).and_then(|p| p.team_index).unwrap_or(0);
        match self {
            Self::Deathmatch(_) | Self::Null => ctx.pick_spawn(&world.level, team_index),
            Self::Assault(mode) => mode.on_player_respawn(ctx, world, team_index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert!(matches!(GameModeStrategy::from_name("deathmatch"), GameModeStrategy::Deathmatch(_)));
        assert!(matches!(GameModeStrategy::from_name("assault"), GameModeStrategy::Assault(_)));
        assert!(matches!(GameModeStrategy::from_name("Assault"), GameModeStrategy::Null));
        assert!(matches!(GameModeStrategy::from_name(""), GameModeStrategy::Null));
    }

    #[test]
    fn test_names() {
        assert_eq!(GameModeStrategy::from_name("assault").name(), "assault");
        assert_eq!(GameModeStrategy::from_name("assault").phase_name(), "pre_game");
        assert_eq!(GameModeStrategy::from_name("deathmatch").phase_name(), "countdown");
        assert_eq!(GameModeStrategy::Null.phase_name(), "none");
    }
}
