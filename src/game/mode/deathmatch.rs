//! Team Deathmatch
//!
//! Two teams, one point per enemy kill. When the round timer runs out the
//! team with the strictly highest score wins; equal scores end in a draw.

use tracing::{debug, info};

use crate::game::events::MatchEvent;
use crate::game::mode::ModeSignal;
use crate::game::orchestrator::MatchContext;
use crate::game::roster::Team;
use crate::game::state::{MatchWorld, PlayerId};

/// Deathmatch phase machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DeathmatchPhase {
    /// Waiting for the pre-match countdown
    #[default]
    Countdown,
    /// Round in progress
    Active,
    /// Results screen
    Ended,
}

impl DeathmatchPhase {
    /// Phase name for logs and events.
    pub fn name(self) -> &'static str {
        match self {
            Self::Countdown => "countdown",
            Self::Active => "active",
            Self::Ended => "ended",
        }
    }
}

/// Team with the strictly highest score, or `None` on a tie or empty roster.
pub fn winning_team(teams: &[Team]) -> Option<usize> {
    let best = teams.iter().map(|t| t.score).max()?;
    let mut leaders = teams.iter().enumerate().filter(|(_, t)| t.score == best);
    match (leaders.next(), leaders.next()) {
        (Some((index, _)), None) => Some(index),
        _ => None,
    }
}

/// Team deathmatch rules.
#[derive(Clone, Debug, Default)]
pub struct Deathmatch {
    phase: DeathmatchPhase,
    win_team: Option<usize>,
}

impl Deathmatch {
    /// Create the mode in its countdown phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> DeathmatchPhase {
        self.phase
    }

    /// Winner of the last finished round; `None` before the first end or on a draw.
    pub fn win_team(&self) -> Option<usize> {
        self.win_team
    }

    pub(crate) fn initialize(&mut self, ctx: &mut MatchContext) {
        ctx.create_team("Red");
        ctx.create_team("Blue");
    }

    pub(crate) fn restart(&mut self, ctx: &mut MatchContext) {
        ctx.roster_mut().reset_scores(0);
        self.win_team = None;
        self.set_phase(ctx, DeathmatchPhase::Countdown);
        let prematch = ctx.config().dm_prematch_time as f32;
        ctx.start_timer(prematch, "Match starts in");
    }

    pub(crate) fn update(&mut self, ctx: &mut MatchContext, world: &mut MatchWorld) -> ModeSignal {
        update_character_switch(world);

        if !ctx.timer_expired() {
            return ModeSignal::Continue;
        }

        match self.phase {
            DeathmatchPhase::Countdown => {
                let min_players = usize::try_from(ctx.config().dm_min_players).unwrap_or(0);
                if world.joined_count() < min_players {
                    debug!(joined = world.joined_count(), min_players, "not enough players, countdown again");
                    let prematch = ctx.config().dm_prematch_time as f32;
                    ctx.start_timer(prematch, "Waiting for players");
                    ctx.broadcast("Waiting for players");
                } else {
                    let round_length = ctx.config().dm_round_length as f32;
                    ctx.start_timer(round_length, "Match ends in");
                    self.set_phase(ctx, DeathmatchPhase::Active);
                    ctx.broadcast("Match started");
                }
            }
            DeathmatchPhase::Active => self.end_round(ctx, world),
            DeathmatchPhase::Ended => return ModeSignal::Restart,
        }
        ModeSignal::Continue
    }

    pub(crate) fn on_player_killed(
        &mut self,
        ctx: &mut MatchContext,
        world: &mut MatchWorld,
        victim: PlayerId,
        killer: Option<PlayerId>,
    ) {
        let Some(killer) = killer else {
            return;
        };
        let victim_team = world.player(&victim).and_then(|p| p.team_index);
        let Some(killer_state) = world.player_mut(&killer) else {
            return;
        };
        let Some(killer_team) = killer_state.team_index else {
            return;
        };
        if victim_team == Some(killer_team) {
            debug!(%victim, %killer, "friendly kill, no score");
            return;
        }

        killer_state.score += 1;
        if let Some(team) = ctx.roster_mut().team_mut(killer_team) {
            team.score += 1;
        }
    }

    fn end_round(&mut self, ctx: &mut MatchContext, world: &mut MatchWorld) {
        self.win_team = winning_team(ctx.roster().teams());

        for player in world.players.values_mut() {
            if let Some(entity) = player.controlled_entity {
                ctx.request_kill(entity);
            }
            let result = match (self.win_team, player.team_index) {
                (None, _) => "DRAW",
                (Some(winner), Some(team)) if winner == team => "VICTORY",
                _ => "DEFEAT",
            };
            player.show_result(result);
        }

        ctx.set_respawn_enabled(false);
        let postmatch = ctx.config().dm_postmatch_time as f32;
        ctx.start_timer(postmatch, "Next match in");
        self.set_phase(ctx, DeathmatchPhase::Ended);

        let text = match self.win_team {
            Some(team) => format!("Match over. {} wins!", ctx.roster().team_name(team)),
            None => "Match over. It's a tie!".to_string(),
        };
        info!(win_team = ?self.win_team, "deathmatch round over");
        ctx.broadcast(text);
        let tick = ctx.now().tick;
        ctx.record(MatchEvent::match_ended(tick, self.win_team));
    }

    fn set_phase(&mut self, ctx: &mut MatchContext, phase: DeathmatchPhase) {
        if self.phase != phase {
            info!(from = self.phase.name(), to = phase.name(), "deathmatch phase");
            let tick = ctx.now().tick;
            ctx.record(MatchEvent::phase_changed(tick, self.phase.name(), phase.name()));
        }
        self.phase = phase;
    }
}

/// Players standing in their own team base may switch character.
fn update_character_switch(world: &mut MatchWorld) {
    let MatchWorld { players, entities, level, .. } = world;
    for player in players.values_mut() {
        let position = player
            .controlled_entity
            .and_then(|e| entities.get(&e))
            .filter(|e| e.is_alive())
            .map(|e| e.position);
        player.character_switch_allowed = match (player.team_index, position) {
            (Some(team), Some(position)) => level.in_team_base(team, position),
            _ => false,
        };
    }
}
