//! Assault Mode
//!
//! Attackers capture an ordered chain of points while defenders hold them
//! off. Only one point is live at a time; completing it unlocks the next.
//! Attackers win by completing the last point, defenders by running out
//! the round timer.
//!
//! ## Bases
//!
//! The most recently completed point is the attackers' base and the point
//! after the live one is the defenders' base. Both anchor respawns and allow
//! character switching for their side.

use tracing::{debug, info, warn};

use crate::core::vec3::{Transform, Vec3};
use crate::core::volume::Cylinder;
use crate::game::announce::{fill, team_color, CAPTURE_TEMPLATE};
use crate::game::events::{MatchEvent, MatchEventData};
use crate::game::level::{CapturePoint, CaptureStatus};
use crate::game::mode::contest::{self, ContestTally};
use crate::game::mode::ModeSignal;
use crate::game::orchestrator::MatchContext;
use crate::game::spawn::advance_cursor;
use crate::game::state::MatchWorld;

/// Team index of the attacking side.
pub const ATTACKERS: usize = 0;

/// Team index of the defending side.
pub const DEFENDERS: usize = 1;

/// Assault phase machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AssaultPhase {
    /// Waiting for the pre-game countdown
    #[default]
    PreGame,
    /// Round in progress
    Active,
    /// Results screen
    PostGame,
}

impl AssaultPhase {
    /// Phase name for logs and events.
    pub fn name(self) -> &'static str {
        match self {
            Self::PreGame => "pre_game",
            Self::Active => "active",
            Self::PostGame => "post_game",
        }
    }
}

/// Assault rules. Point handles are indices into `LevelContent::capture_points`.
#[derive(Clone, Debug, Default)]
pub struct Assault {
    phase: AssaultPhase,
    active_point: Option<usize>,
    attackers_base_point: Option<usize>,
    defenders_base_point: Option<usize>,
    num_captured: usize,
    spawn_cursors: [usize; 2],
    win_team: Option<usize>,
}

impl Assault {
    /// Create the mode in its pre-game phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> AssaultPhase {
        self.phase
    }

    /// Point currently being contested.
    pub fn active_point(&self) -> Option<usize> {
        self.active_point
    }

    /// Last completed point.
    pub fn attackers_base_point(&self) -> Option<usize> {
        self.attackers_base_point
    }

    /// Point after the active one.
    pub fn defenders_base_point(&self) -> Option<usize> {
        self.defenders_base_point
    }

    /// Points completed this round.
    pub fn num_captured(&self) -> usize {
        self.num_captured
    }

    /// Winner of the last finished round.
    pub fn win_team(&self) -> Option<usize> {
        self.win_team
    }

    pub(crate) fn initialize(&mut self, ctx: &mut MatchContext, world: &mut MatchWorld) {
        ctx.create_team("Attackers");
        ctx.create_team("Defenders");
        if world.level.capture_points.is_empty() {
            warn!("assault level has no capture points");
        }
    }

    pub(crate) fn restart(&mut self, ctx: &mut MatchContext, world: &mut MatchWorld) {
        for point in &mut world.level.capture_points {
            point.reset();
        }
        self.select_next_point(&mut world.level.capture_points);
        self.spawn_cursors = [0; 2];
        self.win_team = None;

        self.set_phase(ctx, AssaultPhase::PreGame);
        let prematch = ctx.config().assault_prematch_time as f32;
        ctx.start_timer(prematch, "Match starts in");
    }

    /// Recompute the active point and both bases from point statuses.
    ///
    /// The first uncompleted point (by `capture_index`) becomes active and
    /// every later one is locked.
    pub(crate) fn select_next_point(&mut self, points: &mut [CapturePoint]) {
        let mut order: Vec<usize> = (0..points.len()).collect();
        order.sort_by_key(|&i| points[i].capture_index);

        let (completed, remaining): (Vec<usize>, Vec<usize>) = order
            .into_iter()
            .partition(|&i| points[i].status == CaptureStatus::Completed);

        self.num_captured = completed.len();
        self.attackers_base_point = completed.last().copied();
        self.active_point = remaining.first().copied();
        self.defenders_base_point = remaining.get(1).copied();

        for (slot, &index) in remaining.iter().enumerate() {
            points[index].status = if slot == 0 {
                CaptureStatus::Active
            } else {
                CaptureStatus::Locked
            };
        }

        debug!(
            active = ?self.active_point,
            attackers_base = ?self.attackers_base_point,
            defenders_base = ?self.defenders_base_point,
            captured = self.num_captured,
            "selected capture point"
        );
    }

    pub(crate) fn update(&mut self, ctx: &mut MatchContext, world: &mut MatchWorld) -> ModeSignal {
        self.update_character_switch(world);

        if self.phase == AssaultPhase::Active && self.update_active_point(ctx, world) {
            self.end_round(ctx, world, ATTACKERS);
            return ModeSignal::Continue;
        }

        if !ctx.timer_expired() {
            return ModeSignal::Continue;
        }

        match self.phase {
            AssaultPhase::PreGame => {
                let min_players = usize::try_from(ctx.config().assault_min_players).unwrap_or(0);
                if world.joined_count() < min_players {
                    debug!(joined = world.joined_count(), min_players, "not enough players, pre-game again");
                    let prematch = ctx.config().assault_prematch_time as f32;
                    ctx.start_timer(prematch, "Waiting for players");
                    ctx.broadcast("Waiting for players");
                } else {
                    let round_length = ctx.config().assault_round_length as f32;
                    ctx.start_timer(round_length, "Time left");
                    self.set_phase(ctx, AssaultPhase::Active);
                    ctx.broadcast("Match started");
                }
            }
            AssaultPhase::Active => self.end_round(ctx, world, DEFENDERS),
            AssaultPhase::PostGame => {
                for player in world.players.values_mut() {
                    player.display_result = false;
                }
                return ModeSignal::Restart;
            }
        }
        ModeSignal::Continue
    }

    /// Run one contest tick on the live point. Returns true when the
    /// attackers completed the final point.
    fn update_active_point(&mut self, ctx: &mut MatchContext, world: &mut MatchWorld) -> bool {
        let Some(active) = self.active_point else {
            return false;
        };
        let Some(zone) = world.level.capture_points.get(active).map(|p| p.zone) else {
            warn!(active, "active capture point missing from level");
            return false;
        };

        let mut tally = ContestTally::default();
        for player in world.players.values() {
            let Some(position) = world.live_position(&player.id) else {
                continue;
            };
            if !zone.contains(position) {
                continue;
            }
            match player.team_index {
                Some(ATTACKERS) => tally.attacking += 1,
                Some(DEFENDERS) => tally.defending += 1,
                _ => {}
            }
        }

        let tick_interval = ctx.now().tick_interval;
        let MatchWorld { players, level, .. } = world;
        let Some(point) = level.capture_points.get_mut(active) else {
            return false;
        };
        let status = contest::advance(point, tally, tick_interval);

        for player in players.values_mut() {
            player.goal_text = if player.team_index == Some(ATTACKERS) {
                format!("Capture {}", point.name)
            } else {
                format!("Defend {}", point.name)
            };
            player.goal_completion = point.captured;
            player.goal_attackers = tally.attacking;
            player.goal_defenders = tally.defending;
            player.goal_attacker_color = team_color(Some(ATTACKERS)).to_string();
            player.goal_defender_color = team_color(Some(DEFENDERS)).to_string();
        }

        if status != CaptureStatus::Completed {
            return false;
        }

        let name = point.name.clone();
        let capture_index = point.capture_index;
        self.select_next_point(&mut level.capture_points);

        let total = level.capture_points.len();
        let n = self.num_captured.to_string();
        let total_text = total.to_string();
        let text = fill(CAPTURE_TEMPLATE, &[
            ("team", ctx.roster().team_name(ATTACKERS)),
            ("point", name.as_str()),
            ("n", n.as_str()),
            ("total", total_text.as_str()),
        ]);
        info!(point = %name, captured = self.num_captured, total, "capture point completed");
        ctx.broadcast(text);
        ctx.push_event(MatchEventData::PointCaptured {
            capture_index,
            captured: self.num_captured,
            total,
        });

        self.active_point.is_none()
    }

    /// Own base point zone or own team base box.
    fn update_character_switch(&self, world: &mut MatchWorld) {
        let attackers_zone = self.zone_of(world, self.attackers_base_point);
        let defenders_zone = self.zone_of(world, self.defenders_base_point);

        let MatchWorld { players, entities, level, .. } = world;
        for player in players.values_mut() {
            let position: Option<Vec3> = player
                .controlled_entity
                .and_then(|e| entities.get(&e))
                .filter(|e| e.is_alive())
                .map(|e| e.position);
            player.character_switch_allowed = match (player.team_index, position) {
                (Some(team), Some(position)) => {
                    let base_zone = match team {
                        ATTACKERS => attackers_zone,
                        DEFENDERS => defenders_zone,
                        _ => None,
                    };
                    base_zone.is_some_and(|zone| zone.contains(position)) || level.in_team_base(team, position)
                }
                _ => false,
            };
        }
    }

    fn zone_of(&self, world: &MatchWorld, point: Option<usize>) -> Option<Cylinder> {
        point.and_then(|i| world.level.capture_points.get(i)).map(|p| p.zone)
    }

    fn end_round(&mut self, ctx: &mut MatchContext, world: &mut MatchWorld, winner: usize) {
        self.win_team = Some(winner);

        for player in world.players.values_mut() {
            if let Some(entity) = player.controlled_entity {
                ctx.request_kill(entity);
            }
            let result = if player.team_index == Some(winner) { "VICTORY" } else { "DEFEAT" };
            player.show_result(result);
        }

        ctx.set_respawn_enabled(false);
        let postmatch = ctx.config().assault_postmatch_time as f32;
        ctx.start_timer(postmatch, "Next match in");
        self.set_phase(ctx, AssaultPhase::PostGame);

        let text = format!("Match over. {} win!", ctx.roster().team_name(winner));
        info!(winner, captured = self.num_captured, "assault round over");
        ctx.broadcast(text);
        let tick = ctx.now().tick;
        ctx.record(MatchEvent::match_ended(tick, Some(winner)));
    }

    /// Round-robin over the side's base point spawns, falling back to the
    /// generic team spawns.
    pub(crate) fn on_player_respawn(&mut self, ctx: &mut MatchContext, world: &MatchWorld, team_index: usize) -> Transform {
        let base = match team_index {
            ATTACKERS => self.attackers_base_point,
            DEFENDERS => self.defenders_base_point,
            _ => None,
        };
        let spawns = base
            .and_then(|i| world.level.capture_points.get(i))
            .map(|p| p.spawns.as_slice())
            .filter(|s| !s.is_empty());

        if let (Some(spawns), Some(cursor)) = (spawns, self.spawn_cursors.get_mut(team_index)) {
            return spawns[advance_cursor(cursor, spawns.len())];
        }
        ctx.pick_spawn(&world.level, team_index)
    }

    fn set_phase(&mut self, ctx: &mut MatchContext, phase: AssaultPhase) {
        if self.phase != phase {
            info!(from = self.phase.name(), to = phase.name(), "assault phase");
            let tick = ctx.now().tick;
            ctx.record(MatchEvent::phase_changed(tick, self.phase.name(), phase.name()));
        }
        self.phase = phase;
    }
}
