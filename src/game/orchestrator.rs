//! Match Orchestrator
//!
//! Top-level driver called once per simulation tick. Handles the bookkeeping
//! every mode shares (joins, deaths, respawn gating, spawn requests, the
//! presentation mirror) and delegates the rules to the active
//! [`GameModeStrategy`].
//!
//! ## Tick order
//!
//! 1. Mode name changed? Swap strategy, restart, and return.
//! 2. Process players that have not joined the active mode.
//! 3. Request spawns for players without a controlled entity.
//! 4. Announce fresh deaths; despawn bodies whose respawn delay elapsed.
//! 5. `strategy.update()`; restart if it asks for one.
//! 6. Refresh the HUD mirror.

use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, MatchConfig};
use crate::core::clock::{GameTime, Timer};
use crate::core::rng::DeterministicRng;
use crate::core::vec3::Transform;
use crate::game::announce::{Announcer, Combatant};
use crate::game::command::EntityCommand;
use crate::game::events::{MatchEvent, MatchEventData};
use crate::game::level::LevelContent;
use crate::game::mode::{GameModeStrategy, ModeSignal};
use crate::game::roster::{Team, TeamRoster};
use crate::game::spawn::SpawnSelector;
use crate::game::state::{CharacterKind, EntityId, MatchWorld, PlayerId};

/// Values the presentation layer displays, refreshed every tick.
///
/// Only the first two teams are mirrored; the UI is built for exactly two.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchHud {
    /// Label of the running countdown
    pub timer_message: String,
    /// Whole seconds left on the countdown
    pub time_remaining: i32,
    /// Name of team 0
    pub team_name_0: String,
    /// Name of team 1
    pub team_name_1: String,
    /// Score of team 0
    pub team_score_0: i32,
    /// Score of team 1
    pub team_score_1: i32,
}

impl Default for MatchHud {
    fn default() -> Self {
        Self {
            timer_message: String::new(),
            time_remaining: 0,
            team_name_0: String::new(),
            team_name_1: String::new(),
            team_score_0: Team::NO_SCORE,
            team_score_1: Team::NO_SCORE,
        }
    }
}

/// Shared match services handed to the active mode.
///
/// Everything here is owned by the orchestrator; the mode borrows it for the
/// duration of one call.
#[derive(Debug)]
pub struct MatchContext {
    config: MatchConfig,
    now: GameTime,
    roster: TeamRoster,
    timer: Timer,
    timer_message: String,
    spawns: SpawnSelector,
    respawn_enabled: bool,
    announcer: Announcer,
    hud: MatchHud,
    commands: Vec<EntityCommand>,
    events: Vec<MatchEvent>,
}

impl MatchContext {
    fn new(config: MatchConfig, rng: DeterministicRng) -> Self {
        Self {
            config,
            now: GameTime::default(),
            roster: TeamRoster::new(),
            timer: Timer::default(),
            timer_message: String::new(),
            spawns: SpawnSelector::new(),
            respawn_enabled: true,
            announcer: Announcer::new(rng),
            hud: MatchHud::default(),
            commands: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Current options.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Time of the update in progress.
    pub fn now(&self) -> GameTime {
        self.now
    }

    /// Teams of the active mode.
    pub fn roster(&self) -> &TeamRoster {
        &self.roster
    }

    /// Teams of the active mode, mutably.
    pub fn roster_mut(&mut self) -> &mut TeamRoster {
        &mut self.roster
    }

    /// (Re)arm the match timer from now.
    pub fn start_timer(&mut self, duration_seconds: f32, message: &str) {
        self.timer = Timer::started(self.now, duration_seconds);
        self.timer_message = message.to_string();
        debug!(duration_seconds, message, "timer armed");
    }

    /// Whole seconds left on the match timer.
    pub fn remaining_seconds(&self) -> i32 {
        self.timer.remaining_seconds(self.now)
    }

    /// The match timer has run out.
    pub fn timer_expired(&self) -> bool {
        self.timer.is_expired(self.now)
    }

    /// Label of the running countdown.
    pub fn timer_message(&self) -> &str {
        &self.timer_message
    }

    /// Append a team; the first two are mirrored into the HUD.
    pub fn create_team(&mut self, name: &str) -> usize {
        let index = self.roster.create_team(name);
        match index {
            0 => self.hud.team_name_0 = name.to_string(),
            1 => self.hud.team_name_1 = name.to_string(),
            _ => warn!(index, name, "team beyond the two shown by the HUD"),
        }
        info!(index, name, "created team");
        index
    }

    /// Put `player` on the team with the fewest members.
    pub fn assign_team(&mut self, world: &mut MatchWorld, player: PlayerId) -> Option<usize> {
        let Some(team_index) = self.roster.balanced_team(player, world.players.values()) else {
            warn!(%player, "no teams to assign player to");
            return None;
        };

        if let Some(state) = world.player_mut(&player) {
            state.team_index = Some(team_index);
        }
        info!(%player, team_index, team = self.roster.team_name(team_index), "assigned team");
        self.push_event(MatchEventData::TeamAssigned { player_id: player, team_index });
        Some(team_index)
    }

    /// Next generic spawn for `team_index`, or the origin if the level has none.
    pub fn pick_spawn(&mut self, level: &LevelContent, team_index: usize) -> Transform {
        self.spawns.pick(&level.spawn_points, team_index).unwrap_or_else(|| {
            warn!(team_index, "no spawn points for team, using origin");
            Transform::default()
        })
    }

    /// Whether dead players get despawned and respawned.
    pub fn respawn_enabled(&self) -> bool {
        self.respawn_enabled
    }

    /// Enable or disable respawning.
    pub fn set_respawn_enabled(&mut self, enabled: bool) {
        self.respawn_enabled = enabled;
    }

    /// Send `text` to every player.
    pub fn broadcast(&mut self, text: impl Into<String>) {
        let text = text.into();
        info!(%text, "announcement");
        self.events.push(MatchEvent::announcement(self.now.tick, text));
    }

    /// Record a structured event at the current tick.
    pub fn push_event(&mut self, data: MatchEventData) {
        self.events.push(MatchEvent::new(self.now.tick, data));
    }

    /// Record a prebuilt event.
    pub fn record(&mut self, event: MatchEvent) {
        self.events.push(event);
    }

    /// Queue a character spawn.
    pub fn request_spawn(&mut self, kind: CharacterKind, transform: Transform, owner: PlayerId) {
        self.commands.push(EntityCommand::Spawn { kind, transform, owner });
    }

    /// Queue an entity removal.
    pub fn request_despawn(&mut self, entity: EntityId) {
        self.commands.push(EntityCommand::Despawn { entity });
    }

    /// Queue a forced kill with no respawn countdown.
    pub fn request_kill(&mut self, entity: EntityId) {
        self.commands.push(EntityCommand::Kill { entity });
    }

    fn refresh_hud(&mut self) {
        self.hud.time_remaining = self.remaining_seconds();
        self.hud.timer_message.clone_from(&self.timer_message);
        self.hud.team_score_0 = self.roster.team(0).map_or(Team::NO_SCORE, |t| t.score);
        self.hud.team_score_1 = self.roster.team(1).map_or(Team::NO_SCORE, |t| t.score);
    }
}

/// Drives the active game mode once per tick.
#[derive(Debug)]
pub struct MatchOrchestrator {
    strategy: GameModeStrategy,
    mode_name: Option<String>,
    ctx: MatchContext,
}

impl MatchOrchestrator {
    /// Create an orchestrator. The configured mode is set up on the first update.
    pub fn new(config: MatchConfig) -> Self {
        Self::with_rng(config, DeterministicRng::default())
    }

    /// Create an orchestrator with an explicit announcement RNG.
    pub fn with_rng(config: MatchConfig, rng: DeterministicRng) -> Self {
        Self {
            strategy: GameModeStrategy::Null,
            mode_name: None,
            ctx: MatchContext::new(config, rng),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current options.
    pub fn config(&self) -> &MatchConfig {
        &self.ctx.config
    }

    /// Options, for runtime changes. A new mode name takes effect next update.
    pub fn config_mut(&mut self) -> &mut MatchConfig {
        &mut self.ctx.config
    }

    /// Set one option by key.
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.ctx.config.set(key, value)
    }

    /// Name of the mode currently running, if any.
    pub fn mode_name(&self) -> Option<&str> {
        self.mode_name.as_deref()
    }

    /// Active strategy.
    pub fn strategy(&self) -> &GameModeStrategy {
        &self.strategy
    }

    /// Teams of the active mode.
    pub fn roster(&self) -> &TeamRoster {
        &self.ctx.roster
    }

    /// Presentation mirror.
    pub fn hud(&self) -> &MatchHud {
        &self.ctx.hud
    }

    /// Whether respawning is enabled.
    pub fn respawn_enabled(&self) -> bool {
        self.ctx.respawn_enabled
    }

    /// Whole seconds left on the match timer at the last update.
    pub fn remaining_seconds(&self) -> i32 {
        self.ctx.remaining_seconds()
    }

    /// Drain queued entity commands for the entity store.
    pub fn take_commands(&mut self) -> Vec<EntityCommand> {
        std::mem::take(&mut self.ctx.commands)
    }

    /// Drain events produced since the last call.
    pub fn take_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.ctx.events)
    }

    // =========================================================================
    // Shared services
    // =========================================================================

    /// (Re)arm the match timer from the last update time.
    pub fn start_timer(&mut self, duration_seconds: f32, message: &str) {
        self.ctx.start_timer(duration_seconds, message);
    }

    /// Append a team and return its index.
    pub fn create_team(&mut self, name: &str) -> usize {
        self.ctx.create_team(name)
    }

    /// Put `player` on the least populated team.
    pub fn assign_team(&mut self, world: &mut MatchWorld, player: PlayerId) -> Option<usize> {
        self.ctx.assign_team(world, player)
    }

    /// Next generic spawn transform for `team_index`.
    pub fn pick_spawn(&mut self, level: &LevelContent, team_index: usize) -> Transform {
        self.ctx.pick_spawn(level, team_index)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Switch to mode `name` and make it the configured mode. Does nothing
    /// else if that mode is already running.
    ///
    /// Teams are rebuilt by the new mode, so every player is un-joined and
    /// loses its team and entity; the next update re-joins and respawns them.
    pub fn set_mode(&mut self, world: &mut MatchWorld, name: &str) {
        self.ctx.config.mode_name = name.to_string();
        if self.mode_name.as_deref() == Some(name) {
            return;
        }

        info!(
            from = self.mode_name.as_deref().unwrap_or("none"),
            to = name,
            "switching game mode"
        );

        self.ctx.roster.clear();
        self.ctx.spawns.reset();
        self.ctx.hud = MatchHud::default();

        for player in world.players.values_mut() {
            player.joined_mode = false;
            player.team_index = None;
            player.character_switch_allowed = false;
            if let Some(entity) = player.controlled_entity.take() {
                self.ctx.request_despawn(entity);
            }
        }

        let mut strategy = GameModeStrategy::from_name(name);
        strategy.initialize(&mut self.ctx, world);
        self.strategy = strategy;
        self.mode_name = Some(name.to_string());
        self.ctx.push_event(MatchEventData::ModeChanged { mode: name.to_string() });

        self.restart(world);
    }

    /// Reset scores, results and respawn, then restart the active mode.
    ///
    /// Overwrites timer and phase unconditionally, so calling it again is a no-op.
    pub fn restart(&mut self, world: &mut MatchWorld) {
        self.ctx.roster.reset_scores(Team::NO_SCORE);
        for player in world.players.values_mut() {
            player.reset_match_stats();
        }
        self.ctx.respawn_enabled = true;

        self.strategy.restart(&mut self.ctx, world);
        self.ctx.refresh_hud();
        info!(mode = self.strategy.name(), phase = self.strategy.phase_name(), "match restarted");
    }

    /// Run one simulation tick.
    pub fn update(&mut self, world: &mut MatchWorld, now: GameTime) {
        self.ctx.now = now;

        if self.mode_name.as_deref() != Some(self.ctx.config.mode_name.as_str()) {
            let name = self.ctx.config.mode_name.clone();
            self.set_mode(world, &name);
            return;
        }

        self.join_new_players(world);
        self.request_spawns(world);
        self.process_deaths(world);

        if self.strategy.update(&mut self.ctx, world) == ModeSignal::Restart {
            self.restart(world);
        }

        self.ctx.refresh_hud();
    }

    /// Spawn transform for `player`, chosen by the active mode.
    pub fn on_player_respawn_request(&mut self, world: &mut MatchWorld, player: PlayerId) -> Transform {
        self.strategy.on_player_respawn(&mut self.ctx, world, player)
    }

    /// Release `player`'s entity before the host removes the player.
    pub fn on_player_leave(&mut self, world: &mut MatchWorld, player: PlayerId) {
        if let Some(entity) = world.player_mut(&player).and_then(|p| p.controlled_entity.take()) {
            self.ctx.request_despawn(entity);
        }
        info!(%player, "player left");
    }

    /// Change `player`'s character if they stand where switching is allowed.
    ///
    /// The current entity is despawned; the new character spawns next tick.
    pub fn request_character_switch(&mut self, world: &mut MatchWorld, player: PlayerId, kind: CharacterKind) -> bool {
        let Some(state) = world.player_mut(&player) else {
            return false;
        };
        if !state.character_switch_allowed {
            debug!(%player, "character switch outside base refused");
            return false;
        }

        state.character = kind;
        if let Some(entity) = state.controlled_entity.take() {
            self.ctx.request_despawn(entity);
        }
        info!(%player, kind = kind.0, "character switched");
        true
    }

    // =========================================================================
    // Per-tick bookkeeping
    // =========================================================================

    fn join_new_players(&mut self, world: &mut MatchWorld) {
        let joining: Vec<PlayerId> = world
            .players
            .values()
            .filter(|p| !p.joined_mode)
            .map(|p| p.id)
            .collect();

        for id in joining {
            if let Some(player) = world.player_mut(&id) {
                player.reset_match_stats();
            }
            self.strategy.on_player_join(&mut self.ctx, world, id);
            if let Some(player) = world.player_mut(&id) {
                player.joined_mode = true;
            }
        }
    }

    fn request_spawns(&mut self, world: &mut MatchWorld) {
        if !self.ctx.respawn_enabled {
            return;
        }

        let waiting: Vec<(PlayerId, CharacterKind)> = world
            .players
            .values()
            .filter(|p| p.joined_mode && p.team_index.is_some() && p.controlled_entity.is_none())
            .map(|p| (p.id, p.character))
            .collect();

        for (id, kind) in waiting {
            let transform = self.strategy.on_player_respawn(&mut self.ctx, world, id);
            debug!(player = %id, position = %transform.position, "spawn requested");
            self.ctx.request_spawn(kind, transform, id);
        }
    }

    fn process_deaths(&mut self, world: &mut MatchWorld) {
        let now = self.ctx.now;
        let respawn_ticks = now.ticks_for(self.ctx.config.respawn_delay as f32);

        let mut fresh_deaths = Vec::new();
        let mut expired = Vec::new();
        for player in world.players.values() {
            let Some(entity) = player.controlled_entity.and_then(|e| world.entities.get(&e)) else {
                continue;
            };
            if entity.is_alive() {
                continue;
            }

            // Deaths recorded between updates are picked up on the next one
            if entity.death_tick.is_some() && !entity.death_announced {
                fresh_deaths.push((player.id, entity.id, entity.killed_by));
            }

            // Forced kills carry no death tick and skip the countdown
            let delay_elapsed = entity
                .death_tick
                .map_or(true, |died| now.tick.saturating_sub(died) >= respawn_ticks);
            if self.ctx.respawn_enabled && delay_elapsed {
                expired.push((player.id, entity.id));
            }
        }

        for (victim, entity, killed_by) in fresh_deaths {
            if let Some(state) = world.entities.get_mut(&entity) {
                state.death_announced = true;
            }
            self.handle_death(world, victim, killed_by);
        }

        for (player, entity) in expired {
            self.ctx.request_despawn(entity);
            if let Some(state) = world.player_mut(&player) {
                state.controlled_entity = None;
            }
            debug!(%player, entity = entity.0, "respawn delay elapsed");
        }
    }

    fn handle_death(&mut self, world: &mut MatchWorld, victim: PlayerId, killed_by: Option<PlayerId>) {
        let killer = killed_by.filter(|k| *k != victim && world.players.contains_key(k));

        let message = {
            let Some(victim_state) = world.player(&victim) else {
                return;
            };
            let killer_state = killer.and_then(|k| world.player(&k));
            self.ctx.announcer.kill_message(
                Combatant { name: &victim_state.name, team_index: victim_state.team_index },
                killer_state.map(|k| Combatant { name: &k.name, team_index: k.team_index }),
            )
        };

        if let Some(state) = world.player_mut(&victim) {
            state.deaths += 1;
        }
        if let Some(state) = killer.and_then(|k| world.player_mut(&k)) {
            state.kills += 1;
        }

        self.ctx.broadcast(message);
        let tick = self.ctx.now.tick;
        self.ctx.record(MatchEvent::player_killed(tick, victim, killer));
        self.strategy.on_player_killed(&mut self.ctx, world, victim, killer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MODE_ASSAULT, MODE_DEATHMATCH};
    use crate::core::vec3::Vec3;
    use crate::game::level::SpawnPoint;

    const TICK: f32 = 0.1;

    fn level() -> LevelContent {
        LevelContent {
            spawn_points: (0..2)
                .flat_map(|team| {
                    (0..2).map(move |i| SpawnPoint {
                        team_index: team,
                        transform: Transform::at(Vec3::new(i as f32, 0.0, team as f32 * 100.0)),
                    })
                })
                .collect(),
            ..Default::default()
        }
    }

    fn world_with_players(count: u8) -> MatchWorld {
        let mut world = MatchWorld::new(level());
        for i in 0..count {
            world.add_player(PlayerId::new([i + 1; 16]), format!("p{}", i + 1));
        }
        world
    }

    fn config(mode: &str) -> MatchConfig {
        MatchConfig {
            mode_name: mode.to_string(),
            ..MatchConfig::default()
        }
    }

    /// Run one tick and let the world execute the queued commands.
    fn step(orch: &mut MatchOrchestrator, world: &mut MatchWorld, tick: u64) {
        orch.update(world, GameTime::new(tick, TICK));
        let commands = orch.take_commands();
        world.apply_commands(commands);
    }

    fn pid(n: u8) -> PlayerId {
        PlayerId::new([n; 16])
    }

    #[test]
    fn test_first_update_only_sets_mode() {
        let mut world = world_with_players(2);
        let mut orch = MatchOrchestrator::new(config(MODE_DEATHMATCH));

        orch.update(&mut world, GameTime::new(0, TICK));
        assert_eq!(orch.mode_name(), Some(MODE_DEATHMATCH));
        assert_eq!(orch.roster().len(), 2);
        assert!(world.players.values().all(|p| !p.joined_mode));

        orch.update(&mut world, GameTime::new(1, TICK));
        assert!(world.players.values().all(|p| p.joined_mode && p.team_index.is_some()));
    }

    #[test]
    fn test_set_mode_same_name_is_noop() {
        let mut world = world_with_players(2);
        let mut orch = MatchOrchestrator::new(config(MODE_DEATHMATCH));
        step(&mut orch, &mut world, 0);
        step(&mut orch, &mut world, 1);
        orch.take_events();

        orch.set_mode(&mut world, MODE_DEATHMATCH);
        assert!(orch.take_events().is_empty());
        assert!(world.players.values().all(|p| p.joined_mode));
    }

    #[test]
    fn test_unknown_mode_runs_inert() {
        let mut world = world_with_players(3);
        let mut orch = MatchOrchestrator::new(config("capture-the-flag"));

        for tick in 0..50 {
            step(&mut orch, &mut world, tick);
        }
        assert!(matches!(orch.strategy(), GameModeStrategy::Null));
        assert!(orch.roster().is_empty());
        assert!(world.entities.is_empty());
        assert_eq!(orch.remaining_seconds(), 0);
    }

    #[test]
    fn test_restart_on_empty_world() {
        let mut world = MatchWorld::new(LevelContent::default());
        let mut orch = MatchOrchestrator::new(config(MODE_ASSAULT));

        orch.restart(&mut world);
        step(&mut orch, &mut world, 0);
        orch.restart(&mut world);
        orch.restart(&mut world);
        assert!(orch.respawn_enabled());
    }

    #[test]
    fn test_hud_mirrors_two_teams() {
        let mut world = world_with_players(0);
        let mut orch = MatchOrchestrator::new(config(MODE_DEATHMATCH));
        step(&mut orch, &mut world, 0);

        let hud = orch.hud();
        assert_eq!(hud.team_name_0, orch.roster().team_name(0));
        assert_eq!(hud.team_name_1, orch.roster().team_name(1));
        assert_eq!(hud.team_score_0, 0);
        assert_eq!(hud.time_remaining, orch.config().dm_prematch_time);
    }

    #[test]
    fn test_create_team_beyond_two_not_mirrored() {
        let mut orch = MatchOrchestrator::new(config("none"));
        orch.create_team("A");
        orch.create_team("B");
        assert_eq!(orch.create_team("C"), 2);
        assert_eq!(orch.hud().team_name_0, "A");
        assert_eq!(orch.hud().team_name_1, "B");
    }

    #[test]
    fn test_spawn_requested_after_join() {
        let mut world = world_with_players(2);
        let mut orch = MatchOrchestrator::new(config(MODE_DEATHMATCH));
        step(&mut orch, &mut world, 0);
        step(&mut orch, &mut world, 1);

        for player in world.players.values() {
            let entity = world.entity(player.controlled_entity.unwrap()).unwrap();
            // Team 1 spawns sit at z = 100
            assert_eq!(entity.position.z, player.team_index.unwrap() as f32 * 100.0);
        }
    }

    #[test]
    fn test_pick_spawn_falls_back_to_origin() {
        let mut orch = MatchOrchestrator::new(config(MODE_DEATHMATCH));
        let transform = orch.pick_spawn(&LevelContent::default(), 0);
        assert_eq!(transform, Transform::default());
    }

    #[test]
    fn test_death_announced_once_and_respawn_gated() {
        let mut world = world_with_players(2);
        let mut orch = MatchOrchestrator::new(config(MODE_DEATHMATCH));
        step(&mut orch, &mut world, 0);
        step(&mut orch, &mut world, 1);

        let victim = pid(1);
        let entity = world.player(&victim).unwrap().controlled_entity.unwrap();
        world.damage(entity, 1000.0, Some(pid(2)), 100);
        orch.take_events();

        for tick in 100..150 {
            step(&mut orch, &mut world, tick);
            let kills = orch
                .take_events()
                .into_iter()
                .filter(|e| matches!(e.data, MatchEventData::PlayerKilled { .. }))
                .count();
            assert_eq!(kills, usize::from(tick == 100), "tick {tick}");
            assert_eq!(world.player(&victim).unwrap().controlled_entity, Some(entity));
        }

        orch.update(&mut world, GameTime::new(150, TICK));
        let commands = orch.take_commands();
        assert!(commands.contains(&EntityCommand::Despawn { entity }));
        assert!(world.player(&victim).unwrap().controlled_entity.is_none());
        world.apply_commands(commands);

        step(&mut orch, &mut world, 151);
        assert!(world.player(&victim).unwrap().controlled_entity.is_some());
        assert_eq!(world.player(&victim).unwrap().deaths, 1);
        assert_eq!(world.player(&pid(2)).unwrap().kills, 1);
    }

    #[test]
    fn test_death_between_updates_is_scored() {
        let mut world = world_with_players(2);
        let mut orch = MatchOrchestrator::new(config(MODE_DEATHMATCH));
        step(&mut orch, &mut world, 0);
        step(&mut orch, &mut world, 1);
        step(&mut orch, &mut world, 2);
        orch.take_events();

        // Host combat resolves after the engine's update for tick 2
        let victim = pid(1);
        let entity = world.player(&victim).unwrap().controlled_entity.unwrap();
        assert!(world.damage(entity, 1000.0, Some(pid(2)), 2));

        step(&mut orch, &mut world, 3);
        let events = orch.take_events();
        assert!(events
            .iter()
            .any(|e| e.tick == 3 && e.data == MatchEventData::PlayerKilled { victim_id: victim, killer_id: Some(pid(2)) }));
        assert!(world.entity(entity).unwrap().death_announced);

        step(&mut orch, &mut world, 4);
        assert!(!orch
            .take_events()
            .iter()
            .any(|e| matches!(e.data, MatchEventData::PlayerKilled { .. })));

        let killer = world.player(&pid(2)).unwrap();
        assert_eq!((killer.kills, killer.score), (1, 1));
        assert_eq!(world.player(&victim).unwrap().deaths, 1);
        let killer_team = killer.team_index.unwrap();
        assert_eq!(orch.roster().team(killer_team).map(|t| t.score), Some(1));
    }

    #[test]
    fn test_set_mode_becomes_configured_mode() {
        let mut world = world_with_players(2);
        let mut orch = MatchOrchestrator::new(config(MODE_DEATHMATCH));
        step(&mut orch, &mut world, 0);
        step(&mut orch, &mut world, 1);

        orch.set_mode(&mut world, MODE_ASSAULT);
        assert_eq!(orch.config().mode_name, MODE_ASSAULT);

        for tick in 2..6 {
            step(&mut orch, &mut world, tick);
            assert_eq!(orch.mode_name(), Some(MODE_ASSAULT), "tick {tick}");
        }
        assert!(matches!(orch.strategy(), GameModeStrategy::Assault(_)));
        assert_eq!(orch.roster().team_name(0), "Attackers");
    }

    #[test]
    fn test_suicide_credits_nobody() {
        let mut world = world_with_players(2);
        let mut orch = MatchOrchestrator::new(config(MODE_DEATHMATCH));
        step(&mut orch, &mut world, 0);
        step(&mut orch, &mut world, 1);
        orch.take_events();

        let victim = pid(1);
        let entity = world.player(&victim).unwrap().controlled_entity.unwrap();
        world.damage(entity, 1000.0, Some(victim), 2);
        step(&mut orch, &mut world, 2);

        let events = orch.take_events();
        assert!(events.iter().any(|e| e.data == MatchEventData::PlayerKilled { victim_id: victim, killer_id: None }));
        assert!(events.iter().any(|e| e.text().is_some_and(|t| t.contains("p1"))));
        assert_eq!(world.player(&victim).unwrap().kills, 0);
    }

    #[test]
    fn test_mode_change_rejoins_everyone() {
        let mut world = world_with_players(2);
        let mut orch = MatchOrchestrator::new(config(MODE_DEATHMATCH));
        step(&mut orch, &mut world, 0);
        step(&mut orch, &mut world, 1);
        assert_eq!(world.entities.len(), 2);

        orch.set_option("game.modename", MODE_ASSAULT).unwrap();
        step(&mut orch, &mut world, 2);
        assert_eq!(orch.mode_name(), Some(MODE_ASSAULT));
        assert!(world.entities.is_empty());
        assert!(world.players.values().all(|p| !p.joined_mode && p.team_index.is_none()));
        assert_eq!(orch.roster().team_name(0), "Attackers");

        step(&mut orch, &mut world, 3);
        assert!(world.players.values().all(|p| p.joined_mode && p.team_index.is_some()));
    }

    #[test]
    fn test_character_switch_requires_base() {
        let mut world = world_with_players(1);
        let mut orch = MatchOrchestrator::new(config(MODE_DEATHMATCH));
        step(&mut orch, &mut world, 0);
        step(&mut orch, &mut world, 1);

        let id = pid(1);
        assert!(!orch.request_character_switch(&mut world, id, CharacterKind(3)));

        world.player_mut(&id).unwrap().character_switch_allowed = true;
        assert!(orch.request_character_switch(&mut world, id, CharacterKind(3)));
        world.apply_commands(orch.take_commands());
        step(&mut orch, &mut world, 2);

        let entity = world.controlled_entity(&id).unwrap();
        assert_eq!(entity.kind, CharacterKind(3));
    }

    #[test]
    fn test_leave_despawns_entity() {
        let mut world = world_with_players(2);
        let mut orch = MatchOrchestrator::new(config(MODE_DEATHMATCH));
        step(&mut orch, &mut world, 0);
        step(&mut orch, &mut world, 1);

        let id = pid(1);
        let entity = world.player(&id).unwrap().controlled_entity.unwrap();
        orch.on_player_leave(&mut world, id);
        assert_eq!(orch.take_commands(), vec![EntityCommand::Despawn { entity }]);
    }
}
