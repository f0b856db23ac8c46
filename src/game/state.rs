//! Match World State
//!
//! Player records, controlled entities and the in-memory store that owns them.
//! Uses BTreeMap for deterministic iteration order.
//!
//! The match engine reads and mutates player fields but never creates or
//! removes players, and touches entities only through [`EntityCommand`]s
//! that [`MatchWorld::apply_commands`] executes after the tick.

use std::collections::BTreeMap;
use std::fmt;
use serde::{Serialize, Deserialize};
use tracing::{debug, warn};

use crate::core::clock::Tick;
use crate::core::vec3::{Quat, Transform, Vec3};
use crate::game::command::EntityCommand;
use crate::game::level::LevelContent;

// =============================================================================
// PLAYER ID
// =============================================================================

/// Unique player identifier (UUID as bytes).
///
/// Implements Ord for deterministic BTreeMap ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub [u8; 16]);

impl PlayerId {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Create from UUID string.
    pub fn from_uuid_str(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s)
            .ok()
            .map(|u| Self(*u.as_bytes()))
    }

    /// Create a random (v4) id.
    pub fn random() -> Self {
        Self(*uuid::Uuid::new_v4().as_bytes())
    }

    /// Convert to UUID string.
    pub fn to_uuid_string(&self) -> String {
        uuid::Uuid::from_bytes(self.0).to_string()
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0[..4]))
    }
}

// =============================================================================
// ENTITIES
// =============================================================================

/// Opaque handle to an entity in the entity store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Character archetype a player spawns as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CharacterKind(pub u16);

/// Entity as seen by the match engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    /// Entity handle
    pub id: EntityId,
    /// Controlling player
    pub owner: PlayerId,
    /// Spawned character
    pub kind: CharacterKind,
    /// World position
    pub position: Vec3,
    /// World rotation
    pub rotation: Quat,
    /// Current health; zero means dead
    pub health: f32,
    /// Tick the entity died on. `None` while alive, and also for forced
    /// round-end kills, which skip the respawn countdown.
    pub death_tick: Option<Tick>,
    /// Player credited with the kill
    pub killed_by: Option<PlayerId>,
    /// The match engine has already scored this death
    #[serde(default)]
    pub death_announced: bool,
}

impl EntityState {
    /// Is the entity alive?
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }
}

// =============================================================================
// PLAYER STATE
// =============================================================================

/// Per-player match record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Unique player ID
    pub id: PlayerId,

    /// Name shown in announcements
    pub name: String,

    /// Assigned team, `None` until the active mode assigns one
    pub team_index: Option<usize>,

    /// Entity this player currently controls
    pub controlled_entity: Option<EntityId>,

    /// Character spawned on next respawn
    pub character: CharacterKind,

    /// Match score
    pub score: i32,

    /// Kills this match
    pub kills: u32,

    /// Deaths this match
    pub deaths: u32,

    // =========================================================================
    // Presentation
    // =========================================================================

    /// Show the results screen
    pub display_result: bool,

    /// Result headline ("VICTORY", "DEFEAT", "DRAW")
    pub result_text: String,

    /// Objective text
    pub goal_text: String,

    /// Objective progress in [0, 1]; -1 hides the bar
    pub goal_completion: f32,

    /// Attackers on the objective
    pub goal_attackers: u32,

    /// Defenders on the objective
    pub goal_defenders: u32,

    /// Attacker team color for the objective widget
    pub goal_attacker_color: String,

    /// Defender team color for the objective widget
    pub goal_defender_color: String,

    /// Player stands where character switching is allowed
    pub character_switch_allowed: bool,

    /// The active mode has processed this player's join
    pub joined_mode: bool,
}

impl PlayerState {
    /// Goal completion value that hides the objective bar.
    pub const NO_GOAL: f32 = -1.0;

    /// Create a player that has not joined the active mode yet.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            team_index: None,
            controlled_entity: None,
            character: CharacterKind::default(),
            score: 0,
            kills: 0,
            deaths: 0,
            display_result: false,
            result_text: String::new(),
            goal_text: String::new(),
            goal_completion: Self::NO_GOAL,
            goal_attackers: 0,
            goal_defenders: 0,
            goal_attacker_color: String::new(),
            goal_defender_color: String::new(),
            character_switch_allowed: false,
            joined_mode: false,
        }
    }

    /// Reset score, result and objective display to match-start values.
    pub fn reset_match_stats(&mut self) {
        self.score = 0;
        self.kills = 0;
        self.deaths = 0;
        self.display_result = false;
        self.result_text.clear();
        self.goal_text.clear();
        self.goal_completion = Self::NO_GOAL;
        self.goal_attackers = 0;
        self.goal_defenders = 0;
    }

    /// Show the results screen with `text`.
    pub fn show_result(&mut self, text: &str) {
        self.display_result = true;
        self.result_text = text.to_string();
    }
}

// =============================================================================
// MATCH WORLD
// =============================================================================

/// In-memory player registry and entity store.
///
/// Stands in for the host engine: it owns players and entities, and executes
/// the deferred commands the match engine emits.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchWorld {
    /// All players (BTreeMap for deterministic iteration)
    pub players: BTreeMap<PlayerId, PlayerState>,

    /// All live entities
    pub entities: BTreeMap<EntityId, EntityState>,

    /// Level geometry
    pub level: LevelContent,

    /// Health given to freshly spawned characters
    pub max_health: f32,

    /// Next entity handle (monotonic counter)
    next_entity_id: u32,
}

impl MatchWorld {
    /// Default health of a spawned character.
    pub const DEFAULT_MAX_HEALTH: f32 = 100.0;

    /// Create an empty world for `level`.
    pub fn new(level: LevelContent) -> Self {
        Self {
            players: BTreeMap::new(),
            entities: BTreeMap::new(),
            level,
            max_health: Self::DEFAULT_MAX_HEALTH,
            next_entity_id: 1,
        }
    }

    /// Register a connecting player.
    pub fn add_player(&mut self, id: PlayerId, name: impl Into<String>) {
        self.players.insert(id, PlayerState::new(id, name));
    }

    /// Remove a player record. Its entity, if any, is left to a despawn command.
    pub fn remove_player(&mut self, id: &PlayerId) -> Option<PlayerState> {
        self.players.remove(id)
    }

    /// Get a player by ID.
    pub fn player(&self, id: &PlayerId) -> Option<&PlayerState> {
        self.players.get(id)
    }

    /// Get a player mutably by ID.
    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut PlayerState> {
        self.players.get_mut(id)
    }

    /// Get an entity by handle.
    pub fn entity(&self, id: EntityId) -> Option<&EntityState> {
        self.entities.get(&id)
    }

    /// Entity controlled by `player`, alive or dead.
    pub fn controlled_entity(&self, player: &PlayerId) -> Option<&EntityState> {
        self.players
            .get(player)
            .and_then(|p| p.controlled_entity)
            .and_then(|e| self.entities.get(&e))
    }

    /// Position of `player`'s entity while it is alive.
    pub fn live_position(&self, player: &PlayerId) -> Option<Vec3> {
        self.controlled_entity(player)
            .filter(|e| e.is_alive())
            .map(|e| e.position)
    }

    /// Number of players the active mode has processed.
    pub fn joined_count(&self) -> usize {
        self.players.values().filter(|p| p.joined_mode).count()
    }

    /// Apply damage from `attacker`; records the death tick when health hits zero.
    ///
    /// Returns true if this damage killed the entity.
    pub fn damage(&mut self, entity: EntityId, amount: f32, attacker: Option<PlayerId>, now: Tick) -> bool {
        let Some(state) = self.entities.get_mut(&entity) else {
            return false;
        };
        if !state.is_alive() {
            return false;
        }

        state.health = (state.health - amount).max(0.0);
        if state.is_alive() {
            return false;
        }
        state.death_tick = Some(now);
        state.killed_by = attacker;
        true
    }

    /// Move an entity.
    pub fn set_position(&mut self, entity: EntityId, position: Vec3) {
        if let Some(state) = self.entities.get_mut(&entity) {
            state.position = position;
        }
    }

    /// Execute deferred commands emitted by the match engine.
    pub fn apply_commands(&mut self, commands: impl IntoIterator<Item = EntityCommand>) {
        for command in commands {
            match command {
                EntityCommand::Spawn { kind, transform, owner } => self.spawn(kind, transform, owner),
                EntityCommand::Despawn { entity } => {
                    if self.entities.remove(&entity).is_none() {
                        debug!(entity = entity.0, "despawn of unknown entity");
                    }
                    for player in self.players.values_mut() {
                        if player.controlled_entity == Some(entity) {
                            player.controlled_entity = None;
                        }
                    }
                }
                EntityCommand::Kill { entity } => {
                    if let Some(state) = self.entities.get_mut(&entity) {
                        state.health = 0.0;
                        state.death_tick = None;
                        state.killed_by = None;
                    }
                }
            }
        }
    }

    fn spawn(&mut self, kind: CharacterKind, transform: Transform, owner: PlayerId) {
        let Some(player) = self.players.get_mut(&owner) else {
            warn!(%owner, "spawn requested for unknown player");
            return;
        };

        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;

        if let Some(previous) = player.controlled_entity.replace(id) {
            warn!(%owner, previous = previous.0, "player already controlled an entity");
            self.entities.remove(&previous);
        }

        self.entities.insert(id, EntityState {
            id,
            owner,
            kind,
            position: transform.position,
            rotation: transform.rotation,
            health: self.max_health,
            death_tick: None,
            killed_by: None,
            death_announced: false,
        });
    }
}

// =============================================================================
// TESTS
// =============================================================================
