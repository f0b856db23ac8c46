//! Match Configuration
//!
//! String-keyed match options, read by the orchestrator every tick.
//! Keys follow the console naming (`game.dm.roundlength` etc.) so the same
//! names work in JSON files, environment overrides and runtime `set` calls.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mode name selecting team deathmatch.
pub const MODE_DEATHMATCH: &str = "deathmatch";

/// Mode name selecting the capture-point assault mode.
pub const MODE_ASSAULT: &str = "assault";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key is not a recognized option.
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Value could not be parsed for the key.
    #[error("invalid value {value:?} for {key}")]
    InvalidValue {
        /// Option key
        key: String,
        /// Rejected value
        value: String,
    },

    /// JSON document could not be decoded.
    #[error("invalid config document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Match options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Seconds a dead player waits before respawning.
    #[serde(rename = "game.respawndelay")]
    pub respawn_delay: i32,

    /// Active game mode name.
    #[serde(rename = "game.modename")]
    pub mode_name: String,

    /// Players needed before a deathmatch round starts.
    #[serde(rename = "game.dm.minplayers")]
    pub dm_min_players: i32,

    /// Deathmatch countdown length (seconds).
    #[serde(rename = "game.dm.prematchtime")]
    pub dm_prematch_time: i32,

    /// Deathmatch results screen length (seconds).
    #[serde(rename = "game.dm.postmatchtime")]
    pub dm_postmatch_time: i32,

    /// Deathmatch round length (seconds).
    #[serde(rename = "game.dm.roundlength")]
    pub dm_round_length: i32,

    /// Players needed before an assault round starts.
    #[serde(rename = "game.assault.minplayers")]
    pub assault_min_players: i32,

    /// Assault round length (seconds).
    #[serde(rename = "game.assault.roundlength")]
    pub assault_round_length: i32,

    /// Assault pre-game length (seconds).
    #[serde(rename = "game.assault.prematchtime")]
    pub assault_prematch_time: i32,

    /// Assault results screen length (seconds).
    #[serde(rename = "game.assault.postmatchtime")]
    pub assault_postmatch_time: i32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            respawn_delay: 5,
            mode_name: MODE_DEATHMATCH.to_string(),
            dm_min_players: 2,
            dm_prematch_time: 10,
            dm_postmatch_time: 10,
            dm_round_length: 300,
            assault_min_players: 2,
            assault_round_length: 600,
            assault_prematch_time: 10,
            assault_postmatch_time: 10,
        }
    }
}

impl MatchConfig {
    /// Every recognized option key.
    pub const KEYS: [&'static str; 10] = [
        "game.respawndelay",
        "game.modename",
        "game.dm.minplayers",
        "game.dm.prematchtime",
        "game.dm.postmatchtime",
        "game.dm.roundlength",
        "game.assault.minplayers",
        "game.assault.roundlength",
        "game.assault.prematchtime",
        "game.assault.postmatchtime",
    ];

    /// Parse a JSON object keyed by option names. Missing keys keep defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Defaults with `GAME_*` environment overrides applied.
    ///
    /// `GAME_MODENAME` maps to `game.modename`, `GAME_DM_ROUNDLENGTH` to
    /// `game.dm.roundlength`, and so on. Unparsable values are skipped.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        for key in Self::KEYS {
            let var = key.replace('.', "_").to_uppercase();
            if let Ok(value) = std::env::var(&var) {
                if let Err(err) = config.set(key, &value) {
                    tracing::warn!(%var, %err, "ignoring config override");
                }
            }
        }
        config
    }

    /// Set one option from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        if key == "game.modename" {
            self.mode_name = value.trim().to_string();
            return Ok(());
        }

        let slot = match key {
            "game.respawndelay" => &mut self.respawn_delay,
            "game.dm.minplayers" => &mut self.dm_min_players,
            "game.dm.prematchtime" => &mut self.dm_prematch_time,
            "game.dm.postmatchtime" => &mut self.dm_postmatch_time,
            "game.dm.roundlength" => &mut self.dm_round_length,
            "game.assault.minplayers" => &mut self.assault_min_players,
            "game.assault.roundlength" => &mut self.assault_round_length,
            "game.assault.prematchtime" => &mut self.assault_prematch_time,
            "game.assault.postmatchtime" => &mut self.assault_postmatch_time,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };

        *slot = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })?;
        Ok(())
    }

    /// Read one option back as a string.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "game.modename" => return Some(self.mode_name.clone()),
            "game.respawndelay" => self.respawn_delay,
            "game.dm.minplayers" => self.dm_min_players,
            "game.dm.prematchtime" => self.dm_prematch_time,
            "game.dm.postmatchtime" => self.dm_postmatch_time,
            "game.dm.roundlength" => self.dm_round_length,
            "game.assault.minplayers" => self.assault_min_players,
            "game.assault.roundlength" => self.assault_round_length,
            "game.assault.prematchtime" => self.assault_prematch_time,
            "game.assault.postmatchtime" => self.assault_postmatch_time,
            _ => return None,
        };
        Some(value.to_string())
    }
}
