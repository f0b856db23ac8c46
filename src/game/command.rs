//! Deferred Entity Commands
//!
//! The match engine never creates or destroys entities itself. It queues
//! commands during a tick; the entity store applies them after the tick so
//! that iteration over live players and entities is never invalidated.

use serde::{Serialize, Deserialize};

use crate::core::vec3::Transform;
use crate::game::state::{CharacterKind, EntityId, PlayerId};

/// A request for the entity store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EntityCommand {
    /// Spawn a character for `owner` at `transform`.
    Spawn {
        /// Character to spawn
        kind: CharacterKind,
        /// Spawn transform
        transform: Transform,
        /// Player who will control the entity
        owner: PlayerId,
    },

    /// Remove an entity.
    Despawn {
        /// Entity to remove
        entity: EntityId,
    },

    /// Set an entity's health to zero without starting a respawn countdown.
    Kill {
        /// Entity to kill
        entity: EntityId,
    },
}
