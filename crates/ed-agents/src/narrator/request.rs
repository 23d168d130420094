//! The structured narration request handed to a provider.

use serde::{Deserialize, Serialize};

use ed_core::{CharacterClass, GameStatus, Outcome, Session, WorldGraph};
use ed_core::error::CoreResult;
use ed_core::names;

/// Everything a narration provider needs to turn one outcome into prose.
///
/// Built by [`NarrationRequest::compose`] from the post-transition session.
/// This is pure fact selection and ordering; no game-logic decisions are
/// made here, and the provider cannot influence state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrationRequest {
    /// The structured result of the command.
    pub event: Outcome,
    /// Display name of the player's current room.
    pub location_name: String,
    /// Static description of the current room.
    pub location_description: String,
    /// Display names of items held.
    pub inventory: Vec<String>,
    /// Character name.
    pub character_name: String,
    /// Character class, for flavor.
    pub character_class: CharacterClass,
    /// Whether the collapse has begun; shifts the narration's tone.
    pub collapse_active: bool,
    /// Commands processed since the collapse began.
    pub turns_since_collapse: u32,
    /// Game status after the command.
    pub game_status: GameStatus,
    /// Turn number of the command being narrated.
    pub turn: u32,
}

impl NarrationRequest {
    /// Compose a request from the post-transition session and its outcome.
    pub fn compose(session: &Session, outcome: &Outcome, world: &WorldGraph) -> CoreResult<Self> {
        let room = world.room(&session.location)?;
        Ok(Self {
            event: outcome.clone(),
            location_name: room.name.clone(),
            location_description: room.description.clone(),
            inventory: session.inventory.iter().map(|id| names::display(id)).collect(),
            character_name: session.character_name.clone(),
            character_class: session.character_class,
            collapse_active: session.collapse_triggered,
            turns_since_collapse: session.turns_since_collapse,
            game_status: session.game_status,
            turn: session.turn_count,
        })
    }
}
