//! Structured results of applying one intent to a session.
//!
//! Every in-game failure (blocked move, missing item, unrecognized command)
//! is an `Outcome` variant rather than an error, so the narration stage and
//! the tests can treat success and failure uniformly.

use serde::{Deserialize, Serialize};

use crate::intent::Direction;
use crate::session::{CharacterClass, DefeatReason, GameStatus};

/// Why a movement attempt was blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockedReason {
    /// The room has no exit in that direction.
    NoExit,
    /// The edge exists but is gated on a temp flag the session lacks.
    CrossingRequired {
        /// The flag that would open the edge.
        flag: String,
    },
    /// The edge leads out of the cave, and leaving empty-handed wins nothing.
    TreasureRequired,
}

/// Why a take attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TakeFailure {
    /// The item is not present in this room.
    NotHere,
    /// The item is already in the inventory.
    AlreadyHeld,
}

/// Why an explicit exit attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitRefusal {
    /// The player is not at the room that leads outside.
    NotAtExit,
    /// The player is at the exit but does not hold the treasure.
    TreasureMissing,
}

/// What happened when one intent was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Outcome {
    /// Movement succeeded.
    Arrived {
        /// Room the player arrived in.
        room: String,
        /// Whether this is the first visit.
        first_visit: bool,
    },
    /// Movement failed.
    Blocked {
        /// Direction that was attempted.
        direction: Direction,
        /// Why it failed.
        reason: BlockedReason,
    },
    /// The player left the cave with the treasure. Victory.
    Left,
    /// An explicit exit attempt was refused.
    ExitRefused {
        /// Why it was refused.
        reason: ExitRefusal,
    },
    /// An item was taken.
    Taken {
        /// The item taken.
        item: String,
        /// Whether this take started the collapse.
        triggered_collapse: bool,
    },
    /// A take attempt failed.
    TakeFailed {
        /// The name the player asked for.
        item: String,
        /// Why it failed.
        reason: TakeFailure,
    },
    /// An item was dropped.
    Dropped {
        /// The item dropped.
        item: String,
    },
    /// A drop attempt failed: the item is not held.
    DropFailed {
        /// The name the player asked for.
        item: String,
    },
    /// An examination produced descriptive text.
    Description {
        /// Display name of the thing described.
        target: String,
        /// The static description text.
        text: String,
        /// Items visible here, when the target is the current room.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        items_present: Vec<String>,
        /// Open directions, when the target is the current room.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        exits: Vec<Direction>,
    },
    /// The examined target resolved to nothing.
    NothingFound {
        /// The name the player asked for.
        target: String,
    },
    /// A class ability produced its flavor.
    AbilityUsed {
        /// The ability name.
        ability: String,
        /// The class that used it.
        class: CharacterClass,
    },
    /// A held item was used.
    ItemUsed {
        /// The item used.
        item: String,
        /// Flag enabled by the use, if the item has an effect here.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        enabled_flag: Option<String>,
    },
    /// The use target is neither a held item nor a known ability.
    UseFailed {
        /// The name the player asked for.
        target: String,
    },
    /// Inventory listing.
    InventoryList {
        /// Held items, in acquisition order.
        items: Vec<String>,
    },
    /// The command was not understood. The turn still advances.
    Unrecognized {
        /// The original input.
        raw: String,
    },
    /// The command's evaluation ended the game in defeat.
    Defeated {
        /// Why the game was lost.
        reason: DefeatReason,
    },
    /// A mutating command arrived after the game had already ended.
    Ended {
        /// The terminal status the session is in.
        status: GameStatus,
    },
}

impl Outcome {
    /// Whether this outcome represents a successful action from the
    /// player's point of view.
    pub fn is_success(&self) -> bool {
        !matches!(
            self,
            Self::Blocked { .. }
                | Self::ExitRefused { .. }
                | Self::TakeFailed { .. }
                | Self::DropFailed { .. }
                | Self::NothingFound { .. }
                | Self::UseFailed { .. }
                | Self::Unrecognized { .. }
                | Self::Defeated { .. }
                | Self::Ended { .. }
        )
    }
}
