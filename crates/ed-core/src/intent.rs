//! Player intents: the structured output contract of the intent classifier.

use serde::{Deserialize, Serialize};

/// Direction for movement commands.
///
/// The cave graph only uses the four cardinal directions; vertical movement
/// does not exist in this world and parses as an unknown command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// North.
    North,
    /// South.
    South,
    /// East.
    East,
    /// West.
    West,
}

impl Direction {
    /// Parse a direction from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "n" | "north" => Some(Self::North),
            "s" | "south" => Some(Self::South),
            "e" | "east" => Some(Self::East),
            "w" | "west" => Some(Self::West),
            _ => None,
        }
    }

    /// Get the display name for this direction.
    pub fn name(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified player command.
///
/// Classification never fails: input that fits no category becomes
/// [`Intent::Unknown`], which the state machine treats as a no-op turn with
/// a clarification narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    /// Move in a cardinal direction.
    Move {
        /// The direction to move.
        direction: Direction,
    },
    /// Take an item from the current room.
    Take {
        /// The item name as the player typed it.
        item: String,
    },
    /// Drop a held item into the current room.
    Drop {
        /// The item name as the player typed it.
        item: String,
    },
    /// Examine the surroundings or a specific target.
    Examine {
        /// Target to examine; `None` means "look around".
        target: Option<String>,
    },
    /// Use an item or invoke a class ability.
    Use {
        /// The item or ability name as the player typed it.
        target: String,
    },
    /// List the inventory.
    Inventory,
    /// Leave the cave, the explicit victory action.
    Exit,
    /// Unrecognized command.
    Unknown {
        /// The original input.
        raw: String,
    },
}

impl Intent {
    /// Whether this intent can mutate session state beyond the turn counter.
    ///
    /// Read-only intents remain permitted after the game has ended.
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Self::Examine { .. } | Self::Inventory | Self::Unknown { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_directions() {
        assert_eq!(Direction::parse("north"), Some(Direction::North));
        assert_eq!(Direction::parse("N"), Some(Direction::North));
        assert_eq!(Direction::parse("w"), Some(Direction::West));
        assert_eq!(Direction::parse("up"), None);
        assert_eq!(Direction::parse("chasm"), None);
    }

    #[test]
    fn mutating_split() {
        assert!(Intent::Move { direction: Direction::East }.is_mutating());
        assert!(Intent::Exit.is_mutating());
        assert!(!Intent::Inventory.is_mutating());
        assert!(!Intent::Examine { target: None }.is_mutating());
        assert!(!Intent::Unknown { raw: "dance".into() }.is_mutating());
    }

    #[test]
    fn intent_serialization_is_tagged() {
        let intent = Intent::Take { item: "rope".into() };
        let json = serde_json::to_string(&intent).unwrap();
        assert!(json.contains("\"kind\":\"take\""));
        let back: Intent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, intent);
    }
}
