//! The session record: the complete mutable state of one playthrough.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intent::Intent;
use crate::world::WorldGraph;

/// Starting health for a new character.
const STARTING_HEALTH: i32 = 20;

/// Game status states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// The session is live and accepting commands.
    InProgress,
    /// The player escaped with the treasure. Terminal.
    Victory,
    /// The player was defeated. Terminal.
    Defeat,
}

impl GameStatus {
    /// Whether this status is terminal (absorbing).
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Reasons for game defeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefeatReason {
    /// Health reached zero.
    HealthDepleted,
}

/// Character classes. Cosmetic only: a class selects flavor text and an
/// ability name, never a mechanical advantage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    /// Strength-themed flavor.
    Warrior,
    /// Magic-themed flavor.
    Wizard,
    /// Stealth-themed flavor.
    Rogue,
    /// The classless default.
    #[default]
    Adventurer,
}

impl CharacterClass {
    /// Parse a class from player input, falling back to the default.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "warrior" => Self::Warrior,
            "wizard" => Self::Wizard,
            "rogue" => Self::Rogue,
            _ => Self::Adventurer,
        }
    }

    /// Display name for the class.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Warrior => "Warrior",
            Self::Wizard => "Wizard",
            Self::Rogue => "Rogue",
            Self::Adventurer => "Adventurer",
        }
    }
}

impl std::fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A clamped health track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Current value, clamped to `0..=max`.
    pub current: i32,
    /// Maximum value.
    pub max: i32,
}

impl Health {
    /// A full track with the given maximum.
    pub fn full(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Reduce health by `amount`, clamping at zero. Returns the new value.
    pub fn deplete(&mut self, amount: i32) -> i32 {
        self.current = (self.current - amount).clamp(0, self.max);
        self.current
    }

    /// Whether the track has reached zero.
    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }
}

impl std::fmt::Display for Health {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.current, self.max)
    }
}

/// One entry in the append-only command history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// Turn number the command was processed on.
    pub turn: u32,
    /// The raw text the player submitted.
    pub raw: String,
    /// The intent it was classified as.
    pub intent: Intent,
}

/// The complete mutable state of one playthrough.
///
/// Mutated exclusively by [`crate::engine::apply`], one command at a time.
/// The invariants (valid location, duplicate-free inventory, monotonic
/// status/turn/collapse fields) are maintained by the engine; the fields are
/// public so that stores and tests can construct and inspect sessions freely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque unique identifier.
    pub session_id: String,
    /// Display name of the character.
    pub character_name: String,
    /// Cosmetic character class.
    pub character_class: CharacterClass,
    /// Current room identifier. Always a node of the world graph.
    pub location: String,
    /// Held items, duplicate-free, in acquisition order.
    pub inventory: Vec<String>,
    /// Items this session has removed from their original rooms.
    pub taken_items: BTreeSet<String>,
    /// Items this session has dropped, by the room they were dropped in.
    pub dropped_items: BTreeMap<String, Vec<String>>,
    /// Puzzle flags not captured by location or inventory.
    pub temp_flags: BTreeMap<String, bool>,
    /// Character health. Defeat triggers when it reaches zero.
    pub health: Health,
    /// Set once when the terminal treasure is first taken; never reset.
    pub collapse_triggered: bool,
    /// Commands processed since the collapse began. Informational only.
    pub turns_since_collapse: u32,
    /// Total commands processed, of any kind.
    pub turn_count: u32,
    /// Current game status.
    pub game_status: GameStatus,
    /// Why the game was lost, when it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defeat_reason: Option<DefeatReason>,
    /// Append-only log of processed commands.
    pub command_history: Vec<CommandRecord>,
    /// Rooms entered so far, in first-visit order.
    pub visited_rooms: Vec<String>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session was last mutated or persisted.
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a fresh session at the world's entry room.
    pub fn new(character_name: impl Into<String>, class: CharacterClass, world: &WorldGraph) -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4().to_string(),
            character_name: character_name.into(),
            character_class: class,
            location: world.entry_room.clone(),
            inventory: Vec::new(),
            taken_items: BTreeSet::new(),
            dropped_items: BTreeMap::new(),
            temp_flags: BTreeMap::new(),
            health: Health::full(STARTING_HEALTH),
            collapse_triggered: false,
            turns_since_collapse: 0,
            turn_count: 0,
            game_status: GameStatus::InProgress,
            defeat_reason: None,
            command_history: Vec::new(),
            visited_rooms: vec![world.entry_room.clone()],
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the session has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.game_status.is_terminal()
    }

    /// Whether the player holds an item.
    pub fn has_item(&self, item_id: &str) -> bool {
        self.inventory.iter().any(|id| id == item_id)
    }

    /// Add an item to the inventory. No-op if already held.
    pub fn add_item(&mut self, item_id: impl Into<String>) {
        let item_id = item_id.into();
        if !self.has_item(&item_id) {
            self.inventory.push(item_id);
        }
    }

    /// Remove an item from the inventory. Returns whether it was held.
    pub fn remove_item(&mut self, item_id: &str) -> bool {
        if let Some(pos) = self.inventory.iter().position(|id| id == item_id) {
            self.inventory.remove(pos);
            true
        } else {
            false
        }
    }

    /// Check a temp flag, defaulting to false.
    pub fn flag(&self, name: &str) -> bool {
        self.temp_flags.get(name).copied().unwrap_or(false)
    }

    /// Set a temp flag.
    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        self.temp_flags.insert(name.into(), value);
    }

    /// Record arrival in a room, tracking first visits.
    pub fn visit(&mut self, room_id: impl Into<String>) {
        let room_id = room_id.into();
        if !self.visited_rooms.contains(&room_id) {
            self.visited_rooms.push(room_id.clone());
        }
        self.location = room_id;
    }

    /// Apply damage from a narrative event. The default command path never
    /// calls this; defeat is evaluated by the engine on every command.
    pub fn apply_damage(&mut self, amount: i32) {
        self.health.deplete(amount);
    }

    /// Append a processed command to the history log.
    pub fn record_command(&mut self, raw: impl Into<String>, intent: Intent) {
        self.command_history.push(CommandRecord {
            turn: self.turn_count,
            raw: raw.into(),
            intent,
        });
    }
}
