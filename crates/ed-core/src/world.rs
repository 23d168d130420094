//! The fixed, read-only world graph: rooms, exits, and item placement.
//!
//! The world is injected into the state machine as an immutable value and is
//! never mutated at runtime; per-session changes (items taken or dropped) are
//! tracked on the [`Session`] instead. This keeps the graph safely shareable
//! across concurrently running sessions.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

use crate::error::{CoreError, CoreResult};
use crate::intent::Direction;
use crate::names;
use crate::session::Session;

/// Minimum similarity score for fuzzy name matching (0.0-1.0).
const FUZZY_THRESHOLD: f64 = 0.8;

/// Where an exit edge leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitTarget {
    /// Another room in the graph.
    Room(String),
    /// Out of the world entirely: the win boundary.
    Outside,
}

/// A directional exit from a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitEdge {
    /// Destination of the edge.
    pub to: ExitTarget,
    /// Temp flag that must be set on the session for the edge to be open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_flag: Option<String>,
}

impl ExitEdge {
    /// An unconditional edge to another room.
    pub fn to_room(id: impl Into<String>) -> Self {
        Self {
            to: ExitTarget::Room(id.into()),
            requires_flag: None,
        }
    }

    /// An edge to another room gated on a session temp flag.
    pub fn gated(id: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            to: ExitTarget::Room(id.into()),
            requires_flag: Some(flag.into()),
        }
    }

    /// The edge leading out of the world.
    pub fn outside() -> Self {
        Self {
            to: ExitTarget::Outside,
            requires_flag: None,
        }
    }
}

/// A room node in the world graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Canonical snake_case identifier.
    pub id: String,
    /// Title Case display name.
    pub name: String,
    /// Static descriptive text.
    pub description: String,
    /// Directional exits, ordered for deterministic narration.
    pub exits: BTreeMap<Direction, ExitEdge>,
    /// Items initially present in this room.
    pub items: Vec<String>,
}

/// The effect of using an item at a specific location.
///
/// This is the one mechanical effect items carry: enabling a temp flag that
/// opens a gated edge (the chasm crossing). Everything else about USE is
/// cosmetic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UseEffect {
    /// Room where the effect applies.
    pub at_room: String,
    /// Temp flag set on the session.
    pub sets_flag: String,
}

/// An item definition in the static world table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDef {
    /// Canonical snake_case identifier.
    pub id: String,
    /// Title Case display name.
    pub name: String,
    /// Static descriptive text.
    pub description: String,
    /// Whether taking this item triggers the collapse and is required to win.
    #[serde(default)]
    pub is_terminal_treasure: bool,
    /// Optional location-specific effect when used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_effect: Option<UseEffect>,
}

/// The central world model: rooms, items, and the entry/exit room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldGraph {
    /// Display name of the world.
    pub name: String,
    /// Room where new sessions start, and the only room with an outside edge.
    pub entry_room: String,
    rooms: HashMap<String, Room>,
    items: HashMap<String, ItemDef>,
}

impl WorldGraph {
    /// Build a world from room and item lists, validating its structure.
    pub fn new(
        name: impl Into<String>,
        entry_room: impl Into<String>,
        rooms: Vec<Room>,
        items: Vec<ItemDef>,
    ) -> CoreResult<Self> {
        let world = Self {
            name: name.into(),
            entry_room: entry_room.into(),
            rooms: rooms.into_iter().map(|r| (r.id.clone(), r)).collect(),
            items: items.into_iter().map(|i| (i.id.clone(), i)).collect(),
        };
        world.validate()?;
        Ok(world)
    }

    fn validate(&self) -> CoreResult<()> {
        if !self.rooms.contains_key(&self.entry_room) {
            return Err(CoreError::InconsistentWorld(format!(
                "entry room \"{}\" is not in the room table",
                self.entry_room
            )));
        }

        let mut outside_edges = 0;
        for room in self.rooms.values() {
            for edge in room.exits.values() {
                match &edge.to {
                    ExitTarget::Room(id) if !self.rooms.contains_key(id) => {
                        return Err(CoreError::InconsistentWorld(format!(
                            "room \"{}\" has an edge to unknown room \"{id}\"",
                            room.id
                        )));
                    }
                    ExitTarget::Outside => {
                        if room.id != self.entry_room {
                            return Err(CoreError::InconsistentWorld(format!(
                                "only the entry room may lead outside, found on \"{}\"",
                                room.id
                            )));
                        }
                        outside_edges += 1;
                    }
                    ExitTarget::Room(_) => {}
                }
            }
            for item_id in &room.items {
                if !self.items.contains_key(item_id) {
                    return Err(CoreError::InconsistentWorld(format!(
                        "room \"{}\" places unknown item \"{item_id}\"",
                        room.id
                    )));
                }
            }
        }
        if outside_edges != 1 {
            return Err(CoreError::InconsistentWorld(format!(
                "expected exactly one outside edge, found {outside_edges}"
            )));
        }

        let treasures = self
            .items
            .values()
            .filter(|i| i.is_terminal_treasure)
            .count();
        if treasures != 1 {
            return Err(CoreError::InconsistentWorld(format!(
                "expected exactly one terminal treasure, found {treasures}"
            )));
        }
        Ok(())
    }

    /// Look up a room by canonical identifier.
    pub fn room(&self, id: &str) -> CoreResult<&Room> {
        self.rooms
            .get(id)
            .ok_or_else(|| CoreError::UnknownRoom(id.to_string()))
    }

    /// Look up an item by canonical identifier.
    pub fn item(&self, id: &str) -> CoreResult<&ItemDef> {
        self.items
            .get(id)
            .ok_or_else(|| CoreError::UnknownItem(id.to_string()))
    }

    /// The single item whose acquisition triggers the collapse.
    pub fn terminal_treasure(&self) -> CoreResult<&ItemDef> {
        self.items
            .values()
            .find(|i| i.is_terminal_treasure)
            .ok_or_else(|| CoreError::InconsistentWorld("no terminal treasure".to_string()))
    }

    /// All room identifiers.
    pub fn room_ids(&self) -> impl Iterator<Item = &str> {
        self.rooms.keys().map(String::as_str)
    }

    /// Items currently available in a room for a given session.
    ///
    /// The static placement table is never mutated: availability is the
    /// initial placement minus items this session has taken, plus items it
    /// has dropped here.
    pub fn items_available(&self, room_id: &str, session: &Session) -> CoreResult<Vec<String>> {
        let room = self.room(room_id)?;
        let mut available: Vec<String> = room
            .items
            .iter()
            .filter(|id| !session.taken_items.contains(*id))
            .cloned()
            .collect();
        if let Some(dropped) = session.dropped_items.get(room_id) {
            for id in dropped {
                if !available.contains(id) {
                    available.push(id.clone());
                }
            }
        }
        Ok(available)
    }

    /// Resolve player-typed text against a list of candidate item identifiers.
    ///
    /// Matching order: exact canonical match, then shared-word match ("shiny
    /// crystal" finds `crystal_of_echoing_depths`), then fuzzy match for
    /// typos. Returns `None` when nothing clears the threshold.
    pub fn resolve_item<'a>(&self, input: &str, candidates: &'a [String]) -> Option<&'a String> {
        let canon = names::canonical(input);
        if let Some(exact) = candidates.iter().find(|id| **id == canon) {
            return Some(exact);
        }

        let input_words: Vec<&str> = canon
            .split('_')
            .filter(|w| !w.is_empty() && !matches!(*w, "the" | "a" | "an"))
            .collect();

        let mut best: Option<(&'a String, f64)> = None;
        for id in candidates {
            let id_words: Vec<&str> = id.split('_').collect();
            let overlap = input_words
                .iter()
                .filter(|w| id_words.contains(*w))
                .count();
            let fuzzy = jaro_winkler(&canon, id);
            let score = if overlap > 0 {
                // Shared words outrank pure string distance.
                1.0 + overlap as f64
            } else if fuzzy >= FUZZY_THRESHOLD {
                fuzzy
            } else {
                continue;
            };
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((id, score));
            }
        }
        best.map(|(id, _)| id)
    }
}

/// Build the Cave of Echoing Depths, the fixed five-room demo world.
pub fn cave_world() -> WorldGraph {
    let rooms = vec![
        Room {
            id: "cave_entrance".to_string(),
            name: "Cave Entrance".to_string(),
            description: "Weathered stone frames the mouth of the cave. Daylight \
                reaches only a few paces in before the dark swallows it. A coil of \
                rope left by some earlier explorer lies against the wall, and cold \
                air drifts up from the passages deeper in."
                .to_string(),
            exits: BTreeMap::from([
                (Direction::North, ExitEdge::to_room("hidden_alcove")),
                (Direction::East, ExitEdge::to_room("yawning_chasm")),
                (Direction::West, ExitEdge::outside()),
            ]),
            items: vec!["magical_rope".to_string()],
        },
        Room {
            id: "hidden_alcove".to_string(),
            name: "Hidden Alcove".to_string(),
            description: "A cramped side chamber, easy to miss from the entrance. \
                Someone camped here once: climbing gear and a grappling hook are \
                stacked in a corner beside a journal, its last entries written in \
                a shaking hand."
                .to_string(),
            exits: BTreeMap::from([(Direction::South, ExitEdge::to_room("cave_entrance"))]),
            items: vec![
                "climbing_gear".to_string(),
                "grappling_hook".to_string(),
                "explorers_journal".to_string(),
            ],
        },
        Room {
            id: "yawning_chasm".to_string(),
            name: "Yawning Chasm".to_string(),
            description: "The floor simply ends. A chasm splits the cave from wall \
                to wall, far too wide to jump, its bottom lost in blackness. On \
                the far side the passage continues east toward a faint blue glow."
                .to_string(),
            exits: BTreeMap::from([
                (Direction::West, ExitEdge::to_room("cave_entrance")),
                (
                    Direction::East,
                    ExitEdge::gated("crystal_treasury", "crossed_chasm"),
                ),
                (Direction::South, ExitEdge::to_room("collapsed_passage")),
            ]),
            items: vec![],
        },
        Room {
            id: "crystal_treasury".to_string(),
            name: "Crystal Treasury".to_string(),
            description: "The glow comes from a single crystal resting on a carved \
                pedestal at the chamber's heart. Faded murals cover the walls, \
                showing robed figures carrying the crystal in procession. Loose \
                gold coins glitter among the rubble at the pedestal's base."
                .to_string(),
            exits: BTreeMap::from([(Direction::West, ExitEdge::to_room("yawning_chasm"))]),
            items: vec![
                "crystal_of_echoing_depths".to_string(),
                "gold_coins".to_string(),
            ],
        },
        Room {
            id: "collapsed_passage".to_string(),
            name: "Collapsed Passage".to_string(),
            description: "Rubble chokes this passage floor to ceiling. Whatever lay \
                beyond is sealed off for good. There is nothing here but broken \
                stone and the way back north."
                .to_string(),
            exits: BTreeMap::from([(Direction::North, ExitEdge::to_room("yawning_chasm"))]),
            items: vec![],
        },
    ];

    let items = vec![
        ItemDef {
            id: "magical_rope".to_string(),
            name: "Magical Rope".to_string(),
            description: "A coil of silvery rope, lighter than it looks. It hums \
                faintly under your fingers and seems eager to hold a knot."
                .to_string(),
            is_terminal_treasure: false,
            use_effect: Some(UseEffect {
                at_room: "yawning_chasm".to_string(),
                sets_flag: "crossed_chasm".to_string(),
            }),
        },
        ItemDef {
            id: "climbing_gear".to_string(),
            name: "Climbing Gear".to_string(),
            description: "A harness, pitons, and chalk, all well used but sound. \
                Made for exactly the kind of wall this cave keeps throwing at you."
                .to_string(),
            is_terminal_treasure: false,
            use_effect: Some(UseEffect {
                at_room: "yawning_chasm".to_string(),
                sets_flag: "crossed_chasm".to_string(),
            }),
        },
        ItemDef {
            id: "grappling_hook".to_string(),
            name: "Grappling Hook".to_string(),
            description: "A three-pronged iron hook on a knotted line. The prongs \
                are scratched from hard landings."
                .to_string(),
            is_terminal_treasure: false,
            use_effect: Some(UseEffect {
                at_room: "yawning_chasm".to_string(),
                sets_flag: "crossed_chasm".to_string(),
            }),
        },
        ItemDef {
            id: "explorers_journal".to_string(),
            name: "Explorers Journal".to_string(),
            description: "The final entry reads: \"The crystal sits on a pressure \
                plate. The moment it lifts, the mountain will know. Cross back \
                fast, and whatever you do, don't run south.\""
                .to_string(),
            is_terminal_treasure: false,
            use_effect: None,
        },
        ItemDef {
            id: "crystal_of_echoing_depths".to_string(),
            name: "Crystal Of Echoing Depths".to_string(),
            description: "A fist-sized crystal pulsing with slow blue light, warm \
                to the touch. Whole civilizations are said to echo inside it."
                .to_string(),
            is_terminal_treasure: true,
            use_effect: None,
        },
        ItemDef {
            id: "gold_coins".to_string(),
            name: "Gold Coins".to_string(),
            description: "A scatter of old coinage stamped with a sigil no one \
                living would recognize. Heavy, and pleasantly so."
                .to_string(),
            is_terminal_treasure: false,
            use_effect: None,
        },
    ];

    WorldGraph::new("Cave of Echoing Depths", "cave_entrance", rooms, items)
        .expect("built-in world data is valid")
}
