//! Deterministic template narration.
//!
//! The templates fully narrate every outcome on their own. They are the
//! guaranteed fallback when no external provider is configured or when one
//! fails, so the player always receives a response.

use ed_core::ability;
use ed_core::names;
use ed_core::{BlockedReason, CharacterClass, DefeatReason, ExitRefusal, GameStatus, TakeFailure};

use super::request::NarrationRequest;
use crate::error::AgentResult;

/// The deterministic template renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateNarrator;

impl TemplateNarrator {
    /// Create a template narrator.
    pub fn new() -> Self {
        Self
    }

    /// Render one narration request into prose.
    pub fn render(&self, request: &NarrationRequest) -> String {
        use ed_core::Outcome::*;

        let mut text = match &request.event {
            Arrived { first_visit, .. } => {
                if *first_visit {
                    format!(
                        "**{}**\n{}",
                        request.location_name, request.location_description
                    )
                } else {
                    format!(
                        "**{}**\nYou are back on familiar ground. {}",
                        request.location_name, request.location_description
                    )
                }
            }
            Blocked { direction, reason } => match reason {
                BlockedReason::NoExit => {
                    format!("You can't go {direction} from here.")
                }
                BlockedReason::CrossingRequired { .. } => format!(
                    "The chasm yawns at your feet, far too wide to jump. You'll need \
                     some way across before you can continue {direction}."
                ),
                BlockedReason::TreasureRequired => "You take a step toward the daylight, \
                     then stop. You did not come all this way to leave empty-handed."
                    .to_string(),
            },
            Left => victory_narrative(),
            ExitRefused { reason } => match reason {
                ExitRefusal::NotAtExit => {
                    "There is no way out of the cave from here.".to_string()
                }
                ExitRefusal::TreasureMissing => "You hesitate at the threshold. The \
                     crystal is still somewhere in the dark behind you."
                    .to_string(),
            },
            Taken {
                item,
                triggered_collapse,
            } => {
                let mut out = format!("You take the {}.", names::display(item));
                if *triggered_collapse {
                    out.push_str(&format!("\n{}", collapse_narrative()));
                }
                out
            }
            TakeFailed { item, reason } => match reason {
                TakeFailure::NotHere => {
                    format!("You don't see any {} here.", lower(item))
                }
                TakeFailure::AlreadyHeld => {
                    format!("You are already carrying the {}.", names::display(item))
                }
            },
            Dropped { item } => format!("You set down the {}.", names::display(item)),
            DropFailed { item } => {
                format!("You don't have a {} to drop.", lower(item))
            }
            Description {
                target,
                text,
                items_present,
                exits,
            } => {
                let mut out = format!("**{target}**\n{text}");
                for item in items_present {
                    out.push_str(&format!("\nYou see the {} here.", names::display(item)));
                }
                if !exits.is_empty() {
                    let list: Vec<&str> = exits.iter().map(|d| d.name()).collect();
                    out.push_str(&format!("\nExits: {}", list.join(", ")));
                }
                out
            }
            NothingFound { target } => {
                format!("You find nothing like \"{}\" here.", lower(target))
            }
            AbilityUsed { ability, class } => ability_flavor(*class, ability),
            ItemUsed { item, enabled_flag } => match enabled_flag.as_deref() {
                Some("crossed_chasm") => format!(
                    "You anchor the {} and haul yourself across the chasm, hand over \
                     hand above the dark. The far side holds your weight.",
                    names::display(item)
                ),
                Some(_) => format!(
                    "You put the {} to work, and the way ahead shifts open.",
                    names::display(item)
                ),
                None => format!(
                    "You turn the {} over in your hands. Nothing much happens.",
                    names::display(item)
                ),
            },
            UseFailed { target } => format!(
                "You have no {} to use, and no such trick up your sleeve.",
                lower(target)
            ),
            InventoryList { items } => {
                if items.is_empty() {
                    "You are carrying nothing.".to_string()
                } else {
                    let mut out = "You are carrying:".to_string();
                    for item in items {
                        out.push_str(&format!("\n  - {}", names::display(item)));
                    }
                    out
                }
            }
            Unrecognized { raw } => format!(
                "I don't understand \"{}\". Try commands like 'go north', \
                 'examine crystal', or 'take rope'.",
                raw.trim()
            ),
            Defeated { reason } => defeat_narrative(*reason),
            Ended { status } => match status {
                GameStatus::Victory => "The adventure is already won. The crystal is \
                     yours, and the cave is behind you."
                    .to_string(),
                GameStatus::Defeat => "The adventure has already ended. The cave keeps \
                     what it takes."
                    .to_string(),
                GameStatus::InProgress => "The adventure goes on.".to_string(),
            },
        };

        if let Some(urgency) = urgency_line(request) {
            text.push('\n');
            text.push_str(urgency);
        }
        text
    }

    /// The introduction shown when a new game starts.
    pub fn intro(&self, character_name: &str, class: CharacterClass, world_name: &str) -> String {
        format!(
            "**Welcome, {character_name} the {class}!**\n\
             You stand at the mouth of the {world_name}, a place whispered about \
             in tavern tales. Somewhere below rests the Crystal of Echoing Depths, \
             said to hold the memory of forgotten civilizations.\n\
             Your quest is simple but perilous: retrieve the crystal and escape \
             the cave alive. The last explorer to try left gear and notes behind, \
             and never came back.\n\
             Type 'look around' to survey your surroundings, or strike out with \
             commands like 'go north'."
        )
    }
}

fn lower(s: &str) -> String {
    names::display(s).to_lowercase()
}

fn ability_flavor(class: CharacterClass, ability_name: &str) -> String {
    ability::lookup(class, ability_name)
        .map(|a| a.flavor.to_string())
        .unwrap_or_else(|| format!("You call on {ability_name}, to little visible effect."))
}

/// Collapse tone, layered onto whatever else happened this turn.
fn urgency_line(request: &NarrationRequest) -> Option<&'static str> {
    if !request.collapse_active || request.game_status.is_terminal() {
        return None;
    }
    // The command that starts the collapse carries its own set piece.
    if matches!(
        request.event,
        ed_core::Outcome::Taken {
            triggered_collapse: true,
            ..
        }
    ) {
        return None;
    }
    Some(match request.turns_since_collapse {
        0..=2 => "A low rumble rolls through the stone around you.",
        3..=5 => "Dust sifts from the ceiling. The rumbling is getting closer.",
        _ => "The whole cave groans. Cracks are spreading across the walls.",
    })
}

fn collapse_narrative() -> String {
    "As the crystal lifts free, a deep rumbling wakes somewhere under the \
     mountain. The pedestal's pressure plate rises with a grinding of ancient \
     mechanisms. Dust rains from the ceiling — the cave does not mean to let \
     you keep it."
        .to_string()
}

fn victory_narrative() -> String {
    "You burst from the cave mouth into blessed daylight, the Crystal of \
     Echoing Depths clutched in your hands. It pulses warmly, its blue light \
     steady now, as if content to be carried. The treasure is yours. Well \
     done, brave adventurer!"
        .to_string()
}

fn defeat_narrative(reason: DefeatReason) -> String {
    match reason {
        DefeatReason::HealthDepleted => "Your strength fails you. Your vision dims \
             as you sink to the cold stone floor, and the darkness of the cave \
             closes in to claim another adventurer."
            .to_string(),
    }
}

#[async_trait::async_trait]
impl super::NarrationProvider for TemplateNarrator {
    async fn generate(&self, request: &NarrationRequest) -> AgentResult<String> {
        Ok(self.render(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed_core::world::cave_world;
    use ed_core::{Intent, Session, apply};

    fn narrate(intents: &[Intent]) -> (Session, String) {
        let world = cave_world();
        let mut session = Session::new("Throg", CharacterClass::Warrior, &world);
        let mut last = String::new();
        for intent in intents {
            let outcome = apply(&mut session, intent, &world).unwrap();
            let request = NarrationRequest::compose(&session, &outcome, &world).unwrap();
            last = TemplateNarrator::new().render(&request);
        }
        (session, last)
    }

    #[test]
    fn take_is_narrated_with_display_name() {
        let (_, text) = narrate(&[Intent::Take {
            item: "rope".into(),
        }]);
        assert!(text.contains("You take the Magical Rope."));
    }

    #[test]
    fn collapse_trigger_gets_the_set_piece() {
        let world = cave_world();
        let mut session = Session::new("Tess", CharacterClass::Rogue, &world);
        session.visit("crystal_treasury");
        let outcome = apply(
            &mut session,
            &Intent::Take {
                item: "crystal".into(),
            },
            &world,
        )
        .unwrap();
        let request = NarrationRequest::compose(&session, &outcome, &world).unwrap();
        let text = TemplateNarrator::new().render(&request);
        assert!(text.contains("Crystal Of Echoing Depths"));
        assert!(text.contains("rumbling"));
    }

    #[test]
    fn collapse_tone_colors_later_turns() {
        let (_session, text) = narrate(&[
            Intent::Take {
                item: "rope".into(),
            },
            Intent::Move {
                direction: ed_core::Direction::East,
            },
            Intent::Use {
                target: "rope".into(),
            },
            Intent::Move {
                direction: ed_core::Direction::East,
            },
            Intent::Take {
                item: "crystal".into(),
            },
            Intent::Examine { target: None },
        ]);
        assert!(text.contains("rumble"));
    }

    #[test]
    fn blocked_moves_read_as_in_world_failures() {
        let (_, text) = narrate(&[Intent::Move {
            direction: ed_core::Direction::South,
        }]);
        assert!(text.contains("can't go south"));
    }

    #[test]
    fn unknown_commands_get_a_clarification() {
        let (_, text) = narrate(&[Intent::Unknown {
            raw: "dance wildly".into(),
        }]);
        assert!(text.contains("dance wildly"));
        assert!(text.contains("go north"));
    }

    #[test]
    fn inventory_listing() {
        let (_, text) = narrate(&[
            Intent::Take {
                item: "rope".into(),
            },
            Intent::Inventory,
        ]);
        assert!(text.contains("Magical Rope"));

        let (_, text) = narrate(&[Intent::Inventory]);
        assert!(text.contains("carrying nothing"));
    }

    #[test]
    fn victory_and_terminal_narration() {
        let intents = [
            Intent::Take {
                item: "rope".into(),
            },
            Intent::Move {
                direction: ed_core::Direction::East,
            },
            Intent::Use {
                target: "rope".into(),
            },
            Intent::Move {
                direction: ed_core::Direction::East,
            },
            Intent::Take {
                item: "crystal".into(),
            },
            Intent::Move {
                direction: ed_core::Direction::West,
            },
            Intent::Move {
                direction: ed_core::Direction::West,
            },
            Intent::Exit,
        ];
        let (session, text) = narrate(&intents);
        assert_eq!(session.game_status, GameStatus::Victory);
        assert!(text.contains("daylight"));

        // One more command: the ending is restated, not re-run.
        let world = cave_world();
        let mut session = session;
        let outcome = apply(
            &mut session,
            &Intent::Move {
                direction: ed_core::Direction::East,
            },
            &world,
        )
        .unwrap();
        let request = NarrationRequest::compose(&session, &outcome, &world).unwrap();
        let text = TemplateNarrator::new().render(&request);
        assert!(text.contains("already won"));
    }

    #[test]
    fn intro_mentions_the_quest() {
        let text = TemplateNarrator::new().intro("Throg", CharacterClass::Warrior, "Cave of Echoing Depths");
        assert!(text.contains("Throg"));
        assert!(text.contains("Warrior"));
        assert!(text.contains("crystal"));
    }
}
