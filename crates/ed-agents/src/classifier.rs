//! Rule-based intent classification.
//!
//! Maps free player text onto the closed [`Intent`] set through verb synonym
//! tables. Classification is total: anything that fits no pattern becomes
//! [`Intent::Unknown`], which the state machine treats as a no-op turn with a
//! clarification narrative. That fallback, not an error path, is what keeps
//! malformed input from ever crashing or corrupting a session.

use ed_core::{Direction, Intent};

/// Classifies raw command text into a structured intent.
///
/// Implementations must be pure and infallible. The rest of the system
/// depends only on the structured output, so a fancier implementation (an
/// LLM-backed one, say) can be swapped in without touching the state machine.
pub trait IntentClassifier: Send + Sync {
    /// Classify one raw command.
    fn classify(&self, raw: &str) -> Intent;
}

/// Verb synonyms for each intent category.
const MOVE_VERBS: &[&str] = &["go", "move", "walk", "head", "run", "travel"];
const TAKE_VERBS: &[&str] = &[
    "take", "get", "grab", "pick", "collect", "acquire", "obtain", "retrieve",
];
const DROP_VERBS: &[&str] = &["drop", "discard", "release"];
const EXAMINE_VERBS: &[&str] = &[
    "examine", "inspect", "look", "read", "check", "view", "describe", "x",
];
const USE_VERBS: &[&str] = &["use", "apply", "activate", "cast", "secure", "tie", "anchor"];
const INVENTORY_VERBS: &[&str] = &["inventory", "inv", "i", "items", "bag", "backpack"];
const EXIT_VERBS: &[&str] = &["exit", "escape"];

/// The default verb-table classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedClassifier;

impl RuleBasedClassifier {
    /// Create a classifier.
    pub fn new() -> Self {
        Self
    }
}

impl IntentClassifier for RuleBasedClassifier {
    fn classify(&self, raw: &str) -> Intent {
        classify_command(raw)
    }
}

/// Classify one raw command with the default verb tables.
pub fn classify_command(raw: &str) -> Intent {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Intent::Unknown {
            raw: raw.to_string(),
        };
    }

    let words: Vec<String> = trimmed
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    let verb = words[0].as_str();
    let rest = &words[1..];

    // Bare direction is implicit movement.
    if rest.is_empty()
        && let Some(direction) = Direction::parse(verb)
    {
        return Intent::Move { direction };
    }

    if MOVE_VERBS.contains(&verb) {
        return parse_move(trimmed, rest);
    }
    if TAKE_VERBS.contains(&verb) {
        return parse_take(trimmed, rest);
    }
    if DROP_VERBS.contains(&verb) {
        return parse_drop(trimmed, rest);
    }
    if EXAMINE_VERBS.contains(&verb) {
        return parse_examine(rest);
    }
    if USE_VERBS.contains(&verb) {
        return parse_use(trimmed, rest);
    }
    if INVENTORY_VERBS.contains(&verb) {
        return Intent::Inventory;
    }
    if EXIT_VERBS.contains(&verb) {
        return Intent::Exit;
    }
    // "leave" alone or "leave the cave" means exit; "leave <item>" drops it.
    if verb == "leave" {
        if rest.is_empty() || rest.iter().any(|w| w == "cave") {
            return Intent::Exit;
        }
        return parse_drop(trimmed, rest);
    }

    Intent::Unknown {
        raw: trimmed.to_string(),
    }
}

/// Targets naming several items at once ("rope and torch") are rejected
/// rather than guessed at.
fn is_compound(rest: &[String]) -> bool {
    rest.iter().any(|w| w == "and" || w.contains(','))
}

fn strip_leading(rest: &[String], fillers: &[&str]) -> Vec<String> {
    let mut rest = rest;
    while let Some(first) = rest.first() {
        if fillers.contains(&first.as_str()) {
            rest = &rest[1..];
        } else {
            break;
        }
    }
    rest.to_vec()
}

fn parse_move(raw: &str, rest: &[String]) -> Intent {
    let rest = strip_leading(rest, &["to", "the"]);
    match rest.first().and_then(|w| Direction::parse(w)) {
        Some(direction) => Intent::Move { direction },
        None => Intent::Unknown {
            raw: raw.to_string(),
        },
    }
}

fn parse_take(raw: &str, rest: &[String]) -> Intent {
    // "pick up the rope"
    let rest = strip_leading(rest, &["up"]);
    if rest.is_empty() || is_compound(&rest) {
        return Intent::Unknown {
            raw: raw.to_string(),
        };
    }
    Intent::Take {
        item: rest.join(" "),
    }
}

fn parse_drop(raw: &str, rest: &[String]) -> Intent {
    if rest.is_empty() || is_compound(rest) {
        return Intent::Unknown {
            raw: raw.to_string(),
        };
    }
    Intent::Drop {
        item: rest.join(" "),
    }
}

fn parse_examine(rest: &[String]) -> Intent {
    let rest = strip_leading(rest, &["at"]);
    if rest.is_empty() || rest == ["around"] {
        return Intent::Examine { target: None };
    }
    Intent::Examine {
        target: Some(rest.join(" ")),
    }
}

fn parse_use(raw: &str, rest: &[String]) -> Intent {
    if rest.is_empty() || is_compound(rest) {
        return Intent::Unknown {
            raw: raw.to_string(),
        };
    }
    // "use rope to cross": everything after the connective is motive, not
    // target.
    let target: Vec<String> = rest
        .iter()
        .take_while(|w| *w != "to" && *w != "on")
        .cloned()
        .collect();
    if target.is_empty() {
        return Intent::Unknown {
            raw: raw.to_string(),
        };
    }
    Intent::Use {
        target: target.join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_directions_move() {
        assert_eq!(
            classify_command("north"),
            Intent::Move {
                direction: Direction::North
            }
        );
        assert_eq!(
            classify_command("e"),
            Intent::Move {
                direction: Direction::East
            }
        );
    }

    #[test]
    fn verb_directions_move() {
        assert_eq!(
            classify_command("go north"),
            Intent::Move {
                direction: Direction::North
            }
        );
        assert_eq!(
            classify_command("walk to the east"),
            Intent::Move {
                direction: Direction::East
            }
        );
        assert_eq!(
            classify_command("head west"),
            Intent::Move {
                direction: Direction::West
            }
        );
    }

    #[test]
    fn move_without_direction_is_unknown() {
        assert_eq!(
            classify_command("go chasm"),
            Intent::Unknown {
                raw: "go chasm".into()
            }
        );
    }

    #[test]
    fn take_synonyms() {
        assert_eq!(
            classify_command("take magical rope"),
            Intent::Take {
                item: "magical rope".into()
            }
        );
        assert_eq!(
            classify_command("grab the shiny crystal"),
            Intent::Take {
                item: "the shiny crystal".into()
            }
        );
        assert_eq!(
            classify_command("pick up rope"),
            Intent::Take {
                item: "rope".into()
            }
        );
    }

    #[test]
    fn compound_take_degrades_to_unknown() {
        assert_eq!(
            classify_command("take rope and torch"),
            Intent::Unknown {
                raw: "take rope and torch".into()
            }
        );
        assert_eq!(
            classify_command("drop sword, shield"),
            Intent::Unknown {
                raw: "drop sword, shield".into()
            }
        );
    }

    #[test]
    fn drop_and_leave() {
        assert_eq!(
            classify_command("drop rope"),
            Intent::Drop {
                item: "rope".into()
            }
        );
        assert_eq!(
            classify_command("leave gold coins"),
            Intent::Drop {
                item: "gold coins".into()
            }
        );
        assert_eq!(classify_command("leave the cave"), Intent::Exit);
        assert_eq!(classify_command("leave"), Intent::Exit);
    }

    #[test]
    fn examine_forms() {
        assert_eq!(classify_command("look"), Intent::Examine { target: None });
        assert_eq!(
            classify_command("look around"),
            Intent::Examine { target: None }
        );
        assert_eq!(
            classify_command("look at the murals"),
            Intent::Examine {
                target: Some("the murals".into())
            }
        );
        assert_eq!(
            classify_command("examine crystal"),
            Intent::Examine {
                target: Some("crystal".into())
            }
        );
        assert_eq!(
            classify_command("read journal"),
            Intent::Examine {
                target: Some("journal".into())
            }
        );
    }

    #[test]
    fn use_forms() {
        assert_eq!(
            classify_command("use rope"),
            Intent::Use {
                target: "rope".into()
            }
        );
        assert_eq!(
            classify_command("use rope to cross"),
            Intent::Use {
                target: "rope".into()
            }
        );
        assert_eq!(
            classify_command("secure rope"),
            Intent::Use {
                target: "rope".into()
            }
        );
        assert_eq!(
            classify_command("cast illuminate"),
            Intent::Use {
                target: "illuminate".into()
            }
        );
    }

    #[test]
    fn inventory_synonyms() {
        for cmd in ["inventory", "inv", "i", "bag"] {
            assert_eq!(classify_command(cmd), Intent::Inventory, "{cmd}");
        }
    }

    #[test]
    fn exit_synonyms() {
        assert_eq!(classify_command("exit"), Intent::Exit);
        assert_eq!(classify_command("escape"), Intent::Exit);
    }

    #[test]
    fn nonsense_and_empty_are_unknown() {
        assert_eq!(
            classify_command("dance wildly"),
            Intent::Unknown {
                raw: "dance wildly".into()
            }
        );
        assert_eq!(classify_command(""), Intent::Unknown { raw: "".into() });
        assert_eq!(
            classify_command("   "),
            Intent::Unknown { raw: "   ".into() }
        );
    }

    #[test]
    fn classifier_trait_object_works() {
        let classifier: Box<dyn IntentClassifier> = Box::new(RuleBasedClassifier::new());
        assert_eq!(classifier.classify("inv"), Intent::Inventory);
    }
}
