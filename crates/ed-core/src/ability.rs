//! The per-class cosmetic ability table.
//!
//! Each class knows one named ability. Using it produces flavor text and
//! nothing else: no cooldowns, no resource costs, no mechanical effect. The
//! table exists to give the narration stage class-specific color.

use crate::names;
use crate::session::CharacterClass;

/// A class ability entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ability {
    /// Canonical ability name.
    pub name: &'static str,
    /// Flavor line narrated on use.
    pub flavor: &'static str,
}

/// Abilities known by each class.
pub fn abilities_for(class: CharacterClass) -> &'static [Ability] {
    match class {
        CharacterClass::Warrior => &[Ability {
            name: "dash",
            flavor: "You burst forward with warrior speed!",
        }],
        CharacterClass::Wizard => &[Ability {
            name: "illuminate",
            flavor: "Magical light blooms from your fingertips, pushing back the dark.",
        }],
        CharacterClass::Rogue => &[Ability {
            name: "sneak",
            flavor: "You melt into the shadows, moving without a sound.",
        }],
        CharacterClass::Adventurer => &[],
    }
}

/// Look up an ability by player-typed name for a class.
///
/// Matches the canonical form, so "use Illuminate" and "cast illuminate"
/// both resolve for a wizard. Returns `None` when the class does not know
/// the name; the caller then falls through to item handling.
pub fn lookup(class: CharacterClass, target: &str) -> Option<&'static Ability> {
    let canon = names::canonical(target);
    abilities_for(class).iter().find(|a| a.name == canon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_class_knows_its_ability() {
        assert!(lookup(CharacterClass::Warrior, "dash").is_some());
        assert!(lookup(CharacterClass::Wizard, "illuminate").is_some());
        assert!(lookup(CharacterClass::Rogue, "sneak").is_some());
    }

    #[test]
    fn abilities_do_not_cross_classes() {
        assert!(lookup(CharacterClass::Warrior, "illuminate").is_none());
        assert!(lookup(CharacterClass::Rogue, "dash").is_none());
        assert!(lookup(CharacterClass::Adventurer, "dash").is_none());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(lookup(CharacterClass::Wizard, "Illuminate").is_some());
        assert!(lookup(CharacterClass::Warrior, " DASH ").is_some());
    }
}
