//! Conversion between canonical snake_case identifiers and display names.
//!
//! Room and item identifiers are stored as snake_case (`cave_entrance`,
//! `magical_rope`) and rendered for the player in Title Case ("Cave
//! Entrance", "Magical Rope"). Player input arrives in either form.

/// Normalize a name to its canonical snake_case identifier form.
pub fn canonical(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace([' ', '-'], "_")
}

/// Render a canonical identifier as a Title Case display name.
pub fn display(id: &str) -> String {
    id.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_forms() {
        assert_eq!(canonical("Cave Entrance"), "cave_entrance");
        assert_eq!(canonical("  magical rope "), "magical_rope");
        assert_eq!(canonical("climbing-gear"), "climbing_gear");
        assert_eq!(canonical("crystal_treasury"), "crystal_treasury");
    }

    #[test]
    fn display_forms() {
        assert_eq!(display("cave_entrance"), "Cave Entrance");
        assert_eq!(display("crystal_of_echoing_depths"), "Crystal Of Echoing Depths");
        assert_eq!(display("rope"), "Rope");
    }

    #[test]
    fn round_trip() {
        for id in ["cave_entrance", "magical_rope", "gold_coins"] {
            assert_eq!(canonical(&display(id)), id);
        }
    }
}
