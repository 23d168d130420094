//! Start a new saved game.

use std::path::Path;

use colored::Colorize;

use ed_agents::narrator::Narrator;
use ed_core::CharacterClass;

/// Create and persist a fresh session, printing the intro and its id.
pub async fn run(name: &str, class: &str, store_dir: &Path) -> Result<(), String> {
    let orchestrator = super::saved_orchestrator(store_dir, Narrator::template_only()).await?;
    let started = orchestrator
        .start(name, CharacterClass::parse(class))
        .await
        .map_err(|e| e.to_string())?;

    println!("{}", started.intro);
    println!();
    println!("session: {}", started.session.session_id.bold());
    println!(
        "resume with: depths play --session {} --store-dir {}",
        started.session.session_id,
        store_dir.display()
    );
    Ok(())
}
