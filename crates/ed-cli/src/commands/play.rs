//! Interactive play loop.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use tracing::warn;

use ed_agents::narrator::{Narrator, OpenAiConfig, OpenAiNarrator};
use ed_core::world::cave_world;
use ed_core::{CharacterClass, GameStatus};
use ed_session::{MemoryStore, Orchestrator};

/// Run the interactive loop.
///
/// With `--store-dir`, progress is saved after every command and a session
/// can be resumed by id. Without it, the game lives in memory and vanishes
/// on exit. Type `quit` (or press ctrl-d) to leave the program; `exit` is a
/// move in the game, not a way out of the terminal.
pub async fn run(
    session_id: Option<&str>,
    name: &str,
    class: &str,
    store_dir: Option<&Path>,
    narrator_kind: Option<&str>,
) -> Result<(), String> {
    let narrator = build_narrator(narrator_kind)?;

    let orchestrator = match store_dir {
        Some(dir) => super::saved_orchestrator(dir, narrator).await?,
        None => {
            if session_id.is_some() {
                return Err("--session requires --store-dir".to_string());
            }
            Orchestrator::new(cave_world(), Arc::new(MemoryStore::new()), narrator)
        }
    };

    let id = match session_id {
        Some(id) => {
            let session = orchestrator
                .session(id)
                .await
                .map_err(|e| e.to_string())?;
            println!(
                "resuming {} the {} at turn {}",
                session.character_name.bold(),
                session.character_class,
                session.turn_count
            );
            id.to_string()
        }
        None => {
            let started = orchestrator
                .start(name, CharacterClass::parse(class))
                .await
                .map_err(|e| e.to_string())?;
            println!("{}", started.intro);
            started.session.session_id
        }
    };

    let stdin = io::stdin();
    loop {
        print!("{} ", ">".cyan().bold());
        io::stdout().flush().map_err(|e| e.to_string())?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).map_err(|e| e.to_string())? == 0 {
            break; // ctrl-d
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "q" | "bye") {
            break;
        }

        let response = orchestrator
            .submit(&id, line)
            .await
            .map_err(|e| e.to_string())?;

        println!();
        println!("{}", response.narrative);
        println!();

        match response.game_status {
            GameStatus::Victory => {
                println!("{}", "VICTORY".green().bold());
                break;
            }
            GameStatus::Defeat => {
                println!("{}", "DEFEAT".red().bold());
                break;
            }
            GameStatus::InProgress => {}
        }
    }

    println!("session: {id}");
    Ok(())
}

fn build_narrator(kind: Option<&str>) -> Result<Narrator, String> {
    match kind {
        None | Some("template") => Ok(Narrator::template_only()),
        Some("openai") => match OpenAiConfig::from_env() {
            Ok(config) => Ok(Narrator::with_provider(Arc::new(OpenAiNarrator::new(
                config,
            )))),
            Err(error) => {
                warn!(%error, "falling back to template narration");
                Ok(Narrator::template_only())
            }
        },
        Some(other) => Err(format!("unknown narrator \"{other}\"")),
    }
}
