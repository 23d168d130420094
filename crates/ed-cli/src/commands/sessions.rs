//! List saved sessions.

use std::path::Path;

use colored::Colorize;

use ed_core::GameStatus;

/// Print one line per saved session, most recent first.
pub async fn run(store_dir: &Path) -> Result<(), String> {
    let store = super::saved_store(store_dir).await?;
    let summaries = store.list().await.map_err(|e| e.to_string())?;

    if summaries.is_empty() {
        println!("no saved sessions in {}", store_dir.display());
        return Ok(());
    }

    for summary in summaries {
        let status = match summary.game_status {
            GameStatus::InProgress => "in progress".normal(),
            GameStatus::Victory => "victory".green(),
            GameStatus::Defeat => "defeat".red(),
        };
        println!(
            "{}  {} the {}  turn {}  at {}  [{}]",
            summary.session_id,
            summary.character_name.bold(),
            summary.character_class,
            summary.turn_count,
            summary.location,
            status
        );
    }
    Ok(())
}
