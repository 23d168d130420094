//! Print a saved session as JSON.

use std::path::Path;

/// Dump the full session record.
pub async fn run(session_id: &str, store_dir: &Path) -> Result<(), String> {
    let orchestrator =
        super::saved_orchestrator(store_dir, ed_agents::narrator::Narrator::template_only())
            .await?;
    let session = orchestrator
        .session(session_id)
        .await
        .map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&session).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
