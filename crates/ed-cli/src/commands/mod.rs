//! Subcommand implementations.

pub mod delete;
pub mod new;
pub mod play;
pub mod sessions;
pub mod state;

use std::path::Path;
use std::sync::Arc;

use ed_agents::narrator::Narrator;
use ed_core::world::cave_world;
use ed_session::{JsonDirStore, Orchestrator, SessionStore};

/// Build an orchestrator over a JSON-directory store.
pub async fn saved_orchestrator(
    store_dir: &Path,
    narrator: Narrator,
) -> Result<Orchestrator, String> {
    let store = JsonDirStore::open(store_dir)
        .await
        .map_err(|e| format!("cannot open store at {}: {e}", store_dir.display()))?;
    Ok(Orchestrator::new(cave_world(), Arc::new(store), narrator))
}

/// Open the JSON-directory store on its own, for non-game commands.
pub async fn saved_store(store_dir: &Path) -> Result<Arc<dyn SessionStore>, String> {
    let store = JsonDirStore::open(store_dir)
        .await
        .map_err(|e| format!("cannot open store at {}: {e}", store_dir.display()))?;
    Ok(Arc::new(store))
}
