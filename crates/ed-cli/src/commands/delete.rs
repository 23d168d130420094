//! Delete a saved session.

use std::path::Path;

/// Remove a saved session record.
pub async fn run(session_id: &str, store_dir: &Path) -> Result<(), String> {
    let store = super::saved_store(store_dir).await?;
    store.delete(session_id).await.map_err(|e| e.to_string())?;
    println!("deleted {session_id}");
    Ok(())
}
