//! Directory-of-JSON-files session store.
//!
//! One pretty-printed JSON file per session under a base directory, written
//! via a temp file and rename so a crash mid-write never leaves a truncated
//! save behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use ed_core::Session;

use super::{SessionStore, SessionSummary, StoreResult, check_id};

/// A session store persisting each session as `<dir>/<session_id>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn path_for(&self, session_id: &str) -> PathBuf {
        self.dir.join(format!("{session_id}.json"))
    }

    async fn read_session(path: &Path) -> StoreResult<Session> {
        let data = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&data)?)
    }
}

#[async_trait]
impl SessionStore for JsonDirStore {
    async fn get(&self, session_id: &str) -> StoreResult<Option<Session>> {
        check_id(session_id)?;
        let path = self.path_for(session_id);
        match fs::read_to_string(&path).await {
            Ok(data) => Ok(Some(serde_json::from_str(&data)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, session: &Session) -> StoreResult<()> {
        check_id(&session.session_id)?;
        let data = serde_json::to_string_pretty(session)?;
        let path = self.path_for(&session.session_id);
        let tmp = self.dir.join(format!(".{}.tmp", session.session_id));
        fs::write(&tmp, data).await?;
        fs::rename(&tmp, &path).await?;
        debug!(session_id = %session.session_id, path = %path.display(), "session saved");
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> StoreResult<()> {
        check_id(session_id)?;
        match fs::remove_file(self.path_for(session_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> StoreResult<Vec<SessionSummary>> {
        let mut summaries = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_session(&path).await {
                Ok(session) => summaries.push(SessionSummary::from(&session)),
                // A foreign or corrupt file should not hide the rest.
                Err(error) => {
                    warn!(path = %path.display(), %error, "skipping unreadable session file");
                }
            }
        }
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed_core::world::cave_world;
    use ed_core::{CharacterClass, Intent, apply};

    #[tokio::test]
    async fn round_trip_preserves_progress() {
        let world = cave_world();
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::open(dir.path()).await.unwrap();

        let mut session = Session::new("Throg", CharacterClass::Warrior, &world);
        apply(
            &mut session,
            &Intent::Take {
                item: "rope".into(),
            },
            &world,
        )
        .unwrap();
        store.put(&session).await.unwrap();

        let loaded = store.get(&session.session_id).await.unwrap().unwrap();
        assert_eq!(loaded.inventory, vec!["magical_rope".to_string()]);
        assert_eq!(loaded.turn_count, 1);
    }

    #[tokio::test]
    async fn missing_session_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::open(dir.path()).await.unwrap();
        assert!(store.get("no-such-session").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_skips_corrupt_files() {
        let world = cave_world();
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::open(dir.path()).await.unwrap();

        store
            .put(&Session::new("Tess", CharacterClass::Rogue, &world))
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("garbage.json"), "{not json")
            .await
            .unwrap();

        let summaries = store.list().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].character_name, "Tess");
    }

    #[tokio::test]
    async fn delete_removes_the_file() {
        let world = cave_world();
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::open(dir.path()).await.unwrap();

        let session = Session::new("Tess", CharacterClass::Rogue, &world);
        store.put(&session).await.unwrap();
        store.delete(&session.session_id).await.unwrap();
        assert!(store.get(&session.session_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn traversal_ids_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::open(dir.path()).await.unwrap();
        assert!(store.get("../../etc/passwd").await.is_err());
    }
}
