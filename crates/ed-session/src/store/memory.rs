//! In-memory session store, for tests and ephemeral play.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use ed_core::Session;

use super::{SessionStore, SessionSummary, StoreResult, check_id};

/// A session store that lives and dies with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self, session_id: &str) -> StoreResult<Option<Session>> {
        check_id(session_id)?;
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn put(&self, session: &Session) -> StoreResult<()> {
        check_id(&session.session_id)?;
        self.sessions
            .write()
            .await
            .insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> StoreResult<()> {
        check_id(session_id)?;
        self.sessions.write().await.remove(session_id);
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<SessionSummary>> {
        let mut summaries: Vec<SessionSummary> = self
            .sessions
            .read()
            .await
            .values()
            .map(SessionSummary::from)
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }
}
