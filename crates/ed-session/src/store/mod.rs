//! Session store: the persistence interface and reference implementations.

mod json_dir;
mod memory;

pub use json_dir::JsonDirStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ed_core::{GameStatus, Session};

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from session persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted blob could not be (de)serialized.
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The session identifier is not usable as a storage key.
    #[error("invalid session id: {0:?}")]
    InvalidId(String),
}

/// A one-line view of a stored session, for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session identifier.
    pub session_id: String,
    /// Character name.
    pub character_name: String,
    /// Character class display name.
    pub character_class: String,
    /// Current location identifier.
    pub location: String,
    /// Commands processed so far.
    pub turn_count: u32,
    /// Current game status.
    pub game_status: GameStatus,
    /// Last time the session was saved.
    pub updated_at: DateTime<Utc>,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.session_id.clone(),
            character_name: session.character_name.clone(),
            character_class: session.character_class.name().to_string(),
            location: session.location.clone(),
            turn_count: session.turn_count,
            game_status: session.game_status,
            updated_at: session.updated_at,
        }
    }
}

/// Load/save interface for session records.
///
/// Implementations hold opaque blobs and make no game-logic decisions. A
/// missing session is `Ok(None)`, not an error; the orchestrator decides
/// what a missing session means.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch a session by identifier.
    async fn get(&self, session_id: &str) -> StoreResult<Option<Session>>;

    /// Persist a session, overwriting any previous record.
    async fn put(&self, session: &Session) -> StoreResult<()>;

    /// Delete a session's persisted record. Deleting a missing session is
    /// not an error.
    async fn delete(&self, session_id: &str) -> StoreResult<()>;

    /// Summaries of all stored sessions, most recently updated first.
    async fn list(&self) -> StoreResult<Vec<SessionSummary>>;
}

/// Reject identifiers that cannot be used safely as storage keys.
pub(crate) fn check_id(session_id: &str) -> StoreResult<()> {
    let ok = !session_id.is_empty()
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidId(session_id.to_string()))
    }
}
