//! The command pipeline: load → classify → apply → persist → narrate.
//!
//! The orchestrator contains no game logic of its own, only sequencing and
//! error translation. Two guarantees matter here:
//!
//! 1. The session is persisted in its post-transition form *before* narration
//!    is attempted, so a narration failure (or a client disconnect mid-story)
//!    can never roll back or re-run a committed transition.
//! 2. Commands for the same session are serialized through a per-session
//!    lock; commands for different sessions run in parallel against the
//!    shared, immutable world.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use ed_agents::classifier::{IntentClassifier, RuleBasedClassifier};
use ed_agents::narrator::{NarrationRequest, Narrator};
use ed_core::{CharacterClass, CoreError, GameStatus, Outcome, Session, WorldGraph, apply};

use crate::store::{SessionStore, StoreError};

/// Alias for `Result<T, PipelineError>`.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Failures that abort the command pipeline.
///
/// Only genuine faults live here. A blocked move or an unrecognized command
/// is an [`Outcome`] and flows through narration like any other turn.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No session exists under this identifier. Distinct from every in-game
    /// failure: there is no state to mutate.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// The static world tables are inconsistent: a content bug, not a
    /// player action. The session is left untouched.
    #[error(transparent)]
    WorldData(#[from] CoreError),

    /// The session store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What the player gets back for one submitted command.
#[derive(Debug, Clone)]
pub struct CommandResponse {
    /// The narrative text.
    pub narrative: String,
    /// Game status after the command.
    pub game_status: GameStatus,
    /// Location after the command.
    pub location: String,
    /// Inventory after the command.
    pub inventory: Vec<String>,
    /// Turn counter after the command.
    pub turn_count: u32,
    /// The structured outcome, for callers that want more than prose.
    pub outcome: Outcome,
}

/// A freshly started game: the persisted session plus its introduction.
#[derive(Debug, Clone)]
pub struct StartedGame {
    /// The new session, already persisted.
    pub session: Session,
    /// Introduction narrative.
    pub intro: String,
}

/// Sequences one command at a time through the game pipeline.
pub struct Orchestrator {
    world: Arc<WorldGraph>,
    store: Arc<dyn SessionStore>,
    classifier: Arc<dyn IntentClassifier>,
    narrator: Narrator,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Orchestrator {
    /// Build an orchestrator with the default rule-based classifier.
    pub fn new(world: WorldGraph, store: Arc<dyn SessionStore>, narrator: Narrator) -> Self {
        Self {
            world: Arc::new(world),
            store,
            classifier: Arc::new(RuleBasedClassifier::new()),
            narrator,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Swap in a different classifier implementation.
    pub fn with_classifier(mut self, classifier: Arc<dyn IntentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// The world this orchestrator runs.
    pub fn world(&self) -> &WorldGraph {
        &self.world
    }

    /// Start a new game: create, persist, and introduce a fresh session.
    pub async fn start(
        &self,
        character_name: &str,
        class: CharacterClass,
    ) -> PipelineResult<StartedGame> {
        let session = Session::new(character_name, class, &self.world);
        self.store.put(&session).await?;
        info!(session_id = %session.session_id, character = character_name, "session started");

        let intro = self
            .narrator
            .intro(character_name, class, &self.world.name);
        Ok(StartedGame { session, intro })
    }

    /// Load a session without mutating it.
    pub async fn session(&self, session_id: &str) -> PipelineResult<Session> {
        self.store
            .get(session_id)
            .await?
            .ok_or_else(|| PipelineError::SessionNotFound(session_id.to_string()))
    }

    /// Process one command for a session.
    #[instrument(skip(self, raw), fields(session_id = %session_id))]
    pub async fn submit(&self, session_id: &str, raw: &str) -> PipelineResult<CommandResponse> {
        self.submit_inner(session_id, raw, None).await
    }

    /// Process one command, but only if the session is still at
    /// `expected_turn`.
    ///
    /// This is the retry-safety hook: a client that resubmits after losing a
    /// response will find the turn counter already advanced, and gets the
    /// committed state back instead of a double-applied transition.
    pub async fn submit_at_turn(
        &self,
        session_id: &str,
        raw: &str,
        expected_turn: u32,
    ) -> PipelineResult<CommandResponse> {
        self.submit_inner(session_id, raw, Some(expected_turn)).await
    }

    async fn submit_inner(
        &self,
        session_id: &str,
        raw: &str,
        expected_turn: Option<u32>,
    ) -> PipelineResult<CommandResponse> {
        let lock = self.session_lock(session_id).await;
        let _guard = lock.lock().await;

        let mut session = self
            .store
            .get(session_id)
            .await?
            .ok_or_else(|| PipelineError::SessionNotFound(session_id.to_string()))?;

        if let Some(expected) = expected_turn
            && session.turn_count != expected
        {
            info!(
                session_id,
                expected,
                actual = session.turn_count,
                "stale retry, returning committed state"
            );
            return self.read_back(&session).await;
        }

        let intent = self.classifier.classify(raw);
        let outcome = apply(&mut session, &intent, &self.world).map_err(|error| {
            // A bad world table is a content bug; the session is left as the
            // store last saw it.
            tracing::error!(session_id, %error, "world data inconsistency");
            error
        })?;
        session.record_command(raw, intent);

        // Commit the transition before narrating. Narration is presentation,
        // not logic; it must not be able to lose this write.
        self.store.put(&session).await?;
        info!(
            session_id,
            turn = session.turn_count,
            status = ?session.game_status,
            "command applied"
        );

        let request = NarrationRequest::compose(&session, &outcome, &self.world)?;
        let narrative = self.narrator.narrate(&request).await;

        Ok(CommandResponse {
            narrative,
            game_status: session.game_status,
            location: session.location.clone(),
            inventory: session.inventory.clone(),
            turn_count: session.turn_count,
            outcome,
        })
    }

    /// Build a response from committed state without running the state
    /// machine; used for stale retries.
    async fn read_back(&self, session: &Session) -> PipelineResult<CommandResponse> {
        let room = self.world.room(&session.location)?;
        let outcome = Outcome::Description {
            target: room.name.clone(),
            text: room.description.clone(),
            items_present: self.world.items_available(&room.id, session)?,
            exits: room.exits.keys().copied().collect(),
        };
        let request = NarrationRequest::compose(session, &outcome, &self.world)?;
        let narrative = self.narrator.narrate(&request).await;
        Ok(CommandResponse {
            narrative,
            game_status: session.game_status,
            location: session.location.clone(),
            inventory: session.inventory.clone(),
            turn_count: session.turn_count,
            outcome,
        })
    }

    async fn session_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ed_agents::error::{AgentError, AgentResult};
    use ed_agents::narrator::NarrationProvider;
    use ed_core::world::cave_world;

    use crate::store::MemoryStore;

    struct FailingProvider;

    #[async_trait]
    impl NarrationProvider for FailingProvider {
        async fn generate(&self, _request: &NarrationRequest) -> AgentResult<String> {
            Err(AgentError::MalformedResponse("provider down".to_string()))
        }
    }

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(
            cave_world(),
            Arc::new(MemoryStore::new()),
            Narrator::template_only(),
        )
    }

    #[tokio::test]
    async fn start_persists_and_introduces() {
        let orch = orchestrator();
        let started = orch
            .start("Throg", CharacterClass::Warrior)
            .await
            .unwrap();

        assert!(started.intro.contains("Throg"));
        let loaded = orch.session(&started.session.session_id).await.unwrap();
        assert_eq!(loaded.location, "cave_entrance");
        assert_eq!(loaded.turn_count, 0);
    }

    #[tokio::test]
    async fn unknown_session_is_a_distinct_hard_error() {
        let orch = orchestrator();
        let err = orch.submit("0000-does-not-exist", "look").await.unwrap_err();
        assert!(matches!(err, PipelineError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn full_playthrough_to_victory() {
        let orch = orchestrator();
        let started = orch.start("Mystara", CharacterClass::Wizard).await.unwrap();
        let id = started.session.session_id;

        let commands = [
            "take magical rope",
            "go east",
            "use rope",
            "go east",
            "take crystal",
            "go west",
            "go west",
            "exit",
        ];
        let mut last = None;
        for command in commands {
            last = Some(orch.submit(&id, command).await.unwrap());
        }

        let response = last.unwrap();
        assert_eq!(response.game_status, GameStatus::Victory);
        assert_eq!(response.turn_count, commands.len() as u32);
        assert!(response.narrative.contains("daylight"));

        // The victory is durable, not just in the response.
        let stored = orch.session(&id).await.unwrap();
        assert_eq!(stored.game_status, GameStatus::Victory);
        assert_eq!(stored.command_history.len(), commands.len());
    }

    #[tokio::test]
    async fn blocked_and_unknown_commands_still_advance_and_persist() {
        let orch = orchestrator();
        let started = orch.start("Tess", CharacterClass::Rogue).await.unwrap();
        let id = started.session.session_id;

        let response = orch.submit(&id, "go south").await.unwrap();
        assert!(!response.outcome.is_success());
        assert_eq!(response.turn_count, 1);

        let response = orch.submit(&id, "sing loudly").await.unwrap();
        assert!(matches!(response.outcome, Outcome::Unrecognized { .. }));
        assert_eq!(response.turn_count, 2);

        let stored = orch.session(&id).await.unwrap();
        assert_eq!(stored.turn_count, 2);
        assert_eq!(stored.location, "cave_entrance");
    }

    #[tokio::test]
    async fn state_is_persisted_even_when_narration_fails() {
        let orch = Orchestrator::new(
            cave_world(),
            Arc::new(MemoryStore::new()),
            Narrator::with_provider(Arc::new(FailingProvider)),
        );
        let started = orch.start("Throg", CharacterClass::Warrior).await.unwrap();
        let id = started.session.session_id;

        let response = orch.submit(&id, "take rope").await.unwrap();

        // Deterministic fallback text, never an error.
        assert!(response.narrative.contains("You take the Magical Rope."));

        // And the mutation was committed regardless.
        let stored = orch.session(&id).await.unwrap();
        assert_eq!(stored.inventory, vec!["magical_rope".to_string()]);
    }

    #[tokio::test]
    async fn stale_retry_does_not_reapply() {
        let orch = orchestrator();
        let started = orch.start("Tess", CharacterClass::Rogue).await.unwrap();
        let id = started.session.session_id;

        let first = orch.submit_at_turn(&id, "take rope", 0).await.unwrap();
        assert_eq!(first.turn_count, 1);

        // The client lost the response and retries the same command.
        let retry = orch.submit_at_turn(&id, "take rope", 0).await.unwrap();
        assert_eq!(retry.turn_count, 1);
        assert!(matches!(retry.outcome, Outcome::Description { .. }));

        let stored = orch.session(&id).await.unwrap();
        assert_eq!(stored.turn_count, 1);
        assert_eq!(stored.inventory, vec!["magical_rope".to_string()]);
    }

    #[tokio::test]
    async fn concurrent_commands_for_one_session_are_serialized() {
        let orch = Arc::new(orchestrator());
        let started = orch.start("Throg", CharacterClass::Warrior).await.unwrap();
        let id = started.session.session_id;

        let a = {
            let orch = Arc::clone(&orch);
            let id = id.clone();
            tokio::spawn(async move { orch.submit(&id, "look around").await })
        };
        let b = {
            let orch = Arc::clone(&orch);
            let id = id.clone();
            tokio::spawn(async move { orch.submit(&id, "take rope").await })
        };

        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let stored = orch.session(&id).await.unwrap();
        assert_eq!(stored.turn_count, 2);
        assert_eq!(stored.command_history.len(), 2);
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let orch = Arc::new(orchestrator());
        let one = orch.start("Throg", CharacterClass::Warrior).await.unwrap();
        let two = orch.start("Mystara", CharacterClass::Wizard).await.unwrap();

        orch.submit(&one.session.session_id, "take rope")
            .await
            .unwrap();

        let untouched = orch.session(&two.session.session_id).await.unwrap();
        assert!(untouched.inventory.is_empty());
        assert_eq!(untouched.turn_count, 0);

        // The rope is still at the entrance for the second session.
        let response = orch
            .submit(&two.session.session_id, "take rope")
            .await
            .unwrap();
        assert!(matches!(response.outcome, Outcome::Taken { .. }));
    }
}
