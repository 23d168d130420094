//! Agents for Echoing Depths: the intent classifier and the narrator.
//!
//! The classifier turns free player text into the closed [`ed_core::Intent`]
//! set; the narrator turns structured [`ed_core::Outcome`] values back into
//! prose. Both sit at the edges of the synchronous state machine: the
//! classifier runs before it and never fails (unrecognized input degrades to
//! `Intent::Unknown`), the narrator runs after it and never fails either
//! (provider errors fall back to deterministic templates).

/// Rule-based intent classification.
pub mod classifier;
/// Error types for agent operations.
pub mod error;
/// Narration request shaping, providers, and templates.
pub mod narrator;

pub use classifier::{IntentClassifier, RuleBasedClassifier};
pub use error::{AgentError, AgentResult};
pub use narrator::{NarrationProvider, NarrationRequest, Narrator, OpenAiNarrator, TemplateNarrator};
