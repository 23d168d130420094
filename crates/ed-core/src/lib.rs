//! Core types for Echoing Depths: the world graph, the session record, and
//! the game state machine.
//!
//! This crate is synchronous and performs no I/O. Everything here is a pure
//! function of a [`Session`], an [`Intent`], and the immutable [`WorldGraph`];
//! the async orchestration, persistence, and narration layers live in the
//! sibling crates and depend only on the data contracts defined here.

/// Per-class cosmetic ability table.
pub mod ability;
/// The transition function applying one intent to a session.
pub mod engine;
/// Error types used throughout the crate.
pub mod error;
/// Player intents, the classifier's output contract.
pub mod intent;
/// Canonical/display name conversion helpers.
pub mod names;
/// Structured results of applying one intent.
pub mod outcome;
/// The mutable per-playthrough session record.
pub mod session;
/// The fixed, read-only world graph and item table.
pub mod world;

/// Re-export the transition function.
pub use engine::apply;
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export intent types.
pub use intent::{Direction, Intent};
/// Re-export outcome types.
pub use outcome::{BlockedReason, ExitRefusal, Outcome, TakeFailure};
/// Re-export session types.
pub use session::{CharacterClass, DefeatReason, GameStatus, Health, Session};
/// Re-export world types.
pub use world::{ExitEdge, ExitTarget, ItemDef, Room, UseEffect, WorldGraph};
