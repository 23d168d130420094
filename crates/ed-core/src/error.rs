use thiserror::Error;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the core state machine.
///
/// These are *internal consistency* errors only. A blocked move, a missing
/// item, or an unrecognized command is not an error; those are modeled as
/// [`crate::Outcome`] variants so that retries, tests, and narration can
/// treat them uniformly.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A room identifier does not exist in the static world table.
    #[error("unknown room: {0}")]
    UnknownRoom(String),

    /// An item identifier does not exist in the static world table.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    /// The world table violates its own structural rules (bad entry room,
    /// dangling edge, missing or duplicated terminal treasure).
    #[error("inconsistent world data: {0}")]
    InconsistentWorld(String),
}
