use thiserror::Error;

/// Alias for `Result<T, AgentError>`.
pub type AgentResult<T> = Result<T, AgentError>;

/// Errors from agent operations.
///
/// Only narration providers can fail; classification is total. A provider
/// error never reaches the player (the narrator recovers with its template
/// fallback), but it is surfaced here so callers can log it.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The narration provider is not configured (e.g. missing API key).
    #[error("narration provider not configured: {0}")]
    NotConfigured(String),

    /// The HTTP call to the narration provider failed.
    #[error("narration request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered but the response was unusable.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}
