//! Error types for match orchestration.

use thiserror::Error;

/// Result type for orchestrator operations.
pub type MatchResult<T> = Result<T, MatchError>;

/// Errors from starting, running, or finishing a match.
#[derive(Debug, Error)]
pub enum MatchError {
    /// A match was requested with no playlist loaded.
    #[error("no playlist loaded")]
    NoPlaylistLoaded,

    /// A match was requested while another run is outstanding.
    #[error("a match is already in progress")]
    MatchInProgress,

    /// The engine reported a fault, or its worker died without
    /// reporting a result.
    #[error("match engine failure: {0}")]
    Engine(String),

    /// The run was cancelled.
    #[error("match cancelled")]
    Cancelled,
}

impl MatchError {
    /// Create an engine failure with a message.
    pub fn engine(message: impl Into<String>) -> Self {
        Self::Engine(message.into())
    }
}
