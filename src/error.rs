//! Error types for babytrack.

use thiserror::Error;

use crate::features::session::{ActivityKind, Command, SessionId, TrackerState};

/// All errors produced by the library.
#[derive(Debug, Error)]
pub enum TrackError {
    /// An open session already exists for this activity kind.
    #[error("an open {kind} session already exists (id {id})")]
    Conflict {
        /// Activity kind that already has an open session.
        kind: ActivityKind,
        /// Id of the open session.
        id: SessionId,
    },

    /// The persistence backend could not complete the request.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A command was issued in a state that forbids it.
    #[error("cannot {command} while {state}")]
    InvalidTransition {
        /// The rejected command.
        command: Command,
        /// The state the tracker was in.
        state: TrackerState,
    },

    /// A write targeted a session that has already been closed.
    #[error("session {0} is already closed")]
    SessionClosed(SessionId),

    /// A requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An argument or persisted record is malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration could not be read or written.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database setup or record storage failed.
    #[error("database error: {0}")]
    Database(String),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Terminal or filesystem I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrackError {
    /// Whether the caller may retry the same command later.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}
