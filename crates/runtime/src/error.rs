//! Error types shared across the pool.

use thiserror::Error;

use crate::worker::WorkerId;

/// Result type alias for pool operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while managing pooled sessions.
#[derive(Debug, Error)]
pub enum Error {
    /// The calling worker's scope already holds the configured maximum
    /// number of sessions.
    #[error(
        "cannot create a new session: {max} sessions already live in this scope. \
         Raise max_session_count to allow more sessions per worker"
    )]
    PoolExhausted { max: usize },

    /// A session with this name is already visible to the calling worker.
    #[error("session '{name}' is already registered for {worker}")]
    DuplicateName { name: String, worker: WorkerId },

    /// Every creation attempt failed; carries the last factory error.
    #[error("session '{name}' initialization failed after {attempts} attempts")]
    InitFailed {
        name: String,
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    /// A lookup that is required to succeed found no matching record.
    #[error("no session found for {0}")]
    NotFound(String),

    /// Error native to the remote automation protocol. During teardown these
    /// usually mean the remote side already terminated the session.
    #[error("remote endpoint error: {0}")]
    Remote(String),

    /// Transport-level failure reaching the remote endpoint.
    #[error("transport error: {0}")]
    Transport(String),

    /// Operation exceeded its time bound.
    #[error("timeout: {0}")]
    Timeout(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Invariant violation that should never occur in a correct build.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns true for errors native to the remote automation protocol.
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Remote(_))
    }

    /// Returns true if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }
}
