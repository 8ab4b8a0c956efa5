//! Error types for tasks-client.
//!
//! None of these cross the `TaskStore` boundary: the store logs them and
//! degrades to in-memory or pending state.

use std::path::PathBuf;

/// Durable store errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Key contains characters the backend cannot store.
    #[error("invalid storage key: {key}")]
    InvalidKey {
        /// The rejected key.
        key: String,
    },

    /// Database path error.
    #[error("invalid database path: {path}")]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
    },

    /// The backend refused the write (quota, read-only, injected failure).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Remote sync errors.
///
/// The store only distinguishes success from failure; the variants exist for
/// logging.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The remote answered with a non-success status.
    #[error("remote rejected {action}: HTTP {status}")]
    Rejected {
        /// Mutation action that was rejected.
        action: String,
        /// HTTP status code.
        status: u16,
    },

    /// Request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The remote did not answer in time.
    #[error("request timed out")]
    Timeout,

    /// Mutation payload does not fit its action.
    #[error("invalid payload for {action}")]
    InvalidPayload {
        /// Mutation action with the wrong payload.
        action: String,
    },

    /// Injected failure from the simulated or mock remote.
    #[error("simulated failure: {0}")]
    Simulated(String),
}

/// Result type alias for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Result type alias for remote operations.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RemoteError::Rejected {
            action: "create".into(),
            status: 503,
        };
        assert_eq!(err.to_string(), "remote rejected create: HTTP 503");

        let err = StorageError::InvalidKey { key: "../x".into() };
        assert_eq!(err.to_string(), "invalid storage key: ../x");
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StorageError>();
        assert_send_sync::<RemoteError>();
    }
}
