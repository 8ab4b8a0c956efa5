//! Error types for offline-tasks types.

use thiserror::Error;

/// Errors raised when parsing model types from user input.
#[derive(Debug, Error)]
pub enum TypesError {
    /// The string is not a numeric task id.
    #[error("invalid task id: {0}")]
    InvalidTaskId(String),

    /// The string names no known filter.
    #[error("unknown filter: {0} (expected all, active or completed)")]
    UnknownFilter(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TypesError::InvalidTaskId("x1".into());
        assert_eq!(err.to_string(), "invalid task id: x1");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TypesError>();
    }
}
