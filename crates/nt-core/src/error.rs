//! Error taxonomy shared by the tracker and its storage backends.

use thiserror::Error;

/// Validation errors raised while constructing core values.
///
/// These are always caller mistakes and are detected before any I/O.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The interval ends before it starts.
    #[error("invalid interval: end {end} is before start {start}")]
    InvalidInterval { start: i64, end: i64 },

    /// The event is missing a required value.
    #[error("invalid event: {field} cannot be empty")]
    InvalidEvent { field: &'static str },
}

/// Errors surfaced by the [`Tracker`](crate::Tracker) and [`EventStore`](crate::EventStore).
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The event cannot be recorded: it is malformed or would overlap stored data.
    ///
    /// Callers are expected to show this to the user so they can pick a
    /// different range or description.
    #[error("bad event: {0}")]
    BadEvent(String),

    /// Persisted data violates an invariant the store itself maintains.
    #[error("corrupt store: {0}")]
    CorruptStore(String),

    /// The storage backend failed for reasons unrelated to the stored data.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<ValidationError> for TrackerError {
    fn from(err: ValidationError) -> Self {
        Self::BadEvent(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_become_bad_events() {
        let err = TrackerError::from(ValidationError::InvalidInterval { start: 5, end: 1 });
        assert!(matches!(err, TrackerError::BadEvent(_)));
        assert_eq!(
            err.to_string(),
            "bad event: invalid interval: end 1 is before start 5"
        );
    }

    #[test]
    fn storage_errors_keep_their_source() {
        let io = std::io::Error::other("disk on fire");
        let err = TrackerError::Storage(Box::new(io));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "storage error: disk on fire");
    }
}
