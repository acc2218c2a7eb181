//! Domain error types.

use thiserror::Error;

use crate::stream::StreamName;

/// Top-level domain error type.
///
/// Every kernel operation returns this in its `Result`; expected
/// conditions (validation, not-found, conflict) never panic.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed input to the kernel itself. Always a caller bug.
    #[error("validation error: {field}: {reason}")]
    Validation {
        /// The offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A load was attempted on a stream with no events.
    #[error("entity not found: stream {0} has no events")]
    EntityNotFound(StreamName),

    /// An aggregate invariant or operation precondition failed.
    #[error("rule violation: {0}")]
    RuleViolation(String),

    /// Optimistic concurrency conflict: the stream was updated by
    /// another writer. Recoverable by reload-and-retry at the caller.
    #[error("stream {stream_name} was already updated: writing version {version} diverges from the stored history")]
    ConcurrencyConflict {
        /// The stream on which the conflict was detected.
        stream_name: StreamName,
        /// The version at which divergence was detected.
        version: i64,
    },

    /// An infrastructure/persistence error (connectivity, serialization).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
