//! Event store abstraction.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::event::EventRecord;
use crate::identity::Identifier;
use crate::stream::StreamName;

/// Append-only, per-stream ordered event log with an exclusive-append
/// primitive that detects version conflicts.
///
/// A backing store must expose three physical operations: an
/// exclusive/conditional insert keyed `(stream_name, version)`, an
/// ordered range query by stream, and a "latest version, descending,
/// limit 1" query. The uniqueness constraint is enforced by the storage
/// engine itself, because multiple process instances may write
/// concurrently.
///
/// Cancellation is drop-based: every await in the append path is one
/// atomic store operation, so a cancelled append leaves a gap-free
/// prefix and the caller can retry from the actual latest version.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends an ordered, non-empty batch of records to one stream.
    ///
    /// Performs a cheap contiguity check against the latest stored
    /// version up front, then one exclusive add per record. The
    /// exclusive add is the authoritative, race-proof gate: if two
    /// writers pass the contiguity check simultaneously, only one add
    /// per `(stream_name, version)` can succeed.
    ///
    /// # Errors
    ///
    /// - [`DomainError::Validation`] if the entity name, id, or record
    ///   batch is empty.
    /// - [`DomainError::ConcurrencyConflict`] if the first record's
    ///   version is not `last_stored + 1`, or an exclusive add collides.
    /// - [`DomainError::Infrastructure`] for any other storage failure.
    async fn append_events(
        &self,
        entity_name: &str,
        entity_id: &Identifier,
        records: &[EventRecord],
    ) -> Result<StreamName, DomainError>;

    /// Reads all records for the stream, strictly ordered by ascending
    /// version. An absent stream yields an empty vec, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] for an empty entity name or
    /// id, or [`DomainError::Infrastructure`] on storage failure.
    async fn read_stream(
        &self,
        entity_name: &str,
        entity_id: &Identifier,
    ) -> Result<Vec<EventRecord>, DomainError>;
}

/// Validates the (entity name, id) pair and derives the stream name.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] naming the offending field.
pub fn validate_stream_request(
    entity_name: &str,
    entity_id: &Identifier,
) -> Result<StreamName, DomainError> {
    if entity_name.trim().is_empty() {
        return Err(DomainError::Validation {
            field: "entity_name",
            reason: "must not be empty".into(),
        });
    }
    if entity_id.as_str().trim().is_empty() {
        return Err(DomainError::Validation {
            field: "entity_id",
            reason: "must not be empty".into(),
        });
    }
    Ok(StreamName::new(entity_name, entity_id))
}

/// Validates an append request and derives the stream name.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] naming the offending field.
pub fn validate_append_request(
    entity_name: &str,
    entity_id: &Identifier,
    records: &[EventRecord],
) -> Result<StreamName, DomainError> {
    let stream_name = validate_stream_request(entity_name, entity_id)?;
    if records.is_empty() {
        return Err(DomainError::Validation {
            field: "events",
            reason: "must not be empty".into(),
        });
    }
    Ok(stream_name)
}

/// The contiguity gate: the first incoming version must be exactly one
/// greater than the last stored version (1 for a new stream).
///
/// This catches both "another writer already advanced the stream" and
/// "caller has a stale read" before any physical insert is attempted.
///
/// # Errors
///
/// Returns [`DomainError::ConcurrencyConflict`] naming the stream and
/// the version at which divergence was detected.
pub fn check_contiguity(
    stream_name: &StreamName,
    last_stored_version: Option<i64>,
    first_incoming_version: i64,
) -> Result<(), DomainError> {
    let expected = last_stored_version.unwrap_or(0) + 1;
    if first_incoming_version == expected {
        Ok(())
    } else {
        Err(DomainError::ConcurrencyConflict {
            stream_name: stream_name.clone(),
            version: first_incoming_version,
        })
    }
}
