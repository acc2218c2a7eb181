//! Test stores — mock `EventStore` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use motorpool_core::error::DomainError;
use motorpool_core::event::EventRecord;
use motorpool_core::identity::Identifier;
use motorpool_core::store::{EventStore, validate_append_request, validate_stream_request};
use motorpool_core::stream::StreamName;

/// An event store that records every call. `read_stream` returns the
/// configured records on every call; `append_events` always succeeds.
///
/// Useful for asserting exactly what the repository hands to the store
/// (or that it hands nothing at all, for no-op saves).
#[derive(Debug, Default)]
pub struct RecordingEventStore {
    read_result: Mutex<Vec<EventRecord>>,
    reads: Mutex<usize>,
    appended: Mutex<Vec<(String, Identifier, Vec<EventRecord>)>>,
}

impl RecordingEventStore {
    /// Creates a store whose `read_stream` always returns `read_result`.
    #[must_use]
    pub fn new(read_result: Vec<EventRecord>) -> Self {
        Self {
            read_result: Mutex::new(read_result),
            reads: Mutex::new(0),
            appended: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of all append calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn appended_batches(&self) -> Vec<(String, Identifier, Vec<EventRecord>)> {
        self.appended.lock().unwrap().clone()
    }

    /// Returns how many `read_stream` calls were made.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn read_count(&self) -> usize {
        *self.reads.lock().unwrap()
    }
}

#[async_trait]
impl EventStore for RecordingEventStore {
    async fn append_events(
        &self,
        entity_name: &str,
        entity_id: &Identifier,
        records: &[EventRecord],
    ) -> Result<StreamName, DomainError> {
        let stream_name = validate_append_request(entity_name, entity_id, records)?;
        self.appended.lock().unwrap().push((
            entity_name.to_owned(),
            entity_id.clone(),
            records.to_vec(),
        ));
        Ok(stream_name)
    }

    async fn read_stream(
        &self,
        entity_name: &str,
        entity_id: &Identifier,
    ) -> Result<Vec<EventRecord>, DomainError> {
        validate_stream_request(entity_name, entity_id)?;
        *self.reads.lock().unwrap() += 1;
        Ok(self.read_result.lock().unwrap().clone())
    }
}

/// An event store that always returns an infrastructure error. Useful
/// for testing error-handling paths.
#[derive(Debug, Default)]
pub struct FailingEventStore;

#[async_trait]
impl EventStore for FailingEventStore {
    async fn append_events(
        &self,
        _entity_name: &str,
        _entity_id: &Identifier,
        _records: &[EventRecord],
    ) -> Result<StreamName, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn read_stream(
        &self,
        _entity_name: &str,
        _entity_id: &Identifier,
    ) -> Result<Vec<EventRecord>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
