//! In-memory event store.
//!
//! Keeps streams in a hash map behind a single `RwLock` and enforces the
//! same two-tier concurrency check as the PostgreSQL backend: the cheap
//! contiguity gate up front, then an insert-if-absent per record. Used
//! by unit tests and examples; never by production deployments.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use motorpool_core::error::DomainError;
use motorpool_core::event::EventRecord;
use motorpool_core::identity::Identifier;
use motorpool_core::store::{
    EventStore, check_contiguity, validate_append_request, validate_stream_request,
};
use motorpool_core::stream::StreamName;

/// Thread-safe in-memory implementation of [`EventStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryEventStore {
    streams: Arc<RwLock<HashMap<String, Vec<EventRecord>>>>,
}

impl MemoryEventStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of streams currently held.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn stream_count(&self) -> usize {
        self.streams
            .read()
            .expect("in-memory store lock poisoned")
            .len()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn append_events(
        &self,
        entity_name: &str,
        entity_id: &Identifier,
        records: &[EventRecord],
    ) -> Result<StreamName, DomainError> {
        let stream_name = validate_append_request(entity_name, entity_id, records)?;

        let mut streams = self.streams.write().expect("in-memory store lock poisoned");

        // Check contiguity before touching the map so a rejected append
        // to an unknown stream does not leave an empty entry behind.
        let last_stored = streams
            .get(stream_name.as_str())
            .and_then(|stream| stream.last())
            .map(|r| r.version);
        check_contiguity(&stream_name, last_stored, records[0].version)?;

        let stream = streams.entry(stream_name.as_str().to_owned()).or_default();
        for record in records {
            // The authoritative exclusive add: insert-if-absent keyed by
            // (stream_name, version). Stops at the first collision so a
            // partial batch remains a gap-free, resumable prefix.
            if stream.iter().any(|stored| stored.version == record.version) {
                return Err(DomainError::ConcurrencyConflict {
                    stream_name: stream_name.clone(),
                    version: record.version,
                });
            }
            stream.push(record.clone());
        }

        tracing::trace!(stream = %stream_name, appended = records.len(), "events appended");
        Ok(stream_name)
    }

    async fn read_stream(
        &self,
        entity_name: &str,
        entity_id: &Identifier,
    ) -> Result<Vec<EventRecord>, DomainError> {
        let stream_name = validate_stream_request(entity_name, entity_id)?;

        let streams = self.streams.read().expect("in-memory store lock poisoned");
        let mut records = streams
            .get(stream_name.as_str())
            .cloned()
            .unwrap_or_default();
        records.sort_by_key(|r| r.version);
        Ok(records)
    }
}
