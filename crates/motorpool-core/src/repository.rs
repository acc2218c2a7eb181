//! Aggregate repository: load and save orchestration.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::aggregate::AggregateRoot;
use crate::clock::Clock;
use crate::error::DomainError;
use crate::event::{DomainEvent, EventRecord};
use crate::identity::Identifier;
use crate::store::EventStore;
use crate::stream::StreamName;

/// Orchestrates load (read stream → rehydrate) and save (uncommitted
/// events → exclusive append) for one aggregate type.
///
/// The repository never retries: a concurrency conflict propagates
/// verbatim so the caller can reload, re-apply the intended business
/// operation, and save again — silently retrying here would mask lost
/// business intent.
pub struct Repository<A, S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    _aggregate: PhantomData<fn() -> A>,
}

impl<A, S> Repository<A, S>
where
    A: AggregateRoot,
    S: EventStore,
{
    /// Creates a repository over the given store and clock.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            _aggregate: PhantomData,
        }
    }

    /// Loads an aggregate by replaying its stream in ascending version
    /// order through `apply` on a rehydrated shell.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EntityNotFound`] if the stream has no
    /// events, or any error surfaced by the store.
    ///
    /// # Panics
    ///
    /// Panics if a stored payload no longer decodes into the
    /// aggregate's event enum. That is a deployed-code/schema mismatch
    /// no retry can fix — the event schema and the code must be
    /// versioned together.
    pub async fn load(&self, id: &Identifier) -> Result<A, DomainError> {
        let records = self.store.read_stream(A::entity_name(), id).await?;
        let Some(last) = records.last() else {
            return Err(DomainError::EntityNotFound(StreamName::new(
                A::entity_name(),
                id,
            )));
        };
        let last_version = last.version;

        let mut aggregate = A::rehydrate(id.clone());
        for record in &records {
            let event = decode_event::<A>(record);
            aggregate.apply(&event);
        }
        aggregate.set_version(last_version);

        tracing::trace!(
            stream = %StreamName::new(A::entity_name(), id),
            version = last_version,
            events = records.len(),
            "aggregate loaded"
        );
        Ok(aggregate)
    }

    /// Saves the aggregate's uncommitted events with empty metadata.
    ///
    /// # Errors
    ///
    /// See [`Repository::save_with_metadata`].
    pub async fn save(&self, aggregate: A) -> Result<A, DomainError> {
        self.save_with_metadata(aggregate, &BTreeMap::new()).await
    }

    /// Saves the aggregate's uncommitted events, tagging each record
    /// with its intended version (`last_known + 1, +2, …`) and the
    /// supplied metadata entries.
    ///
    /// A no-op (zero store I/O) when there are no uncommitted events.
    /// On success the uncommitted list is cleared and the last-known
    /// version advances.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ConcurrencyConflict`] verbatim when
    /// another writer advanced the stream, or any other store error.
    #[allow(clippy::cast_possible_wrap)]
    pub async fn save_with_metadata(
        &self,
        mut aggregate: A,
        metadata: &BTreeMap<String, String>,
    ) -> Result<A, DomainError> {
        if aggregate.uncommitted_events().is_empty() {
            return Ok(aggregate);
        }

        let base_version = aggregate.version();
        let stream_name = StreamName::new(A::entity_name(), aggregate.id());
        let occurred_at = self.clock.now();

        let mut records = Vec::with_capacity(aggregate.uncommitted_events().len());
        for (offset, event) in aggregate.uncommitted_events().iter().enumerate() {
            let payload = serde_json::to_value(event).map_err(|e| {
                DomainError::Infrastructure(format!("event serialization failed: {e}"))
            })?;
            records.push(EventRecord {
                stream_name: stream_name.clone(),
                entity_type: A::entity_name().to_owned(),
                version: base_version + 1 + offset as i64,
                event_type: event.event_type().to_owned(),
                payload,
                metadata: metadata.clone(),
                occurred_at,
            });
        }

        self.store
            .append_events(A::entity_name(), aggregate.id(), &records)
            .await?;

        let new_version = base_version + records.len() as i64;
        aggregate.clear_uncommitted_events();
        aggregate.set_version(new_version);

        tracing::trace!(
            stream = %stream_name,
            version = new_version,
            appended = records.len(),
            "aggregate saved"
        );
        Ok(aggregate)
    }
}

fn decode_event<A: AggregateRoot>(record: &EventRecord) -> A::Event {
    match serde_json::from_value(record.payload.clone()) {
        Ok(event) => event,
        Err(err) => panic!(
            "event type `{}` at {} version {} cannot be decoded; \
             deployed code and stored event schema are out of sync: {err}",
            record.event_type, record.stream_name, record.version
        ),
    }
}
