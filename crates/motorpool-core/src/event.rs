//! Domain event abstractions.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::stream::StreamName;

/// Trait that all domain events implement.
///
/// A bounded context models its events as one closed enum implementing
/// this trait, so `apply` dispatch is an exhaustive match rather than
/// open runtime routing.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the event type name (used for routing and diagnostics).
    fn event_type(&self) -> &'static str;
}

/// Stored representation of a domain event — one immutable, versioned
/// fact in an aggregate's stream.
///
/// The `(stream_name, version)` pair is unique per record and is the
/// optimistic-concurrency anchor enforced by the backing store.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// The stream this event belongs to.
    pub stream_name: StreamName,
    /// The aggregate's entity type name.
    pub entity_type: String,
    /// 1-based, gap-free sequence number within the stream.
    pub version: i64,
    /// Event type name for routing and diagnostics.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// Optional causation/correlation entries.
    pub metadata: BTreeMap<String, String>,
    /// Timestamp of event creation (UTC).
    pub occurred_at: DateTime<Utc>,
}
