//! Event store database schema.

/// Name of the event log table, used as the key in the ensured-resource
/// cache.
pub const EVENT_RECORDS_TABLE: &str = "event_records";

/// SQL to create the event log table.
///
/// The composite primary key `(stream_name, version)` is the
/// optimistic-concurrency anchor: the storage engine itself rejects a
/// second insert at the same position.
pub const CREATE_EVENT_RECORDS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS event_records (
    stream_name  VARCHAR(450) NOT NULL,
    entity_type  VARCHAR(255) NOT NULL,
    version      BIGINT NOT NULL,
    event_type   VARCHAR(255) NOT NULL,
    payload      JSONB NOT NULL,
    metadata     JSONB NOT NULL DEFAULT '{}'::jsonb,
    occurred_at  TIMESTAMPTZ NOT NULL,
    PRIMARY KEY (stream_name, version)
);

CREATE INDEX IF NOT EXISTS idx_event_records_entity_type
    ON event_records (entity_type, stream_name);
";
