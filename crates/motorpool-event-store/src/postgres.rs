//! `PostgreSQL` implementation of the `EventStore` trait.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use motorpool_core::error::DomainError;
use motorpool_core::event::EventRecord;
use motorpool_core::identity::Identifier;
use motorpool_core::store::{
    EventStore, check_contiguity, validate_append_request, validate_stream_request,
};
use motorpool_core::stream::StreamName;

use crate::schema;

/// PostgreSQL-backed event store.
///
/// The `(stream_name, version)` composite primary key is the shared
/// mutable resource: a second writer racing to the same position hits a
/// unique violation, which is translated into a concurrency conflict.
///
/// Schema existence is tracked per store instance in an explicit
/// ensured-resource set, reset via [`PgEventStore::reset_ensured`] after
/// a reconnect. The create step is idempotent (`CREATE TABLE IF NOT
/// EXISTS`), so concurrent instances ensuring the same table is
/// harmless.
#[derive(Debug)]
pub struct PgEventStore {
    pool: PgPool,
    ensured: Mutex<HashSet<String>>,
}

impl PgEventStore {
    /// Creates a new `PgEventStore` over the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            ensured: Mutex::new(HashSet::new()),
        }
    }

    /// Clears the ensured-resource cache. Call after reconnecting to a
    /// database that may have been re-provisioned.
    pub fn reset_ensured(&self) {
        self.ensured
            .lock()
            .expect("ensured-resource lock poisoned")
            .clear();
    }

    /// Existence-check-then-create for the event log table. A no-op
    /// once the table has been ensured on this instance.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Infrastructure`] if the DDL fails.
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        {
            let ensured = self.ensured.lock().expect("ensured-resource lock poisoned");
            if ensured.contains(schema::EVENT_RECORDS_TABLE) {
                return Ok(());
            }
        }

        sqlx::raw_sql(schema::CREATE_EVENT_RECORDS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "event table creation failed");
                DomainError::Infrastructure(format!("event table creation failed: {e}"))
            })?;

        self.ensured
            .lock()
            .expect("ensured-resource lock poisoned")
            .insert(schema::EVENT_RECORDS_TABLE.to_owned());
        Ok(())
    }

    async fn latest_version(&self, stream_name: &StreamName) -> Result<Option<i64>, DomainError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT version FROM event_records WHERE stream_name = $1 \
             ORDER BY version DESC LIMIT 1",
        )
        .bind(stream_name.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(stream = %stream_name, error = %e, "latest version lookup failed");
            DomainError::Infrastructure(format!("latest version lookup failed: {e}"))
        })
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn append_events(
        &self,
        entity_name: &str,
        entity_id: &Identifier,
        records: &[EventRecord],
    ) -> Result<StreamName, DomainError> {
        let stream_name = validate_append_request(entity_name, entity_id, records)?;
        self.ensure_schema().await?;

        // Cheap up-front gate; the per-record insert below is the
        // authoritative one under concurrent writers.
        let last_stored = self.latest_version(&stream_name).await?;
        check_contiguity(&stream_name, last_stored, records[0].version)?;

        for record in records {
            let result = sqlx::query(
                "INSERT INTO event_records \
                 (stream_name, entity_type, version, event_type, payload, metadata, occurred_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(record.stream_name.as_str())
            .bind(&record.entity_type)
            .bind(record.version)
            .bind(&record.event_type)
            .bind(&record.payload)
            .bind(sqlx::types::Json(&record.metadata))
            .bind(record.occurred_at)
            .execute(&self.pool)
            .await;

            // Stop at the first failure: the committed prefix is
            // gap-free and the caller retries from the actual latest
            // version.
            if let Err(err) = result {
                if is_unique_violation(&err) {
                    return Err(DomainError::ConcurrencyConflict {
                        stream_name: stream_name.clone(),
                        version: record.version,
                    });
                }
                tracing::error!(
                    stream = %stream_name,
                    version = record.version,
                    error = %err,
                    "event insert failed"
                );
                return Err(DomainError::Infrastructure(format!(
                    "event insert failed: {err}"
                )));
            }
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
        self.ensure_schema().await?;

        let rows = sqlx::query(
            "SELECT entity_type, version, event_type, payload, metadata, occurred_at \
             FROM event_records WHERE stream_name = $1 ORDER BY version ASC",
        )
        .bind(stream_name.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(stream = %stream_name, error = %e, "stream read failed");
            DomainError::Infrastructure(format!("stream read failed: {e}"))
        })?;

        rows.into_iter()
            .map(|row| {
                Ok(EventRecord {
                    stream_name: stream_name.clone(),
                    entity_type: column(&row, "entity_type")?,
                    version: column(&row, "version")?,
                    event_type: column(&row, "event_type")?,
                    payload: column(&row, "payload")?,
                    metadata: column::<sqlx::types::Json<BTreeMap<String, String>>>(
                        &row, "metadata",
                    )?
                    .0,
                    occurred_at: column::<DateTime<Utc>>(&row, "occurred_at")?,
                })
            })
            .collect()
    }
}

fn column<'r, T>(row: &'r sqlx::postgres::PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| DomainError::Infrastructure(format!("column `{name}` decode failed: {e}")))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}
