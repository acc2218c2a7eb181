//! Behavior tests for `MemoryEventStore`, which must match the
//! PostgreSQL backend's concurrency semantics exactly.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use motorpool_core::error::DomainError;
use motorpool_core::event::EventRecord;
use motorpool_core::identity::Identifier;
use motorpool_core::store::EventStore;
use motorpool_core::stream::StreamName;
use motorpool_event_store::MemoryEventStore;

/// Helper to build an `EventRecord` with sensible defaults.
fn make_record(entity_id: &str, version: i64) -> EventRecord {
    EventRecord {
        stream_name: StreamName::new("Car", &Identifier::from(entity_id)),
        entity_type: "Car".to_owned(),
        version,
        event_type: "car.test_event".to_owned(),
        payload: serde_json::json!({"key": "value"}),
        metadata: BTreeMap::new(),
        occurred_at: Utc::now(),
    }
}

fn car_id(entity_id: &str) -> Identifier {
    Identifier::from(entity_id)
}

// --- read_stream ---

#[tokio::test]
async fn test_read_stream_returns_empty_vec_for_absent_stream() {
    let store = MemoryEventStore::new();

    let records = store.read_stream("Car", &car_id("missing")).await.unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
async fn test_read_stream_rejects_empty_entity_name() {
    let store = MemoryEventStore::new();

    let result = store.read_stream("", &car_id("car-1")).await;

    match result {
        Err(DomainError::Validation { field, .. }) => assert_eq!(field, "entity_name"),
        other => panic!("expected Validation, got {other:?}"),
    }
}

// --- append_events ---

#[tokio::test]
async fn test_append_returns_the_stream_name() {
    let store = MemoryEventStore::new();

    let stream = store
        .append_events("Car", &car_id("car-1"), &[make_record("car-1", 1)])
        .await
        .unwrap();

    assert_eq!(stream.as_str(), "Car_car-1");
}

#[tokio::test]
async fn test_append_rejects_empty_batch() {
    let store = MemoryEventStore::new();

    let result = store.append_events("Car", &car_id("car-1"), &[]).await;

    match result {
        Err(DomainError::Validation { field, .. }) => assert_eq!(field, "events"),
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_append_and_read_preserve_version_order() {
    let store = MemoryEventStore::new();
    let records = vec![
        make_record("car-1", 1),
        make_record("car-1", 2),
        make_record("car-1", 3),
    ];

    store
        .append_events("Car", &car_id("car-1"), &records)
        .await
        .unwrap();

    let loaded = store.read_stream("Car", &car_id("car-1")).await.unwrap();
    assert_eq!(loaded.len(), 3);
    for (i, record) in loaded.iter().enumerate() {
        assert_eq!(record.version, i64::try_from(i + 1).unwrap());
    }
}

#[tokio::test]
async fn test_streams_are_isolated() {
    let store = MemoryEventStore::new();

    store
        .append_events("Car", &car_id("car-a"), &[make_record("car-a", 1)])
        .await
        .unwrap();
    store
        .append_events("Car", &car_id("car-b"), &[make_record("car-b", 1)])
        .await
        .unwrap();

    let loaded_a = store.read_stream("Car", &car_id("car-a")).await.unwrap();
    let loaded_b = store.read_stream("Car", &car_id("car-b")).await.unwrap();

    assert_eq!(loaded_a.len(), 1);
    assert_eq!(loaded_b.len(), 1);
    assert_eq!(loaded_a[0].stream_name.as_str(), "Car_car-a");
    assert_eq!(loaded_b[0].stream_name.as_str(), "Car_car-b");
}

// --- contiguity ---

#[tokio::test]
async fn test_first_append_must_start_at_version_one() {
    let store = MemoryEventStore::new();

    let result = store
        .append_events("Car", &car_id("car-1"), &[make_record("car-1", 2)])
        .await;

    match result {
        Err(DomainError::ConcurrencyConflict {
            stream_name,
            version,
        }) => {
            assert_eq!(stream_name.as_str(), "Car_car-1");
            assert_eq!(version, 2);
        }
        other => panic!("expected ConcurrencyConflict, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rejected_first_append_leaves_no_stream_behind() {
    let store = MemoryEventStore::new();

    let result = store
        .append_events("Car", &car_id("car-1"), &[make_record("car-1", 2)])
        .await;

    // The rejected append must not register the stream.
    assert!(matches!(
        result,
        Err(DomainError::ConcurrencyConflict { .. })
    ));
    assert_eq!(store.stream_count(), 0);
    let loaded = store.read_stream("Car", &car_id("car-1")).await.unwrap();
    assert!(loaded.is_empty());
}

#[tokio::test]
async fn test_stale_append_is_a_concurrency_conflict() {
    let store = MemoryEventStore::new();
    store
        .append_events(
            "Car",
            &car_id("car-1"),
            &[make_record("car-1", 1), make_record("car-1", 2)],
        )
        .await
        .unwrap();

    // A writer with a stale read tries to continue from version 2.
    let result = store
        .append_events("Car", &car_id("car-1"), &[make_record("car-1", 2)])
        .await;

    match result {
        Err(DomainError::ConcurrencyConflict { version, .. }) => assert_eq!(version, 2),
        other => panic!("expected ConcurrencyConflict, got {other:?}"),
    }

    // The stored history is untouched.
    let loaded = store.read_stream("Car", &car_id("car-1")).await.unwrap();
    assert_eq!(loaded.len(), 2);
}

#[tokio::test]
async fn test_contiguous_appends_succeed_in_sequence() {
    let store = MemoryEventStore::new();

    store
        .append_events("Car", &car_id("car-1"), &[make_record("car-1", 1)])
        .await
        .unwrap();
    store
        .append_events(
            "Car",
            &car_id("car-1"),
            &[make_record("car-1", 2), make_record("car-1", 3)],
        )
        .await
        .unwrap();

    let loaded = store.read_stream("Car", &car_id("car-1")).await.unwrap();
    assert_eq!(loaded.len(), 3);
}

// --- mutual exclusion ---

#[tokio::test]
async fn test_racing_appends_have_exactly_one_winner() {
    let store = Arc::new(MemoryEventStore::new());

    // Both writers loaded version 0 and race to write version 1.
    let first = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            store
                .append_events("Car", &car_id("car-1"), &[make_record("car-1", 1)])
                .await
        })
    };
    let second = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            store
                .append_events("Car", &car_id("car-1"), &[make_record("car-1", 1)])
                .await
        })
    };

    let outcomes = [first.await.unwrap(), second.await.unwrap()];
    let winners = outcomes.iter().filter(|r| r.is_ok()).count();
    let conflicts = outcomes
        .iter()
        .filter(|r| matches!(r, Err(DomainError::ConcurrencyConflict { .. })))
        .count();

    assert_eq!(winners, 1);
    assert_eq!(conflicts, 1);

    let loaded = store.read_stream("Car", &car_id("car-1")).await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].version, 1);
}
