//! Shared test mocks and utilities for the Motorpool fleet platform.

mod clock;
mod identity;
mod store;

pub use clock::FixedClock;
pub use identity::{FixedIds, SequenceIds};
pub use store::{FailingEventStore, RecordingEventStore};
