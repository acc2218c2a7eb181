//! Event store backends for the Motorpool fleet platform.
//!
//! Two implementations of the kernel's `EventStore` trait: a
//! PostgreSQL-backed store for production and an in-memory store with
//! identical concurrency semantics for tests and examples.

pub mod memory;
pub mod postgres;
pub mod schema;

pub use memory::MemoryEventStore;
pub use postgres::PgEventStore;
