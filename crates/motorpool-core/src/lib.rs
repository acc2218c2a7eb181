//! Motorpool Core — the event-sourcing kernel.
//!
//! This crate defines the aggregate, event, store, and repository
//! abstractions that every bounded context depends on. Aggregates mutate
//! state exclusively by raising events, rebuild themselves by replaying
//! their stream, and persist through an append-only store that enforces
//! optimistic concurrency. It contains no infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod error;
pub mod event;
pub mod identity;
pub mod repository;
pub mod store;
pub mod stream;
