//! Domain layer: aggregates, commands, events, and value objects.

pub mod aggregates;
pub mod commands;
pub mod events;
pub mod types;
