//! Application layer: command handlers orchestrating domain logic.

pub mod command_handlers;
