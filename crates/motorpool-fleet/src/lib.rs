//! Motorpool — Fleet bounded context.
//!
//! Responsible for the vehicle lifecycle: registration, ownership,
//! manufacturer details, and unavailability scheduling.

pub mod application;
pub mod domain;
