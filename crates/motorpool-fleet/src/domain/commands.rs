//! Commands for the Fleet context.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use motorpool_core::identity::Identifier;

use super::types::UnavailabilityCause;

/// Command to register a new car in the fleet.
#[derive(Debug, Clone)]
pub struct RegisterCar {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

/// Command to set or correct a car's manufacturer details.
#[derive(Debug, Clone)]
pub struct SetManufacturer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The car identifier.
    pub car_id: Identifier,
    /// Make, e.g. "Honda".
    pub make: String,
    /// Model, e.g. "Civic".
    pub model: String,
    /// Model year.
    pub year: i32,
}

/// Command to assign or transfer ownership of a car.
#[derive(Debug, Clone)]
pub struct AssignOwnership {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The car identifier.
    pub car_id: Identifier,
    /// The new owner.
    pub owner: Identifier,
}

/// Command to change a car's registration plate.
#[derive(Debug, Clone)]
pub struct ChangeRegistration {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The car identifier.
    pub car_id: Identifier,
    /// Issuing jurisdiction.
    pub jurisdiction: String,
    /// Plate number.
    pub number: String,
}

/// Command to take a car off the road for a time slot.
#[derive(Debug, Clone)]
pub struct TakeCarOffline {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The car identifier.
    pub car_id: Identifier,
    /// Slot start (UTC).
    pub from: DateTime<Utc>,
    /// Slot end (UTC).
    pub to: DateTime<Utc>,
}

/// Command to schedule an unavailability slot with an explicit cause.
#[derive(Debug, Clone)]
pub struct ScheduleUnavailability {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The car identifier.
    pub car_id: Identifier,
    /// Slot start (UTC).
    pub from: DateTime<Utc>,
    /// Slot end (UTC).
    pub to: DateTime<Utc>,
    /// Why the car is unavailable.
    pub cause: UnavailabilityCause,
    /// Optional reference to the causing entity.
    pub reference: Option<String>,
}

/// Command to delete a car.
#[derive(Debug, Clone)]
pub struct DeleteCar {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The car identifier.
    pub car_id: Identifier,
}
