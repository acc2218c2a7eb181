//! Value objects for the Fleet context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use motorpool_core::error::DomainError;

/// Lifecycle status of a car. Offline periods are modeled as
/// unavailabilities, not as a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarStatus {
    /// Created but not yet registered for the road.
    Unregistered,
    /// Registered with a license plate.
    Registered,
    /// Terminally deleted; no further mutation is accepted.
    Deleted,
}

/// A half-open time range `[from, to)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Inclusive start.
    pub from: DateTime<Utc>,
    /// Exclusive end.
    pub to: DateTime<Utc>,
}

impl TimeSlot {
    /// Creates a slot, rejecting empty or inverted ranges.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] if `from` is not strictly
    /// before `to`.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self, DomainError> {
        if from < to {
            Ok(Self { from, to })
        } else {
            Err(DomainError::Validation {
                field: "slot",
                reason: "start must be strictly before end".into(),
            })
        }
    }

    /// Whether two slots intersect.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.from < other.to && other.from < self.to
    }
}

/// Why a car is unavailable during a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnavailabilityCause {
    /// Taken off the road by an operator.
    Offline,
    /// In the workshop.
    Maintenance,
    /// Held by a booking.
    Reserved,
    /// Anything else.
    Other,
}

/// A time-bounded unavailability entry on a car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unavailability {
    /// When the car is unavailable.
    pub slot: TimeSlot,
    /// Why it is unavailable.
    pub cause: UnavailabilityCause,
    /// Optional reference to the causing entity (e.g. a booking id).
    pub reference: Option<String>,
}

impl Unavailability {
    /// Whether this entry carries the same cause-and-reference pair.
    #[must_use]
    pub fn same_cause_and_reference(
        &self,
        cause: UnavailabilityCause,
        reference: Option<&str>,
    ) -> bool {
        self.cause == cause && self.reference.as_deref() == reference
    }
}

/// Manufacturer details of a car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    /// Make, e.g. "Honda".
    pub make: String,
    /// Model, e.g. "Civic".
    pub model: String,
    /// Model year.
    pub year: i32,
}

/// A car's registration plate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicensePlate {
    /// Issuing jurisdiction, e.g. "CA".
    pub jurisdiction: String,
    /// Plate number.
    pub number: String,
}
