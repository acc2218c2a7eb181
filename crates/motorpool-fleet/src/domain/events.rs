//! Domain events for the Fleet context.

use serde::{Deserialize, Serialize};

use motorpool_core::event::DomainEvent;
use motorpool_core::identity::Identifier;

use super::types::{CarStatus, LicensePlate, Manufacturer, TimeSlot, UnavailabilityCause};

/// Event type name for [`Created`].
pub const CREATED_EVENT_TYPE: &str = "car.created";
/// Event type name for [`ManufacturerChanged`].
pub const MANUFACTURER_CHANGED_EVENT_TYPE: &str = "car.manufacturer_changed";
/// Event type name for [`OwnershipChanged`].
pub const OWNERSHIP_CHANGED_EVENT_TYPE: &str = "car.ownership_changed";
/// Event type name for [`RegistrationChanged`].
pub const REGISTRATION_CHANGED_EVENT_TYPE: &str = "car.registration_changed";
/// Event type name for [`UnavailabilitySlotAdded`].
pub const UNAVAILABILITY_SLOT_ADDED_EVENT_TYPE: &str = "car.unavailability_slot_added";
/// Event type name for [`Deleted`].
pub const DELETED_EVENT_TYPE: &str = "car.deleted";

/// Emitted once when a car is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Created {
    /// The car identifier.
    pub car_id: Identifier,
    /// Initial status.
    pub status: CarStatus,
}

/// Emitted when the manufacturer details are set or corrected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManufacturerChanged {
    /// The car identifier.
    pub car_id: Identifier,
    /// The new manufacturer details.
    pub manufacturer: Manufacturer,
}

/// Emitted when ownership is assigned or transferred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipChanged {
    /// The car identifier.
    pub car_id: Identifier,
    /// The new owner.
    pub owner: Identifier,
}

/// Emitted when the registration plate changes; registers the car.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationChanged {
    /// The car identifier.
    pub car_id: Identifier,
    /// The new plate.
    pub plate: LicensePlate,
    /// The status after registration.
    pub status: CarStatus,
}

/// Emitted when an unavailability slot is scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnavailabilitySlotAdded {
    /// The car identifier.
    pub car_id: Identifier,
    /// When the car is unavailable.
    pub slot: TimeSlot,
    /// Why it is unavailable.
    pub cause: UnavailabilityCause,
    /// Optional reference to the causing entity.
    pub reference: Option<String>,
}

/// Emitted when a car is deleted. Terminal: no further events follow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deleted {
    /// The car identifier.
    pub car_id: Identifier,
}

/// The closed set of events a car produces and consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CarEvent {
    /// A car has been created.
    Created(Created),
    /// Manufacturer details have changed.
    ManufacturerChanged(ManufacturerChanged),
    /// Ownership has changed.
    OwnershipChanged(OwnershipChanged),
    /// The registration plate has changed.
    RegistrationChanged(RegistrationChanged),
    /// An unavailability slot has been added.
    UnavailabilitySlotAdded(UnavailabilitySlotAdded),
    /// The car has been deleted.
    Deleted(Deleted),
}

impl DomainEvent for CarEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CarEvent::Created(_) => CREATED_EVENT_TYPE,
            CarEvent::ManufacturerChanged(_) => MANUFACTURER_CHANGED_EVENT_TYPE,
            CarEvent::OwnershipChanged(_) => OWNERSHIP_CHANGED_EVENT_TYPE,
            CarEvent::RegistrationChanged(_) => REGISTRATION_CHANGED_EVENT_TYPE,
            CarEvent::UnavailabilitySlotAdded(_) => UNAVAILABILITY_SLOT_ADDED_EVENT_TYPE,
            CarEvent::Deleted(_) => DELETED_EVENT_TYPE,
        }
    }
}
