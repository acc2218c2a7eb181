//! Aggregate roots for the Fleet context.

use motorpool_core::aggregate::AggregateRoot;
use motorpool_core::error::DomainError;
use motorpool_core::identity::{IdFactory, Identifier};

use super::events::{
    CarEvent, Created, Deleted, ManufacturerChanged, OwnershipChanged, RegistrationChanged,
    UnavailabilitySlotAdded,
};
use super::types::{
    CarStatus, LicensePlate, Manufacturer, TimeSlot, Unavailability, UnavailabilityCause,
};

/// Entity type name for cars; the first half of every car stream name.
pub const CAR_ENTITY_NAME: &str = "Car";

/// The aggregate root for a car.
///
/// State is derived solely from the car's own event history. Every
/// mutation goes through [`Car::raise`]: validate preconditions, apply
/// the event, push it onto the uncommitted list. Replay during load
/// uses the same `apply`, so mutation and reconstruction are one code
/// path.
#[derive(Debug, PartialEq)]
pub struct Car {
    id: Identifier,
    version: i64,
    uncommitted_events: Vec<CarEvent>,
    status: CarStatus,
    manufacturer: Option<Manufacturer>,
    owner: Option<Identifier>,
    license_plate: Option<LicensePlate>,
    unavailabilities: Vec<Unavailability>,
}

impl Car {
    /// Creates a new car with a freshly generated identifier and raises
    /// the initial [`Created`] event. In-memory only; not yet durable.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] if the generated identifier
    /// is empty.
    pub fn create(ids: &dyn IdFactory) -> Result<Self, DomainError> {
        let id = ids.create_id();
        if id.as_str().trim().is_empty() {
            return Err(DomainError::Validation {
                field: "id",
                reason: "generated identifier must not be empty".into(),
            });
        }
        let mut car = Self::shell(id.clone());
        car.raise(CarEvent::Created(Created {
            car_id: id,
            status: CarStatus::Unregistered,
        }));
        Ok(car)
    }

    fn shell(id: Identifier) -> Self {
        Self {
            id,
            version: 0,
            uncommitted_events: Vec::new(),
            status: CarStatus::Unregistered,
            manufacturer: None,
            owner: None,
            license_plate: None,
            unavailabilities: Vec::new(),
        }
    }

    /// The single path into state mutation.
    fn raise(&mut self, event: CarEvent) {
        self.apply(&event);
        self.uncommitted_events.push(event);
    }

    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> CarStatus {
        self.status
    }

    /// Returns the manufacturer details, if set.
    #[must_use]
    pub fn manufacturer(&self) -> Option<&Manufacturer> {
        self.manufacturer.as_ref()
    }

    /// Returns the owner, if assigned.
    #[must_use]
    pub fn owner(&self) -> Option<&Identifier> {
        self.owner.as_ref()
    }

    /// Returns the license plate, if registered.
    #[must_use]
    pub fn license_plate(&self) -> Option<&LicensePlate> {
        self.license_plate.as_ref()
    }

    /// Returns the current unavailability entries.
    #[must_use]
    pub fn unavailabilities(&self) -> &[Unavailability] {
        &self.unavailabilities
    }

    /// Sets or corrects the manufacturer details.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] for blank make/model or an
    /// implausible year, or [`DomainError::RuleViolation`] if the car
    /// is deleted.
    pub fn set_manufacturer(&mut self, manufacturer: Manufacturer) -> Result<(), DomainError> {
        self.ensure_not_deleted()?;
        if manufacturer.make.trim().is_empty() {
            return Err(DomainError::Validation {
                field: "make",
                reason: "must not be empty".into(),
            });
        }
        if manufacturer.model.trim().is_empty() {
            return Err(DomainError::Validation {
                field: "model",
                reason: "must not be empty".into(),
            });
        }
        if !(1900..=2100).contains(&manufacturer.year) {
            return Err(DomainError::Validation {
                field: "year",
                reason: format!("{} is outside the accepted range", manufacturer.year),
            });
        }
        self.raise(CarEvent::ManufacturerChanged(ManufacturerChanged {
            car_id: self.id.clone(),
            manufacturer,
        }));
        Ok(())
    }

    /// Assigns or transfers ownership.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] for an empty owner id or
    /// [`DomainError::RuleViolation`] if the car is deleted.
    pub fn set_ownership(&mut self, owner: Identifier) -> Result<(), DomainError> {
        self.ensure_not_deleted()?;
        if owner.as_str().trim().is_empty() {
            return Err(DomainError::Validation {
                field: "owner",
                reason: "must not be empty".into(),
            });
        }
        self.raise(CarEvent::OwnershipChanged(OwnershipChanged {
            car_id: self.id.clone(),
            owner,
        }));
        Ok(())
    }

    /// Changes the registration plate, moving the car to
    /// [`CarStatus::Registered`].
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] for blank plate fields or
    /// [`DomainError::RuleViolation`] if the car is deleted.
    pub fn change_registration(&mut self, plate: LicensePlate) -> Result<(), DomainError> {
        self.ensure_not_deleted()?;
        if plate.jurisdiction.trim().is_empty() {
            return Err(DomainError::Validation {
                field: "jurisdiction",
                reason: "must not be empty".into(),
            });
        }
        if plate.number.trim().is_empty() {
            return Err(DomainError::Validation {
                field: "number",
                reason: "must not be empty".into(),
            });
        }
        self.raise(CarEvent::RegistrationChanged(RegistrationChanged {
            car_id: self.id.clone(),
            plate,
            status: CarStatus::Registered,
        }));
        Ok(())
    }

    /// Takes the car off the road for the given slot (an
    /// operator-caused unavailability with no reference).
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::RuleViolation`] if the car is not
    /// registered, is deleted, or the slot conflicts with an existing
    /// unavailability of a different cause or reference.
    pub fn take_offline(&mut self, slot: TimeSlot) -> Result<(), DomainError> {
        self.ensure_not_deleted()?;
        if self.status != CarStatus::Registered {
            return Err(DomainError::RuleViolation(
                "car must be registered before it can be taken offline".into(),
            ));
        }
        self.schedule_unavailability(slot, UnavailabilityCause::Offline, None)
    }

    /// Schedules an unavailability slot.
    ///
    /// Against each existing entry the policy is a tri-state branch on
    /// (overlaps?, same cause?, same reference?):
    /// - no overlap: a new entry is added;
    /// - overlap with the same cause and reference: every matching
    ///   entry collapses into one that takes the incoming slot;
    /// - overlap with a different cause or reference: rejected.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::RuleViolation`] for an overlapping slot
    /// with a different cause or reference, or if the car is deleted.
    pub fn schedule_unavailability(
        &mut self,
        slot: TimeSlot,
        cause: UnavailabilityCause,
        reference: Option<String>,
    ) -> Result<(), DomainError> {
        self.ensure_not_deleted()?;
        for existing in &self.unavailabilities {
            if existing.slot.overlaps(&slot)
                && !existing.same_cause_and_reference(cause, reference.as_deref())
            {
                return Err(DomainError::RuleViolation(format!(
                    "overlapping slot: {} to {} intersects an existing unavailability with a different cause or reference",
                    slot.from, slot.to
                )));
            }
        }
        self.raise(CarEvent::UnavailabilitySlotAdded(UnavailabilitySlotAdded {
            car_id: self.id.clone(),
            slot,
            cause,
            reference,
        }));
        Ok(())
    }

    /// Deletes the car. Hard deletes are modeled as this terminal
    /// event, never as row removal; all further mutation is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::RuleViolation`] if the car is already
    /// deleted.
    pub fn delete(&mut self) -> Result<(), DomainError> {
        self.ensure_not_deleted()?;
        self.raise(CarEvent::Deleted(Deleted {
            car_id: self.id.clone(),
        }));
        Ok(())
    }

    fn ensure_not_deleted(&self) -> Result<(), DomainError> {
        if self.status == CarStatus::Deleted {
            return Err(DomainError::RuleViolation("car is deleted".into()));
        }
        Ok(())
    }

    fn apply_unavailability(&mut self, added: &UnavailabilitySlotAdded) {
        // Every overlapping entry with the same cause and reference
        // collapses into one entry carrying the incoming slot; a
        // bridging slot can swallow several at once.
        self.unavailabilities.retain(|existing| {
            !(existing.slot.overlaps(&added.slot)
                && existing.same_cause_and_reference(added.cause, added.reference.as_deref()))
        });
        self.unavailabilities.push(Unavailability {
            slot: added.slot,
            cause: added.cause,
            reference: added.reference.clone(),
        });
    }
}

impl AggregateRoot for Car {
    type Event = CarEvent;

    fn entity_name() -> &'static str {
        CAR_ENTITY_NAME
    }

    fn rehydrate(id: Identifier) -> Self {
        Self::shell(id)
    }

    fn id(&self) -> &Identifier {
        &self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    fn apply(&mut self, event: &CarEvent) {
        match event {
            CarEvent::Created(created) => {
                self.status = created.status;
            }
            CarEvent::ManufacturerChanged(changed) => {
                self.manufacturer = Some(changed.manufacturer.clone());
            }
            CarEvent::OwnershipChanged(changed) => {
                self.owner = Some(changed.owner.clone());
            }
            CarEvent::RegistrationChanged(changed) => {
                self.license_plate = Some(changed.plate.clone());
                self.status = changed.status;
            }
            CarEvent::UnavailabilitySlotAdded(added) => {
                self.apply_unavailability(added);
            }
            CarEvent::Deleted(_) => {
                self.status = CarStatus::Deleted;
            }
        }
    }

    fn uncommitted_events(&self) -> &[CarEvent] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }

    fn ensure_invariants(&self) -> Result<(), DomainError> {
        if self.status == CarStatus::Registered {
            if self.manufacturer.is_none() {
                return Err(DomainError::RuleViolation(
                    "a registered car must have a manufacturer".into(),
                ));
            }
            if self.owner.is_none() {
                return Err(DomainError::RuleViolation(
                    "a registered car must have an owner".into(),
                ));
            }
            if self.license_plate.is_none() {
                return Err(DomainError::RuleViolation(
                    "a registered car must have a license plate".into(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use motorpool_core::aggregate::AggregateRoot;
    use motorpool_core::error::DomainError;
    use motorpool_core::identity::Identifier;

    use super::Car;
    use crate::domain::types::{
        CarStatus, LicensePlate, Manufacturer, TimeSlot, UnavailabilityCause,
    };
    use motorpool_test_support::FixedIds;

    fn t(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap()
    }

    fn slot(from_hour: u32, to_hour: u32) -> TimeSlot {
        TimeSlot::new(t(from_hour), t(to_hour)).unwrap()
    }

    fn honda() -> Manufacturer {
        Manufacturer {
            make: "Honda".into(),
            model: "Civic".into(),
            year: 2024,
        }
    }

    fn plate() -> LicensePlate {
        LicensePlate {
            jurisdiction: "CA".into(),
            number: "ABC123".into(),
        }
    }

    fn registered_car() -> Car {
        let mut car = Car::create(&FixedIds::new("car-1")).unwrap();
        car.set_manufacturer(honda()).unwrap();
        car.set_ownership(Identifier::from("owner-1")).unwrap();
        car.change_registration(plate()).unwrap();
        car
    }

    #[test]
    fn test_create_raises_single_created_event() {
        let car = Car::create(&FixedIds::new("car-1")).unwrap();

        assert_eq!(car.id().as_str(), "car-1");
        assert_eq!(car.version(), 0);
        assert_eq!(car.status(), CarStatus::Unregistered);
        assert_eq!(car.uncommitted_events().len(), 1);
    }

    #[test]
    fn test_create_rejects_empty_generated_id() {
        let result = Car::create(&FixedIds::new(""));

        assert!(matches!(
            result,
            Err(DomainError::Validation { field: "id", .. })
        ));
    }

    #[test]
    fn test_registration_requires_non_blank_plate() {
        let mut car = Car::create(&FixedIds::new("car-1")).unwrap();

        let result = car.change_registration(LicensePlate {
            jurisdiction: "CA".into(),
            number: "  ".into(),
        });

        assert!(matches!(
            result,
            Err(DomainError::Validation { field: "number", .. })
        ));
        assert_eq!(car.uncommitted_events().len(), 1);
    }

    #[test]
    fn test_take_offline_requires_registration() {
        let mut car = Car::create(&FixedIds::new("car-1")).unwrap();

        let result = car.take_offline(slot(10, 11));

        assert!(matches!(result, Err(DomainError::RuleViolation(_))));
        assert!(car.unavailabilities().is_empty());
    }

    #[test]
    fn test_take_offline_records_one_unavailability() {
        let mut car = registered_car();

        car.take_offline(slot(10, 11)).unwrap();

        assert_eq!(car.unavailabilities().len(), 1);
        assert_eq!(car.unavailabilities()[0].slot, slot(10, 11));
        assert_eq!(
            car.unavailabilities()[0].cause,
            UnavailabilityCause::Offline
        );
    }

    #[test]
    fn test_overlapping_slot_with_same_cause_and_reference_merges() {
        let mut car = registered_car();
        car.schedule_unavailability(slot(10, 11), UnavailabilityCause::Other, None)
            .unwrap();

        // Wider slot, same cause-and-reference: merge, not duplicate.
        car.schedule_unavailability(slot(10, 15), UnavailabilityCause::Other, None)
            .unwrap();

        assert_eq!(car.unavailabilities().len(), 1);
        assert_eq!(car.unavailabilities()[0].slot, slot(10, 15));
    }

    #[test]
    fn test_bridging_slot_merges_every_overlapping_entry() {
        let mut car = registered_car();
        car.schedule_unavailability(slot(10, 11), UnavailabilityCause::Other, None)
            .unwrap();
        car.schedule_unavailability(slot(12, 13), UnavailabilityCause::Other, None)
            .unwrap();

        // A slot spanning both existing entries collapses them into one.
        car.schedule_unavailability(slot(10, 13), UnavailabilityCause::Other, None)
            .unwrap();

        assert_eq!(car.unavailabilities().len(), 1);
        assert_eq!(car.unavailabilities()[0].slot, slot(10, 13));
    }

    #[test]
    fn test_overlapping_slot_with_different_cause_is_rejected() {
        let mut car = registered_car();
        car.schedule_unavailability(slot(10, 11), UnavailabilityCause::Other, None)
            .unwrap();
        let events_before = car.uncommitted_events().len();

        let result = car.schedule_unavailability(slot(10, 15), UnavailabilityCause::Offline, None);

        match result {
            Err(DomainError::RuleViolation(message)) => {
                assert!(message.contains("overlapping slot"));
            }
            other => panic!("expected RuleViolation, got {other:?}"),
        }
        // Original entry unchanged, nothing raised.
        assert_eq!(car.unavailabilities().len(), 1);
        assert_eq!(car.unavailabilities()[0].slot, slot(10, 11));
        assert_eq!(car.uncommitted_events().len(), events_before);
    }

    #[test]
    fn test_overlapping_slot_with_different_reference_is_rejected() {
        let mut car = registered_car();
        car.schedule_unavailability(
            slot(10, 12),
            UnavailabilityCause::Reserved,
            Some("booking-1".into()),
        )
        .unwrap();

        let result = car.schedule_unavailability(
            slot(11, 13),
            UnavailabilityCause::Reserved,
            Some("booking-2".into()),
        );

        assert!(matches!(result, Err(DomainError::RuleViolation(_))));
        assert_eq!(car.unavailabilities().len(), 1);
    }

    #[test]
    fn test_non_overlapping_slots_accumulate() {
        let mut car = registered_car();

        car.schedule_unavailability(slot(10, 11), UnavailabilityCause::Other, None)
            .unwrap();
        car.schedule_unavailability(slot(12, 13), UnavailabilityCause::Offline, None)
            .unwrap();

        assert_eq!(car.unavailabilities().len(), 2);
    }

    #[test]
    fn test_deleted_car_rejects_further_mutation() {
        let mut car = registered_car();
        car.delete().unwrap();

        assert_eq!(car.status(), CarStatus::Deleted);
        assert!(matches!(
            car.set_ownership(Identifier::from("owner-2")),
            Err(DomainError::RuleViolation(_))
        ));
        assert!(matches!(car.delete(), Err(DomainError::RuleViolation(_))));
    }

    #[test]
    fn test_ensure_invariants_names_first_missing_field() {
        let mut car = Car::create(&FixedIds::new("car-1")).unwrap();
        car.change_registration(plate()).unwrap();

        match car.ensure_invariants() {
            Err(DomainError::RuleViolation(message)) => {
                assert!(message.contains("manufacturer"));
            }
            other => panic!("expected RuleViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_ensure_invariants_passes_for_complete_registration() {
        let car = registered_car();

        assert!(car.ensure_invariants().is_ok());
    }

    #[test]
    fn test_replay_reproduces_state_field_for_field() {
        let mut car = registered_car();
        car.take_offline(slot(10, 11)).unwrap();

        // Fold the raised events onto a blank shell, as load does.
        let mut replayed = Car::rehydrate(Identifier::from("car-1"));
        for event in car.uncommitted_events() {
            replayed.apply(event);
        }

        assert_eq!(replayed.status(), car.status());
        assert_eq!(replayed.manufacturer(), car.manufacturer());
        assert_eq!(replayed.owner(), car.owner());
        assert_eq!(replayed.license_plate(), car.license_plate());
        assert_eq!(replayed.unavailabilities(), car.unavailabilities());
    }
}
