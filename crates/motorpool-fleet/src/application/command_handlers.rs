//! Command handlers for the Fleet context.
//!
//! Application-level functions that orchestrate domain logic: load the
//! aggregate, execute the command, persist the resulting events. A
//! concurrency conflict propagates to the caller, whose retry is a whole
//! new load-mutate-save cycle.

use std::collections::BTreeMap;

use uuid::Uuid;

use motorpool_core::error::DomainError;
use motorpool_core::identity::IdFactory;
use motorpool_core::repository::Repository;
use motorpool_core::store::EventStore;

use crate::domain::aggregates::Car;
use crate::domain::commands::{
    AssignOwnership, ChangeRegistration, DeleteCar, RegisterCar, ScheduleUnavailability,
    SetManufacturer, TakeCarOffline,
};
use crate::domain::types::{LicensePlate, Manufacturer, TimeSlot};

fn command_metadata(correlation_id: Uuid) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("correlation_id".to_owned(), correlation_id.to_string()),
        ("causation_id".to_owned(), correlation_id.to_string()),
    ])
}

/// Handles [`RegisterCar`]: creates a fresh aggregate and persists its
/// initial event.
///
/// # Errors
///
/// Returns `DomainError` if creation or persistence fails.
#[tracing::instrument(skip(ids, repository))]
pub async fn handle_register_car<S: EventStore>(
    command: &RegisterCar,
    ids: &dyn IdFactory,
    repository: &Repository<Car, S>,
) -> Result<Car, DomainError> {
    let car = Car::create(ids)?;
    repository
        .save_with_metadata(car, &command_metadata(command.correlation_id))
        .await
}

/// Handles [`SetManufacturer`].
///
/// # Errors
///
/// Returns `DomainError` if loading, the domain call, or persistence
/// fails.
#[tracing::instrument(skip(repository))]
pub async fn handle_set_manufacturer<S: EventStore>(
    command: &SetManufacturer,
    repository: &Repository<Car, S>,
) -> Result<Car, DomainError> {
    let mut car = repository.load(&command.car_id).await?;
    car.set_manufacturer(Manufacturer {
        make: command.make.clone(),
        model: command.model.clone(),
        year: command.year,
    })?;
    repository
        .save_with_metadata(car, &command_metadata(command.correlation_id))
        .await
}

/// Handles [`AssignOwnership`].
///
/// # Errors
///
/// Returns `DomainError` if loading, the domain call, or persistence
/// fails.
#[tracing::instrument(skip(repository))]
pub async fn handle_assign_ownership<S: EventStore>(
    command: &AssignOwnership,
    repository: &Repository<Car, S>,
) -> Result<Car, DomainError> {
    let mut car = repository.load(&command.car_id).await?;
    car.set_ownership(command.owner.clone())?;
    repository
        .save_with_metadata(car, &command_metadata(command.correlation_id))
        .await
}

/// Handles [`ChangeRegistration`].
///
/// # Errors
///
/// Returns `DomainError` if loading, the domain call, or persistence
/// fails.
#[tracing::instrument(skip(repository))]
pub async fn handle_change_registration<S: EventStore>(
    command: &ChangeRegistration,
    repository: &Repository<Car, S>,
) -> Result<Car, DomainError> {
    let mut car = repository.load(&command.car_id).await?;
    car.change_registration(LicensePlate {
        jurisdiction: command.jurisdiction.clone(),
        number: command.number.clone(),
    })?;
    repository
        .save_with_metadata(car, &command_metadata(command.correlation_id))
        .await
}

/// Handles [`TakeCarOffline`].
///
/// # Errors
///
/// Returns `DomainError` if the slot is invalid, or if loading, the
/// domain call, or persistence fails.
#[tracing::instrument(skip(repository))]
pub async fn handle_take_car_offline<S: EventStore>(
    command: &TakeCarOffline,
    repository: &Repository<Car, S>,
) -> Result<Car, DomainError> {
    let slot = TimeSlot::new(command.from, command.to)?;
    let mut car = repository.load(&command.car_id).await?;
    car.take_offline(slot)?;
    repository
        .save_with_metadata(car, &command_metadata(command.correlation_id))
        .await
}

/// Handles [`ScheduleUnavailability`].
///
/// # Errors
///
/// Returns `DomainError` if the slot is invalid, or if loading, the
/// domain call, or persistence fails.
#[tracing::instrument(skip(repository))]
pub async fn handle_schedule_unavailability<S: EventStore>(
    command: &ScheduleUnavailability,
    repository: &Repository<Car, S>,
) -> Result<Car, DomainError> {
    let slot = TimeSlot::new(command.from, command.to)?;
    let mut car = repository.load(&command.car_id).await?;
    car.schedule_unavailability(slot, command.cause, command.reference.clone())?;
    repository
        .save_with_metadata(car, &command_metadata(command.correlation_id))
        .await
}

/// Handles [`DeleteCar`]: raises the terminal `Deleted` event. The
/// stream itself is never removed.
///
/// # Errors
///
/// Returns `DomainError` if loading, the domain call, or persistence
/// fails.
#[tracing::instrument(skip(repository))]
pub async fn handle_delete_car<S: EventStore>(
    command: &DeleteCar,
    repository: &Repository<Car, S>,
) -> Result<Car, DomainError> {
    let mut car = repository.load(&command.car_id).await?;
    car.delete()?;
    repository
        .save_with_metadata(car, &command_metadata(command.correlation_id))
        .await
}
