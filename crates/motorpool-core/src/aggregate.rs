//! Aggregate root abstraction.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::DomainError;
use crate::event::DomainEvent;
use crate::identity::Identifier;

/// Trait for aggregate roots that reconstitute from event history.
///
/// Implementations keep exactly one path into state mutation: domain
/// methods validate preconditions, then apply a newly constructed event
/// and push it onto the uncommitted list. Replay uses the same `apply`,
/// so mutation and reconstruction can never drift apart.
pub trait AggregateRoot: Send + Sync {
    /// The closed set of events this aggregate produces and consumes.
    type Event: DomainEvent + Serialize + DeserializeOwned;

    /// The entity type name used to derive stream names.
    fn entity_name() -> &'static str
    where
        Self: Sized;

    /// Produces an empty shell with no uncommitted events, used
    /// exclusively as the fold target when replaying a loaded stream.
    fn rehydrate(id: Identifier) -> Self
    where
        Self: Sized;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Identifier;

    /// Returns the last-known persisted version (0 before first save).
    fn version(&self) -> i64;

    /// Records the persisted version after a load or save.
    fn set_version(&mut self, version: i64);

    /// Applies an event to mutate internal state. Pure and total over
    /// the event enum: the match is exhaustive, so adding a variant is
    /// a compile error, never a silent no-op.
    fn apply(&mut self, event: &Self::Event);

    /// Returns events raised since load/creation, in raise order.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Clears uncommitted events after persistence.
    fn clear_uncommitted_events(&mut self);

    /// Evaluates business invariants against current state on demand.
    ///
    /// Never called automatically on mutation — an aggregate may pass
    /// through valid intermediate states before all required fields are
    /// set.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::RuleViolation`] naming the first failing
    /// invariant.
    fn ensure_invariants(&self) -> Result<(), DomainError>;
}
