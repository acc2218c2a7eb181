//! Test id factories — deterministic `IdFactory` implementations.

use std::sync::Mutex;

use motorpool_core::identity::{IdFactory, Identifier};

/// An id factory that always returns the same identifier.
#[derive(Debug)]
pub struct FixedIds(pub Identifier);

impl FixedIds {
    /// Creates a factory that always yields `id`.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(Identifier::from(id))
    }
}

impl IdFactory for FixedIds {
    fn create_id(&self) -> Identifier {
        self.0.clone()
    }
}

/// An id factory that yields identifiers from a pre-seeded sequence.
///
/// # Panics
///
/// `create_id` panics when the sequence is exhausted — a test asking
/// for more ids than it seeded is a test bug.
#[derive(Debug)]
pub struct SequenceIds {
    remaining: Mutex<Vec<Identifier>>,
}

impl SequenceIds {
    /// Creates a factory that yields the given ids in order.
    #[must_use]
    pub fn new(ids: &[&str]) -> Self {
        let mut remaining: Vec<Identifier> = ids.iter().map(|id| Identifier::from(*id)).collect();
        remaining.reverse();
        Self {
            remaining: Mutex::new(remaining),
        }
    }
}

impl IdFactory for SequenceIds {
    fn create_id(&self) -> Identifier {
        self.remaining
            .lock()
            .expect("sequence id lock poisoned")
            .pop()
            .expect("SequenceIds exhausted")
    }
}
