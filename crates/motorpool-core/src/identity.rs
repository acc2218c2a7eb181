//! Aggregate identifiers and their generation.
//!
//! The id factory is a collaborator passed explicitly into aggregate
//! constructors — never resolved from a container — so replays and tests
//! can substitute deterministic implementations.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unique key for one aggregate instance. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Wraps a raw identifier string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Supplies a new unique [`Identifier`] per aggregate instance.
pub trait IdFactory: Send + Sync {
    /// Generates a fresh identifier.
    fn create_id(&self) -> Identifier;
}

/// Production id factory backed by random v4 UUIDs.
#[derive(Debug, Clone, Copy)]
pub struct UuidIdFactory;

impl IdFactory for UuidIdFactory {
    fn create_id(&self) -> Identifier {
        Identifier::new(Uuid::new_v4().to_string())
    }
}
