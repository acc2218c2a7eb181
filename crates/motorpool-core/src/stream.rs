//! Stream naming.

use std::fmt;

use crate::identity::Identifier;

/// Deterministic key for one aggregate instance's event stream.
///
/// Derived as `{entity_type}_{identifier}`; always resolvable from the
/// (entity type, id) pair and never reused across different aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamName(String);

impl StreamName {
    /// Derives the stream name for an entity type and identifier.
    #[must_use]
    pub fn new(entity_name: &str, entity_id: &Identifier) -> Self {
        Self(format!("{entity_name}_{entity_id}"))
    }

    /// Returns the stream name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
