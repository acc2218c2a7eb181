//! Deterministic `Clock` implementation for tests.

use chrono::{DateTime, Utc};
use motorpool_core::clock::Clock;

/// A clock pinned to one fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
