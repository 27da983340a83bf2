use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AggregatorError, Result};
use crate::types::EventTime;

mod clock;
mod watermark;

pub use clock::*;
pub use watermark::*;

/// Convert a configuration `Duration` into whole event-time milliseconds.
///
/// Fails when the value does not fit into an `EventTime`.
pub fn duration_to_millis(name: &str, duration: Duration) -> Result<EventTime> {
    EventTime::try_from(duration.as_millis()).map_err(|_| {
        AggregatorError::InvalidConfiguration(format!(
            "{name} of {duration:?} does not fit into i64 milliseconds"
        ))
    })
}

#[cfg(test)]
#[path = "tests/time_tests.rs"]
mod tests;
