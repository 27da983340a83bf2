use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{AggregatorError, FoldError, Result};
use crate::time::{EVENT_TIME_MIN, EventTimeClock, Watermark, duration_to_millis};
use crate::types::{EventTime, StreamData, Timestamped};

mod assigners;
mod functions;
mod operator;
mod primitives;

pub use assigners::*;
pub use functions::*;
pub use operator::*;
pub use primitives::*;

#[cfg(test)]
#[path = "tests/window_tests.rs"]
mod tests;
