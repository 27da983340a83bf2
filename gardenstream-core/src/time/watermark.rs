use super::*;

/// Minimum possible event time. Used as the initial "nothing observed" sentinel.
pub const EVENT_TIME_MIN: EventTime = i64::MIN;

/// Event-time progress: every window ending at or before this point is
/// complete and may be emitted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Watermark {
    pub timestamp: EventTime,
}

impl Watermark {
    /// Create a new watermark at the given timestamp.
    pub fn new(timestamp: EventTime) -> Self {
        Self { timestamp }
    }

    /// Return true if a window ending (exclusively) at `end` is complete.
    pub fn covers(&self, end: EventTime) -> bool {
        self.timestamp >= end
    }
}

impl std::fmt::Display for Watermark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Watermark({}ms)", self.timestamp)
    }
}
