use super::*;

/// A half-open event-time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: EventTime,
    pub end: EventTime,
}

impl TimeWindow {
    pub fn new(start: EventTime, end: EventTime) -> Self {
        Self { start, end }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TimeWindow([{}, {}))", self.start, self.end)
    }
}

/// A finalized accumulator handed downstream when its window closes.
///
/// Emissions are owned values; nothing in them is shared with the
/// aggregator that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowEmission<K, ACC> {
    pub key: K,
    pub window: TimeWindow,
    pub accumulator: ACC,
}

impl<K, ACC> WindowEmission<K, ACC> {
    /// Drop the window bounds and keep the `(key, accumulator)` pair.
    pub fn into_pair(self) -> (K, ACC) {
        (self.key, self.accumulator)
    }
}
