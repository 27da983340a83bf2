use super::*;

/// Single event-time clock shared by every key of an aggregator.
///
/// Tracks the latest timestamp observed across all keys. The watermark trails
/// it by the configured grace period, so a window `[start, end)` closes once
/// an event with `timestamp >= end + grace` has been seen.
///
/// The clock never moves backwards: out-of-order events leave it untouched.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventTimeClock {
    grace_ms: i64,
    latest: EventTime,
}

impl EventTimeClock {
    /// Create a clock with no observed events and the given grace period.
    pub fn new(grace_ms: i64) -> Self {
        Self {
            grace_ms,
            latest: EVENT_TIME_MIN,
        }
    }

    /// Notify the clock that an event with `timestamp` was observed.
    ///
    /// Returns `true` when the latest observed timestamp advanced.
    pub fn on_event(&mut self, timestamp: EventTime) -> bool {
        if timestamp > self.latest {
            self.latest = timestamp;
            true
        } else {
            false
        }
    }

    /// Latest observed timestamp, or `None` before the first event.
    pub fn latest(&self) -> Option<EventTime> {
        (self.latest != EVENT_TIME_MIN).then_some(self.latest)
    }

    /// Current watermark (`latest - grace`), or `None` before the first event.
    pub fn watermark(&self) -> Option<Watermark> {
        self.latest()
            .map(|latest| Watermark::new(latest.saturating_sub(self.grace_ms)))
    }

    /// Return true if a window ending (exclusively) at `end` is closed.
    ///
    /// Never true when `end + grace` lies beyond the last representable
    /// event time.
    pub fn is_closed(&self, end: EventTime) -> bool {
        self.watermark().is_some_and(|watermark| watermark.covers(end))
    }

    pub fn grace_ms(&self) -> i64 {
        self.grace_ms
    }
}

impl Default for EventTimeClock {
    fn default() -> Self {
        Self::new(0)
    }
}
