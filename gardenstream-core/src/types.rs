use serde::{Deserialize, Serialize};

/// Event time in milliseconds since epoch.
pub type EventTime = i64;

/// An event that carries its own event-time timestamp.
///
/// The aggregator reads the timestamp through this trait; it never parses or
/// rewrites it.
pub trait Timestamped {
    /// Event time of this element in milliseconds since epoch.
    fn event_time(&self) -> EventTime;
}

impl<T: Timestamped> Timestamped for &T {
    fn event_time(&self) -> EventTime {
        (**self).event_time()
    }
}

/// A value paired with an explicit event time.
///
/// Handy for feeding plain values (numbers, tuples) into an aggregator
/// without defining a dedicated event type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamRecord<T> {
    pub value: T,
    pub timestamp: EventTime,
}

impl<T> StreamRecord<T> {
    /// Create a record with an explicit event time.
    pub fn new(value: T, timestamp: EventTime) -> Self {
        Self { value, timestamp }
    }
}

impl<T> Timestamped for StreamRecord<T> {
    fn event_time(&self) -> EventTime {
        self.timestamp
    }
}

/// Trait bound for types that can be snapshotted as aggregator state.
pub trait StreamData: Send + Clone + Serialize + for<'de> Deserialize<'de> + 'static {}

// Blanket implementation: any type satisfying the bounds is StreamData.
impl<T> StreamData for T where T: Send + Clone + Serialize + for<'de> Deserialize<'de> + 'static {}
