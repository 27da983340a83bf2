use super::*;

/// Fixed-size, non-overlapping event-time windows aligned to multiples of `size`.
///
/// A timestamp `ts` belongs to `[floor(ts / size) * size, ... + size)`.
/// Flooring is Euclidean, so timestamps before the epoch still land in the
/// window that contains them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TumblingEventTimeWindows {
    size_ms: i64,
}

impl TumblingEventTimeWindows {
    /// Create tumbling windows of the given `size`.
    ///
    /// Rejects sizes that round down to zero milliseconds or do not fit into
    /// an `EventTime`.
    pub fn of(size: Duration) -> Result<Self> {
        let size_ms = duration_to_millis("window size", size)?;
        if size_ms <= 0 {
            return Err(AggregatorError::InvalidConfiguration(format!(
                "window size must be at least 1ms, got {size:?}"
            )));
        }
        Ok(Self { size_ms })
    }

    pub fn size_ms(&self) -> i64 {
        self.size_ms
    }

    pub fn size(&self) -> Duration {
        Duration::from_millis(self.size_ms as u64)
    }

    /// Return the single window that contains `timestamp`.
    pub fn assign_window(&self, timestamp: EventTime) -> TimeWindow {
        let start = timestamp - timestamp.rem_euclid(self.size_ms);
        self.window_starting_at(start)
    }

    /// Rebuild the window that begins at `start`.
    ///
    /// The top window's end is clamped to [`EventTime::MAX`]; use
    /// [`window_end`](Self::window_end) to tell it apart.
    pub fn window_starting_at(&self, start: EventTime) -> TimeWindow {
        TimeWindow::new(start, start.saturating_add(self.size_ms))
    }

    /// Exact end of the window beginning at `start`, or `None` when it lies
    /// past the last representable event time.
    pub fn window_end(&self, start: EventTime) -> Option<EventTime> {
        start.checked_add(self.size_ms)
    }

    /// Return true if `start` is a window boundary for this size.
    pub fn is_window_start(&self, start: EventTime) -> bool {
        start.rem_euclid(self.size_ms) == 0
    }
}
