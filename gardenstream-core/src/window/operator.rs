use super::*;

// ── WindowedAggregator ────────────────────────────────────────────────────────

type KeyFn<T, K> = Box<dyn Fn(&T) -> K + Send>;

struct AggregatorConfig<T, K, ACC> {
    assigner: TumblingEventTimeWindows,
    key_fn: KeyFn<T, K>,
    aggregate: Box<dyn AggregateFunction<T, ACC>>,
}

/// Keyed, event-time tumbling-window aggregator.
///
/// Keeps exactly one accumulator per `(key, window start)` pair and emits it
/// once the window closes.
///
/// # Processing model
///
/// - **Fold**: each event is assigned to the window containing its timestamp;
///   the accumulator for `(key, window)` is created lazily from the zero
///   factory and replaced by `fold(acc, event)`.
/// - **Close**: time is driven by the latest timestamp observed across *all*
///   keys. A window `[start, end)` closes once an event with
///   `timestamp >= end + grace` has been processed; its accumulator is then
///   emitted and removed from the table.
/// - **Late events**: an event whose window is already closed is counted and
///   dropped. It produces no emissions and no error.
///
/// Per pair the lifecycle is `ABSENT -> OPEN -> CLOSED -> ABSENT`. A closed
/// window is never reopened, which is why late events are dropped instead of
/// starting a fresh accumulator.
///
/// The aggregator is a single-writer structure: it holds no locks and must be
/// driven from one thread at a time (see [`crate::channel::IngestionPoint`]
/// for funnelling several producers into it).
pub struct WindowedAggregator<T, K, ACC> {
    config: Option<AggregatorConfig<T, K, ACC>>,
    grace: Duration,
    /// Open accumulators ordered by (window start, key). All windows share one
    /// size, so the first entry is always the next one to close.
    windows: BTreeMap<(EventTime, K), ACC>,
    clock: EventTimeClock,
    /// End of the latest window force-closed by `flush`.
    flushed_through: EventTime,
    late_events_dropped: u64,
}

#[derive(Serialize, Deserialize)]
struct AggregatorSnapshot<K, ACC> {
    open_windows: Vec<(EventTime, K, ACC)>,
    latest_timestamp: Option<EventTime>,
    flushed_through: EventTime,
    late_events_dropped: u64,
}

impl<T, K, ACC> WindowedAggregator<T, K, ACC>
where
    T: Timestamped,
    K: Ord,
{
    /// Create an unconfigured aggregator with no grace period.
    pub fn new() -> Self {
        Self::with_grace_period(Duration::ZERO)
    }

    /// Create an unconfigured aggregator that keeps windows open for `grace`
    /// past their nominal end.
    pub fn with_grace_period(grace: Duration) -> Self {
        Self {
            config: None,
            grace,
            windows: BTreeMap::new(),
            clock: EventTimeClock::default(),
            flushed_through: EVENT_TIME_MIN,
            late_events_dropped: 0,
        }
    }

    /// Register the key extractor, zero factory and fold function.
    ///
    /// - `window_size`: tumbling window length, at least 1ms
    /// - `key_fn`: extracts the grouping key from each event
    /// - `zero_fn`: creates the accumulator for a new `(key, window)` pair
    /// - `fold_fn`: returns the accumulator that replaces `acc` after `event`
    ///
    /// Must be called exactly once, before the first [`process`](Self::process).
    pub fn configure<KF, ZF, FF>(
        &mut self,
        window_size: Duration,
        key_fn: KF,
        zero_fn: ZF,
        fold_fn: FF,
    ) -> Result<()>
    where
        KF: Fn(&T) -> K + Send + 'static,
        ZF: Fn() -> ACC + Send + 'static,
        FF: Fn(&ACC, &T) -> ACC + Send + 'static,
    {
        self.configure_aggregate(window_size, key_fn, FnAggregate::new(zero_fn, fold_fn))
    }

    /// Same as [`configure`](Self::configure) with an arbitrary
    /// [`AggregateFunction`], including ones whose fold can fail.
    pub fn configure_aggregate<KF, AF>(
        &mut self,
        window_size: Duration,
        key_fn: KF,
        aggregate: AF,
    ) -> Result<()>
    where
        KF: Fn(&T) -> K + Send + 'static,
        AF: AggregateFunction<T, ACC> + 'static,
    {
        if self.config.is_some() {
            return Err(AggregatorError::Configuration(
                "aggregator is already configured",
            ));
        }
        let assigner = TumblingEventTimeWindows::of(window_size)?;
        let grace_ms = duration_to_millis("grace period", self.grace)?;

        self.clock = EventTimeClock::new(grace_ms);
        self.config = Some(AggregatorConfig {
            assigner,
            key_fn: Box::new(key_fn),
            aggregate: Box::new(aggregate),
        });
        debug!(
            window_size_ms = assigner.size_ms(),
            grace_ms, "windowed aggregator configured"
        );
        Ok(())
    }

    /// Fold one event and return every window that closed as a result.
    ///
    /// Emissions come out ordered by window start, then by key.
    ///
    /// On a [`FoldError`] the event is skipped: the accumulator table, the
    /// clock and the late-event counter stay exactly as they were.
    pub fn process(&mut self, event: &T) -> Result<Vec<WindowEmission<K, ACC>>> {
        let Some(config) = self.config.as_ref() else {
            return Err(AggregatorError::Configuration(
                "process called before configure",
            ));
        };

        let timestamp = event.event_time();
        let window = config.assigner.assign_window(timestamp);
        if is_window_closed(&self.clock, &config.assigner, window.start)
            || window.end <= self.flushed_through
        {
            self.late_events_dropped += 1;
            debug!(
                timestamp,
                %window,
                dropped = self.late_events_dropped,
                "dropping late event for closed window"
            );
            return Ok(Vec::new());
        }

        let map_key = (window.start, (config.key_fn)(event));
        match self.windows.get_mut(&map_key) {
            Some(acc) => *acc = config.aggregate.add(acc, event)?,
            None => {
                let zero = config.aggregate.create_accumulator();
                let acc = config.aggregate.add(&zero, event)?;
                self.windows.insert(map_key, acc);
                trace!(%window, open = self.windows.len(), "opened window");
            }
        }

        if !self.clock.on_event(timestamp) {
            return Ok(Vec::new());
        }
        Ok(self.drain_closed())
    }

    /// Force-close and emit every open window, leaving the table empty.
    ///
    /// Intended for end of stream. Events that arrive afterwards for any of
    /// the flushed windows (or earlier ones) are treated as late.
    pub fn flush(&mut self) -> Result<Vec<WindowEmission<K, ACC>>> {
        let Some(config) = self.config.as_ref() else {
            return Err(AggregatorError::Configuration(
                "flush called before configure",
            ));
        };
        let assigner = config.assigner;

        let windows = std::mem::take(&mut self.windows);
        let emitted: Vec<_> = windows
            .into_iter()
            .map(|((start, key), accumulator)| WindowEmission {
                key,
                window: assigner.window_starting_at(start),
                accumulator,
            })
            .collect();
        if let Some(last) = emitted.last() {
            self.flushed_through = self.flushed_through.max(last.window.end);
        }
        debug!(emitted = emitted.len(), "flushed open windows");
        Ok(emitted)
    }

    /// Remove and emit, in order, every window the clock has closed.
    fn drain_closed(&mut self) -> Vec<WindowEmission<K, ACC>> {
        let Some(assigner) = self.config.as_ref().map(|config| config.assigner) else {
            return Vec::new();
        };

        let mut emitted = Vec::new();
        while let Some(entry) = self.windows.first_entry() {
            let start = entry.key().0;
            if !is_window_closed(&self.clock, &assigner, start) {
                break;
            }
            let window = assigner.window_starting_at(start);
            let ((_, key), accumulator) = entry.remove_entry();
            debug!(%window, "window closed");
            emitted.push(WindowEmission {
                key,
                window,
                accumulator,
            });
        }
        emitted
    }

    /// Return true once [`configure`](Self::configure) has succeeded.
    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Configured window size, or `None` before `configure`.
    pub fn window_size(&self) -> Option<Duration> {
        self.config.as_ref().map(|config| config.assigner.size())
    }

    pub fn grace_period(&self) -> Duration {
        self.grace
    }

    /// Return the number of currently open (key, window) pairs.
    pub fn open_window_count(&self) -> usize {
        self.windows.len()
    }

    /// Number of events dropped because their window had already closed.
    pub fn late_events_dropped(&self) -> u64 {
        self.late_events_dropped
    }

    /// Latest event timestamp observed across all keys.
    pub fn latest_timestamp(&self) -> Option<EventTime> {
        self.clock.latest()
    }

    /// Latest observed timestamp minus the grace period.
    pub fn watermark(&self) -> Option<Watermark> {
        self.clock.watermark()
    }
}

impl<T, K, ACC> WindowedAggregator<T, K, ACC>
where
    T: Timestamped,
    K: StreamData + Ord,
    ACC: StreamData,
{
    /// Snapshot open accumulators, clock position and late-event count.
    pub fn snapshot_state(&self) -> Result<Vec<u8>> {
        let snapshot = AggregatorSnapshot {
            open_windows: self
                .windows
                .iter()
                .map(|((start, key), acc)| (*start, key.clone(), acc.clone()))
                .collect(),
            latest_timestamp: self.clock.latest(),
            flushed_through: self.flushed_through,
            late_events_dropped: self.late_events_dropped,
        };
        Ok(bincode::serialize(&snapshot)?)
    }

    /// Replace the current state with a snapshot taken by
    /// [`snapshot_state`](Self::snapshot_state).
    ///
    /// The aggregator must already be configured; its window size and grace
    /// period are kept. Empty input resets the state. On error the current
    /// state is left as it was.
    pub fn restore_state(&mut self, data: &[u8]) -> Result<()> {
        let Some(config) = self.config.as_ref() else {
            return Err(AggregatorError::Configuration(
                "restore_state called before configure",
            ));
        };
        let assigner = config.assigner;

        let snapshot: AggregatorSnapshot<K, ACC> = if data.is_empty() {
            AggregatorSnapshot {
                open_windows: Vec::new(),
                latest_timestamp: None,
                flushed_through: EVENT_TIME_MIN,
                late_events_dropped: 0,
            }
        } else {
            bincode::deserialize(data)?
        };
        if let Some((start, _, _)) = snapshot
            .open_windows
            .iter()
            .find(|(start, _, _)| !assigner.is_window_start(*start))
        {
            return Err(AggregatorError::InvalidConfiguration(format!(
                "snapshot window start {start} is not aligned to {}ms windows",
                assigner.size_ms()
            )));
        }

        let mut clock = EventTimeClock::new(self.clock.grace_ms());
        if let Some(latest) = snapshot.latest_timestamp {
            clock.on_event(latest);
        }
        self.clock = clock;
        self.windows = snapshot
            .open_windows
            .into_iter()
            .map(|(start, key, acc)| ((start, key), acc))
            .collect();
        self.flushed_through = snapshot.flushed_through;
        self.late_events_dropped = snapshot.late_events_dropped;
        debug!(open = self.windows.len(), "restored aggregator state");
        Ok(())
    }
}

impl<T, K, ACC> Default for WindowedAggregator<T, K, ACC>
where
    T: Timestamped,
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

/// A window closes once the clock reaches its end plus grace. The top window,
/// whose end is not representable, only closes on flush.
fn is_window_closed(
    clock: &EventTimeClock,
    assigner: &TumblingEventTimeWindows,
    start: EventTime,
) -> bool {
    assigner
        .window_end(start)
        .is_some_and(|end| clock.is_closed(end))
}
