//! Single ordered ingestion point in front of a [`WindowedAggregator`].
//!
//! Uses crossbeam-channel so that any number of producer threads can hand
//! events to one consumer thread, which is the only thread that ever touches
//! the aggregator.

use crossbeam_channel::{Receiver, Sender, bounded};
use tracing::{debug, warn};

use crate::error::{AggregatorError, Result};
use crate::types::Timestamped;
use crate::window::{WindowEmission, WindowedAggregator};

/// Default channel buffer size.
///
/// Senders block once this many events are queued.
pub const DEFAULT_INGESTION_CAPACITY: usize = 1024;

/// Producer handle for an [`IngestionPoint`]. Cheap to clone, one per thread.
#[derive(Clone)]
pub struct EventSender<T> {
    sender: Sender<T>,
}

impl<T> EventSender<T> {
    /// Send an event, blocking while the ingestion buffer is full.
    pub fn send(&self, event: T) -> Result<()> {
        self.sender
            .send(event)
            .map_err(|_| AggregatorError::IngestionClosed)
    }
}

/// Counters reported by [`IngestionPoint::drive`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionStats {
    pub events_received: u64,
    pub emissions: u64,
    pub late_events_dropped: u64,
    pub fold_failures: u64,
}

/// Serializes events from many producers into one ordered stream.
pub struct IngestionPoint<T> {
    sender: Sender<T>,
    receiver: Receiver<T>,
}

impl<T> IngestionPoint<T> {
    /// Create an ingestion point buffering at most `capacity` events.
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Hand out a new producer handle.
    pub fn sender(&self) -> EventSender<T> {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Feed every received event to `aggregator` on the calling thread.
    ///
    /// Returns once all [`EventSender`]s have been dropped, after flushing
    /// the aggregator. Each emission is passed to `sink` in order.
    ///
    /// A fold failure skips that event and is counted; configuration errors
    /// abort the loop.
    pub fn drive<K, ACC, S>(
        self,
        aggregator: &mut WindowedAggregator<T, K, ACC>,
        mut sink: S,
    ) -> Result<IngestionStats>
    where
        T: Timestamped,
        K: Ord,
        S: FnMut(WindowEmission<K, ACC>),
    {
        let IngestionPoint { sender, receiver } = self;
        drop(sender);

        let late_before = aggregator.late_events_dropped();
        let mut stats = IngestionStats::default();
        for event in receiver.iter() {
            stats.events_received += 1;
            match aggregator.process(&event) {
                Ok(emitted) => {
                    stats.emissions += emitted.len() as u64;
                    emitted.into_iter().for_each(&mut sink);
                }
                Err(AggregatorError::Fold(err)) => {
                    stats.fold_failures += 1;
                    warn!(timestamp = event.event_time(), "skipping event: {err}");
                }
                Err(err) => return Err(err),
            }
        }

        let flushed = aggregator.flush()?;
        stats.emissions += flushed.len() as u64;
        flushed.into_iter().for_each(&mut sink);

        stats.late_events_dropped = aggregator
            .late_events_dropped()
            .saturating_sub(late_before);
        debug!(?stats, "ingestion finished");
        Ok(stats)
    }
}

impl<T> Default for IngestionPoint<T> {
    fn default() -> Self {
        Self::new(DEFAULT_INGESTION_CAPACITY)
    }
}
