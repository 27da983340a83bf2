//! # gardenstream core
//!
//! Event-time windowed aggregation for keyed event streams.
//!
//! - [`types`]: [`EventTime`](types::EventTime), the
//!   [`Timestamped`](types::Timestamped) trait and the
//!   [`StreamData`](types::StreamData) bound for snapshot-able state.
//! - [`time`]: [`EventTimeClock`](time::EventTimeClock): the single
//!   latest-observed-timestamp clock that closes windows.
//! - [`window`]: [`WindowedAggregator`](window::WindowedAggregator),
//!   tumbling window assignment and pluggable
//!   [`AggregateFunction`](window::AggregateFunction)s.
//! - [`channel`]: [`IngestionPoint`](channel::IngestionPoint): funnels many
//!   producers into one aggregator thread.
//! - [`error`]: [`AggregatorError`](error::AggregatorError) and
//!   [`FoldError`](error::FoldError).

pub mod channel;
pub mod error;
pub mod time;
pub mod types;
pub mod window;
