//! One-minute garden status windows on top of the generic aggregator.

use anyhow::Result;
use gardenstream_core::error::AggregatorError;
use gardenstream_core::types::EventTime;
use gardenstream_core::window::{WindowEmission, WindowedAggregator};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::GardenConfig;
use crate::model::SensorMeasurementEnriched;
use crate::status::GardenStatus;

pub type GardenWindowAggregator = WindowedAggregator<SensorMeasurementEnriched, String, GardenStatus>;

/// Status of one garden for one closed window, as published downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GardenStatusEvent {
    pub window_start: EventTime,
    pub window_end: EventTime,
    #[serde(flatten)]
    pub status: GardenStatus,
}

impl From<WindowEmission<String, GardenStatus>> for GardenStatusEvent {
    fn from(emission: WindowEmission<String, GardenStatus>) -> Self {
        Self {
            window_start: emission.window.start,
            window_end: emission.window.end,
            status: emission.accumulator,
        }
    }
}

/// Groups enriched measurements by garden name into tumbling windows and
/// folds them into a [`GardenStatus`].
pub struct GardenStatusAggregator {
    aggregator: GardenWindowAggregator,
}

impl GardenStatusAggregator {
    pub fn new(config: &GardenConfig) -> Result<Self> {
        config.validate()?;
        let rules = config.rules.clone();

        let mut aggregator = WindowedAggregator::with_grace_period(config.grace_period());
        aggregator.configure(
            config.window_size(),
            |m: &SensorMeasurementEnriched| m.garden_name.clone(),
            GardenStatus::new,
            move |status: &GardenStatus, m: &SensorMeasurementEnriched| {
                status.updated_with(m, &rules)
            },
        )?;
        info!(
            window_size_ms = config.window_size_ms,
            grace_period_ms = config.grace_period_ms,
            "garden status aggregator ready"
        );
        Ok(Self { aggregator })
    }

    pub fn process(
        &mut self,
        measurement: &SensorMeasurementEnriched,
    ) -> Result<Vec<GardenStatusEvent>, AggregatorError> {
        let emitted = self.aggregator.process(measurement)?;
        Ok(emitted.into_iter().map(GardenStatusEvent::from).collect())
    }

    pub fn flush(&mut self) -> Result<Vec<GardenStatusEvent>, AggregatorError> {
        let emitted = self.aggregator.flush()?;
        Ok(emitted.into_iter().map(GardenStatusEvent::from).collect())
    }

    pub fn late_events_dropped(&self) -> u64 {
        self.aggregator.late_events_dropped()
    }

    pub fn open_window_count(&self) -> usize {
        self.aggregator.open_window_count()
    }

    /// Underlying aggregator, e.g. for driving it from an
    /// [`IngestionPoint`](gardenstream_core::channel::IngestionPoint).
    pub fn aggregator_mut(&mut self) -> &mut GardenWindowAggregator {
        &mut self.aggregator
    }
}
