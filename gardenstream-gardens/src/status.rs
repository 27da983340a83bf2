//! Per-garden, per-window status summary.

use gardenstream_core::types::EventTime;
use serde::{Deserialize, Serialize};

use crate::model::{SensorMeasurementEnriched, SensorMeasurementType};
use crate::rules::GardenRules;

/// A single reading kept as the "last" value of a summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub value: f64,
    pub timestamp: EventTime,
}

/// Running statistics for one measurement type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSummary {
    pub count: u64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub sum: f64,
    /// Reading with the greatest timestamp; on equal timestamps the one
    /// recorded last.
    pub last: Option<Reading>,
}

impl MeasurementSummary {
    pub fn record(&mut self, value: f64, timestamp: EventTime) {
        self.count += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |min| min.min(value)));
        self.max = Some(self.max.map_or(value, |max| max.max(value)));
        if self.last.is_none_or(|last| timestamp >= last.timestamp) {
            self.last = Some(Reading { value, timestamp });
        }
    }

    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Aggregated view of one garden over one window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GardenStatus {
    pub garden_name: String,
    pub temperature: MeasurementSummary,
    pub humidity: MeasurementSummary,
    pub wind: MeasurementSummary,
    pub low_temperature_detected: bool,
    pub dry_conditions_detected: bool,
    pub strong_wind_detected: bool,
}

impl GardenStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `measurement` into this status.
    pub fn update_with(&mut self, measurement: &SensorMeasurementEnriched, rules: &GardenRules) {
        if self.garden_name.is_empty() {
            self.garden_name.clone_from(&measurement.garden_name);
        }
        let value = measurement.value;
        let timestamp = measurement.timestamp;
        match measurement.measurement_type {
            SensorMeasurementType::Temperature => {
                self.temperature.record(value, timestamp);
                self.low_temperature_detected |= rules.is_low_temperature(value);
            }
            SensorMeasurementType::Humidity => {
                self.humidity.record(value, timestamp);
                self.dry_conditions_detected |= rules.is_dry(value);
            }
            SensorMeasurementType::Wind => {
                self.wind.record(value, timestamp);
                self.strong_wind_detected |= rules.is_strong_wind(value);
            }
        }
    }

    /// Copy-on-write variant of [`update_with`](Self::update_with) used as the
    /// window fold.
    pub fn updated_with(&self, measurement: &SensorMeasurementEnriched, rules: &GardenRules) -> Self {
        let mut next = self.clone();
        next.update_with(measurement, rules);
        next
    }

    pub fn summary(&self, measurement_type: SensorMeasurementType) -> &MeasurementSummary {
        match measurement_type {
            SensorMeasurementType::Temperature => &self.temperature,
            SensorMeasurementType::Humidity => &self.humidity,
            SensorMeasurementType::Wind => &self.wind,
        }
    }

    /// Total number of measurements folded in.
    pub fn measurement_count(&self) -> u64 {
        self.temperature.count + self.humidity.count + self.wind.count
    }
}
