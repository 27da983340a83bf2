//! Stateless per-measurement rules that flag harmful garden conditions.

use serde::{Deserialize, Serialize};

use crate::model::{SensorMeasurementEnriched, SensorMeasurementType};
use gardenstream_core::types::EventTime;

/// Thresholds used both by the [`RulesProcessor`] and by the status fold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GardenRules {
    /// Temperatures strictly below this are too cold.
    pub low_temperature_threshold: f64,
    /// Relative humidity (0..1) strictly below this is too dry.
    pub low_humidity_threshold: f64,
    /// Wind speeds strictly above this are too strong.
    pub strong_wind_threshold: f64,
}

impl Default for GardenRules {
    fn default() -> Self {
        Self {
            low_temperature_threshold: 5.0,
            low_humidity_threshold: 0.2,
            strong_wind_threshold: 10.0,
        }
    }
}

impl GardenRules {
    pub fn is_low_temperature(&self, value: f64) -> bool {
        value < self.low_temperature_threshold
    }

    pub fn is_dry(&self, value: f64) -> bool {
        value < self.low_humidity_threshold
    }

    pub fn is_strong_wind(&self, value: f64) -> bool {
        value > self.strong_wind_threshold
    }

    /// Return true if `measurement` breaks the rule for its measurement type.
    pub fn is_violated_by(&self, measurement: &SensorMeasurementEnriched) -> bool {
        match measurement.measurement_type {
            SensorMeasurementType::Temperature => self.is_low_temperature(measurement.value),
            SensorMeasurementType::Humidity => self.is_dry(measurement.value),
            SensorMeasurementType::Wind => self.is_strong_wind(measurement.value),
        }
    }
}

/// Condition raised for a single offending measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all_fields = "camelCase")]
pub enum GardenEvent {
    LowTemperatureDetected {
        garden_name: String,
        sensor_id: i32,
        value: f64,
        timestamp: EventTime,
    },
    DryConditionsDetected {
        garden_name: String,
        sensor_id: i32,
        value: f64,
        timestamp: EventTime,
    },
    StrongWindDetected {
        garden_name: String,
        sensor_id: i32,
        value: f64,
        timestamp: EventTime,
    },
}

impl GardenEvent {
    pub fn value(&self) -> f64 {
        match self {
            GardenEvent::LowTemperatureDetected { value, .. }
            | GardenEvent::DryConditionsDetected { value, .. }
            | GardenEvent::StrongWindDetected { value, .. } => *value,
        }
    }

    pub fn garden_name(&self) -> &str {
        match self {
            GardenEvent::LowTemperatureDetected { garden_name, .. }
            | GardenEvent::DryConditionsDetected { garden_name, .. }
            | GardenEvent::StrongWindDetected { garden_name, .. } => garden_name,
        }
    }
}

/// Evaluates [`GardenRules`] against each measurement independently.
#[derive(Debug, Clone, Default)]
pub struct RulesProcessor {
    rules: GardenRules,
}

impl RulesProcessor {
    pub fn new(rules: GardenRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &GardenRules {
        &self.rules
    }

    /// Return the event raised by `measurement`, if any.
    pub fn process(&self, measurement: &SensorMeasurementEnriched) -> Option<GardenEvent> {
        if !self.rules.is_violated_by(measurement) {
            return None;
        }
        let garden_name = measurement.garden_name.clone();
        let sensor_id = measurement.sensor_id;
        let value = measurement.value;
        let timestamp = measurement.timestamp;
        let event = match measurement.measurement_type {
            SensorMeasurementType::Temperature => GardenEvent::LowTemperatureDetected {
                garden_name,
                sensor_id,
                value,
                timestamp,
            },
            SensorMeasurementType::Humidity => GardenEvent::DryConditionsDetected {
                garden_name,
                sensor_id,
                value,
                timestamp,
            },
            SensorMeasurementType::Wind => GardenEvent::StrongWindDetected {
                garden_name,
                sensor_id,
                value,
                timestamp,
            },
        };
        Some(event)
    }
}
