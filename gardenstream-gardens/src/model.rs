//! Sensor measurement records as they arrive from the enrichment stage.
//!
//! Field names serialize in camelCase so JSON produced by the upstream
//! enrichment service reads back unchanged.

use gardenstream_core::types::{EventTime, Timestamped};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorMeasurementType {
    Temperature,
    Humidity,
    Wind,
}

impl std::fmt::Display for SensorMeasurementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SensorMeasurementType::Temperature => "TEMPERATURE",
            SensorMeasurementType::Humidity => "HUMIDITY",
            SensorMeasurementType::Wind => "WIND",
        };
        f.write_str(name)
    }
}

/// A raw reading from one sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorMeasurement {
    pub sensor_id: i32,
    #[serde(rename = "type")]
    pub measurement_type: SensorMeasurementType,
    pub value: f64,
    pub timestamp: EventTime,
}

impl SensorMeasurement {
    pub fn new(
        sensor_id: i32,
        measurement_type: SensorMeasurementType,
        value: f64,
        timestamp: EventTime,
    ) -> Self {
        Self {
            sensor_id,
            measurement_type,
            value,
            timestamp,
        }
    }
}

/// Sensor registry entry: which garden a sensor is installed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    pub id: i32,
    pub name: String,
    pub garden_name: String,
}

impl Sensor {
    pub fn new(id: i32, name: impl Into<String>, garden_name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            garden_name: garden_name.into(),
        }
    }
}

/// A measurement joined with the sensor that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorMeasurementEnriched {
    pub sensor_id: i32,
    #[serde(rename = "type")]
    pub measurement_type: SensorMeasurementType,
    pub value: f64,
    pub timestamp: EventTime,
    pub sensor_name: String,
    pub garden_name: String,
}

impl SensorMeasurementEnriched {
    pub fn new(measurement: SensorMeasurement, sensor: Sensor) -> Self {
        Self {
            sensor_id: measurement.sensor_id,
            measurement_type: measurement.measurement_type,
            value: measurement.value,
            timestamp: measurement.timestamp,
            sensor_name: sensor.name,
            garden_name: sensor.garden_name,
        }
    }
}

impl Timestamped for SensorMeasurementEnriched {
    fn event_time(&self) -> EventTime {
        self.timestamp
    }
}
