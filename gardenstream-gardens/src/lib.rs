//! # gardenstream gardens
//!
//! Garden monitoring built on [`gardenstream_core`].
//!
//! ## Quick Start
//!
//! ```rust
//! use gardenstream_gardens::aggregator::GardenStatusAggregator;
//! use gardenstream_gardens::config::GardenConfig;
//! use gardenstream_gardens::model::{
//!     Sensor, SensorMeasurement, SensorMeasurementEnriched, SensorMeasurementType,
//! };
//!
//! let mut gardens = GardenStatusAggregator::new(&GardenConfig::default()).unwrap();
//! let sensor = Sensor::new(1, "Sensor 1", "Garden 1");
//! let reading = |value, ts| {
//!     SensorMeasurementEnriched::new(
//!         SensorMeasurement::new(1, SensorMeasurementType::Temperature, value, ts),
//!         sensor.clone(),
//!     )
//! };
//!
//! assert!(gardens.process(&reading(4.5, 5_000)).unwrap().is_empty());
//! let closed = gardens.process(&reading(20.0, 65_000)).unwrap();
//! assert!(closed[0].status.low_temperature_detected);
//! ```
//!
//! - [`model`]: sensor measurement records.
//! - [`status`]: [`GardenStatus`](status::GardenStatus), the per-window fold.
//! - [`rules`]: [`RulesProcessor`](rules::RulesProcessor) and thresholds.
//! - [`aggregator`]: [`GardenStatusAggregator`](aggregator::GardenStatusAggregator).
//! - [`config`]: [`GardenConfig`](config::GardenConfig).

pub mod aggregator;
pub mod config;
pub mod model;
pub mod rules;
pub mod status;

pub use gardenstream_core;
