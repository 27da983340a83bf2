use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use gardenstream_core::channel::DEFAULT_INGESTION_CAPACITY;
use serde::{Deserialize, Serialize};

use crate::rules::GardenRules;

/// Settings for the garden status pipeline.
///
/// Every field has a default, so a JSON file only needs the values it
/// overrides:
///
/// ```json
/// { "windowSizeMs": 300000, "rules": { "strongWindThreshold": 12.5 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GardenConfig {
    pub window_size_ms: u64,
    pub grace_period_ms: u64,
    pub channel_capacity: usize,
    pub rules: GardenRules,
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            window_size_ms: 60_000,
            grace_period_ms: 0,
            channel_capacity: DEFAULT_INGESTION_CAPACITY,
            rules: GardenRules::default(),
        }
    }
}

impl GardenConfig {
    /// Load and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: GardenConfig = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.window_size_ms > 0, "windowSizeMs must be greater than 0");
        ensure!(self.channel_capacity > 0, "channelCapacity must be greater than 0");
        let rules = &self.rules;
        for (name, value) in [
            ("lowTemperatureThreshold", rules.low_temperature_threshold),
            ("lowHumidityThreshold", rules.low_humidity_threshold),
            ("strongWindThreshold", rules.strong_wind_threshold),
        ] {
            ensure!(value.is_finite(), "rules.{name} must be a finite number");
        }
        Ok(())
    }

    pub fn window_size(&self) -> Duration {
        Duration::from_millis(self.window_size_ms)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }
}
