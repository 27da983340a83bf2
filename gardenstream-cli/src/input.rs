//! JSON-lines measurement input.
//!
//! Malformed lines are logged and skipped here so that only well-formed
//! measurements ever reach the aggregator.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use gardenstream_core::channel::EventSender;
use gardenstream_gardens::model::SensorMeasurementEnriched;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    pub accepted: u64,
    pub skipped: u64,
}

/// Where measurements are read from.
#[derive(Debug, Clone)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    /// One source per path, or stdin when no path is given.
    pub fn from_paths(paths: &[PathBuf]) -> Vec<Source> {
        if paths.is_empty() {
            vec![Source::Stdin]
        } else {
            paths.iter().cloned().map(Source::File).collect()
        }
    }

    pub fn name(&self) -> String {
        match self {
            Source::Stdin => "<stdin>".to_string(),
            Source::File(path) => path.display().to_string(),
        }
    }

    /// Read every measurement from this source, handing each to `emit`.
    pub fn read_all(
        &self,
        emit: impl FnMut(SensorMeasurementEnriched) -> Result<()>,
    ) -> Result<ReadStats> {
        let name = self.name();
        match self {
            Source::Stdin => read_measurements(io::stdin().lock(), &name, emit),
            Source::File(path) => {
                let file = File::open(path).with_context(|| format!("opening input {name}"))?;
                read_measurements(BufReader::new(file), &name, emit)
            }
        }
    }
}

/// Parse one JSON measurement per line. Blank lines are ignored.
pub fn read_measurements<R: BufRead>(
    reader: R,
    source: &str,
    mut emit: impl FnMut(SensorMeasurementEnriched) -> Result<()>,
) -> Result<ReadStats> {
    let mut stats = ReadStats::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading {source}"))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<SensorMeasurementEnriched>(line) {
            Ok(measurement) => {
                stats.accepted += 1;
                emit(measurement)?;
            }
            Err(err) => {
                stats.skipped += 1;
                warn!(source, line = index + 1, "skipping malformed measurement: {err}");
            }
        }
    }
    debug!(source, accepted = stats.accepted, skipped = stats.skipped, "input exhausted");
    Ok(stats)
}

/// Read `sources` one after another on a new thread and forward
/// measurements to `sender`.
pub fn spawn_producer(
    sources: Vec<Source>,
    sender: EventSender<SensorMeasurementEnriched>,
) -> JoinHandle<Result<ReadStats>> {
    thread::spawn(move || {
        let mut total = ReadStats::default();
        for source in &sources {
            let stats = source.read_all(|measurement| {
                sender
                    .send(measurement)
                    .context("aggregator stopped accepting measurements")
            })?;
            total.accepted += stats.accepted;
            total.skipped += stats.skipped;
        }
        Ok(total)
    })
}
