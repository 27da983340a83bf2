use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use gardenstream_core::channel::IngestionPoint;
use gardenstream_gardens::aggregator::{GardenStatusAggregator, GardenStatusEvent};
use gardenstream_gardens::config::GardenConfig;
use gardenstream_gardens::rules::RulesProcessor;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod input;

use input::{ReadStats, Source, spawn_producer};

#[derive(Parser, Debug)]
#[command(name = "gardenstream")]
#[command(about = "Garden sensor stream processing", long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fold measurements into per-garden status windows.
    Aggregate {
        /// JSON-lines measurement file; repeat for several producers. Reads stdin if omitted.
        ///
        /// Each file is read on its own thread and all of them share one
        /// event-time clock, so a file that runs ahead in time can close
        /// windows before another file's events for them arrive. Use
        /// --sequential for reproducible output.
        #[arg(long = "input")]
        inputs: Vec<PathBuf>,
        /// Read the input files one after another on a single producer thread.
        #[arg(long)]
        sequential: bool,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        window_secs: Option<u64>,
        #[arg(long)]
        grace_ms: Option<u64>,
    },
    /// Emit low-temperature, dry-conditions and strong-wind events.
    Rules {
        #[arg(long = "input")]
        inputs: Vec<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Aggregate {
            inputs,
            sequential,
            config,
            window_secs,
            grace_ms,
        } => {
            let mut config = load_config(config)?;
            if let Some(secs) = window_secs {
                config.window_size_ms = secs.saturating_mul(1_000);
            }
            if let Some(grace_ms) = grace_ms {
                config.grace_period_ms = grace_ms;
            }
            run_aggregate(&config, Source::from_paths(&inputs), sequential)?;
        }
        Commands::Rules { inputs, config } => {
            let config = load_config(config)?;
            run_rules(&config, &Source::from_paths(&inputs))?;
        }
    }
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<PathBuf>) -> Result<GardenConfig> {
    match path {
        Some(path) => GardenConfig::from_json_file(path),
        None => Ok(GardenConfig::default()),
    }
}

fn run_aggregate(config: &GardenConfig, sources: Vec<Source>, sequential: bool) -> Result<()> {
    let mut gardens = GardenStatusAggregator::new(config)?;
    let point = IngestionPoint::new(config.channel_capacity);
    let groups: Vec<Vec<Source>> = if sequential {
        vec![sources]
    } else {
        sources.into_iter().map(|source| vec![source]).collect()
    };
    let producers: Vec<_> = groups
        .into_iter()
        .map(|group| {
            let name = group
                .iter()
                .map(Source::name)
                .collect::<Vec<_>>()
                .join(", ");
            (name, spawn_producer(group, point.sender()))
        })
        .collect();

    let mut out = BufWriter::new(io::stdout().lock());
    let mut write_error = None;
    let stats = point.drive(gardens.aggregator_mut(), |emission| {
        if write_error.is_none() {
            if let Err(err) = write_json_line(&mut out, &GardenStatusEvent::from(emission)) {
                write_error = Some(err);
            }
        }
    })?;
    if let Some(err) = write_error {
        return Err(err);
    }
    out.flush().context("flushing stdout")?;

    let mut read = ReadStats::default();
    for (name, handle) in producers {
        let source_stats = handle
            .join()
            .map_err(|_| anyhow!("producer for {name} panicked"))??;
        read.accepted += source_stats.accepted;
        read.skipped += source_stats.skipped;
    }
    info!(
        measurements = read.accepted,
        malformed = read.skipped,
        windows = stats.emissions,
        late = stats.late_events_dropped,
        fold_failures = stats.fold_failures,
        "aggregation finished"
    );
    Ok(())
}

fn run_rules(config: &GardenConfig, sources: &[Source]) -> Result<()> {
    let processor = RulesProcessor::new(config.rules.clone());
    let mut out = BufWriter::new(io::stdout().lock());
    let mut raised = 0u64;
    for source in sources {
        source.read_all(|measurement| {
            if let Some(event) = processor.process(&measurement) {
                raised += 1;
                write_json_line(&mut out, &event)?;
            }
            Ok(())
        })?;
    }
    out.flush().context("flushing stdout")?;
    info!(events = raised, "rules evaluation finished");
    Ok(())
}

fn write_json_line<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, value).context("encoding output")?;
    out.write_all(b"\n").context("writing output")?;
    Ok(())
}
