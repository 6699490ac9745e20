use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use temp_pipeline::config::{load_config, DEFAULT_CONFIG_PATH};
use temp_pipeline::{Pipeline, SimulatedSensor, StdoutSink};

#[derive(Parser)]
#[command(name = "temp-pipeline")]
#[command(
    about = "Sample a temperature sensor and report its simple and moving averages",
    long_about = None
)]
struct Cli {
    /// Pipeline configuration file (TOML)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Stop after this many sampling cycles instead of running forever
    #[arg(long)]
    cycles: Option<u64>,

    /// Sampling period in milliseconds
    #[arg(long)]
    period_ms: Option<u64>,

    /// Seed for the simulated sensor
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = load_config(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(cycles) = cli.cycles {
        config.max_cycles = Some(cycles);
    }
    if let Some(period) = cli.period_ms {
        config.sample_period_ms = period;
    }
    if let Some(seed) = cli.seed {
        config.sensor.seed = seed;
    }

    tracing::info!(
        period_ms = config.sample_period_ms,
        seed = config.sensor.seed,
        cycles = ?config.max_cycles,
        "starting temperature pipeline"
    );

    let sensor = SimulatedSensor::from_config(&config.sensor);
    let handle =
        Pipeline::launch(&config, sensor, StdoutSink).context("pipeline startup failed")?;
    let summary = handle.join()?;

    let m = &summary.metrics;
    tracing::info!(
        samples = m.samples,
        reports = m.reports,
        dropped = m.total_dropped(),
        sensor_failures = m.sensor_failures,
        sample_p50 = ?m.sample_p50,
        sample_p99 = ?m.sample_p99,
        jitter_p99 = ?m.jitter_p99,
        "pipeline finished"
    );
    for ch in &m.channels {
        tracing::info!(
            channel = %ch.id,
            accepted = ch.accepted,
            dropped = ch.dropped,
            "channel totals"
        );
    }
    Ok(())
}
