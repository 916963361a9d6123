//! `storewatch`: compute a store uptime report from a JSON batch

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use storewatch_core::{FixedClock, ReferenceClock, SystemClock};
use storewatch_report::{
    write_csv, write_csv_file, MemorySource, ReportAggregator, ReportBatch, ReportConfig,
};

#[derive(Parser)]
#[command(name = "storewatch", version, about = "Store uptime/downtime report")]
struct Cli {
    /// JSON batch with stores, polls and business hours
    #[arg(short, long)]
    input: PathBuf,
    /// Reference instant (RFC 3339); defaults to the batch's, then to now
    #[arg(short, long)]
    reference: Option<DateTime<Utc>>,
    /// CSV destination; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Stores computed concurrently
    #[arg(long)]
    pool_size: Option<usize>,
    /// Minutes charged next to an inactive poll at a status change
    #[arg(long)]
    offset_minutes: Option<i64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = ReportConfig::from_env().context("reading STOREWATCH_* settings")?;
    if let Some(pool_size) = cli.pool_size {
        config = config.with_pool_size(pool_size);
    }
    if let Some(minutes) = cli.offset_minutes {
        let offset = Duration::try_minutes(minutes)
            .with_context(|| format!("--offset-minutes {minutes} is out of range"))?;
        config.engine = config.engine.with_interpolation_offset(offset);
    }

    let batch = ReportBatch::from_path(&cli.input)
        .with_context(|| format!("loading batch {}", cli.input.display()))?;
    let clock: Box<dyn ReferenceClock> = match cli.reference.or(batch.reference) {
        Some(reference) => Box::new(FixedClock::new(reference)),
        None => Box::new(SystemClock),
    };

    let aggregator = ReportAggregator::new(Arc::new(MemorySource::new(batch)), config)
        .context("invalid report settings")?;
    let report = aggregator.run_with_clock(clock.as_ref()).await?;

    let written = match &cli.output {
        Some(path) => write_csv_file(&report, path)
            .with_context(|| format!("writing {}", path.display()))?,
        None => write_csv(&report, io::stdout().lock())?,
    };

    let failed = report.failures().count();
    if failed > 0 {
        log::warn!("{failed} of {} stores failed; {written} rows written", report.len());
    }
    Ok(())
}
