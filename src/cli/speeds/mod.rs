//! Speeds command - samples flow segment data for collected streets

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::output::OutputWriter;
use crate::infrastructure::services::{SpeedCollector, FLOW_GEOJSON_FILE};

/// Arguments for the speeds command
#[derive(Args, Clone, Debug)]
pub struct SpeedsArgs {
    /// Flow GeoJSON to sample (defaults to the collected flow tiles)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Only sample the first N street segments
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Run the speed sampling
pub async fn run(config: &AppConfig, args: SpeedsArgs) -> anyhow::Result<()> {
    info!("Traffic data collector - TomTom Flow Segment API");

    let provider = crate::create_traffic_provider(config)?;
    let writer = OutputWriter::new(&config.output.dir);
    writer.ensure_dir().await?;

    let input = args
        .input
        .unwrap_or_else(|| config.output.dir.join(FLOW_GEOJSON_FILE));

    let report = SpeedCollector::new(provider, writer)
        .with_request_delay(Duration::from_millis(config.tomtom.request_delay_ms))
        .with_concurrency(config.speeds.concurrency)
        .collect(&input, args.limit)
        .await?;

    info!(
        "Done! Collected {} RAW responses from API ({} queried)",
        report.saved, report.queried
    );
    Ok(())
}
