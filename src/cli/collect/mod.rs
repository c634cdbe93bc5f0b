//! Collect commands - flow tiles, incidents and the collection summary

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::TrafficProvider;
use crate::infrastructure::output::OutputWriter;
use crate::infrastructure::services::{generate_summary, FlowCollector, IncidentCollector};

/// Run the full collection: flow tiles, incidents, summary
pub async fn run_all(config: &AppConfig) -> anyhow::Result<()> {
    info!("Traffic data collector - TomTom APIs");
    run_all_with(config, crate::create_traffic_provider(config)?).await
}

/// Full collection against an already built provider.
///
/// An incident failure is logged and the summary is still written.
pub async fn run_all_with(
    config: &AppConfig,
    provider: Arc<dyn TrafficProvider>,
) -> anyhow::Result<()> {
    let writer = prepare_output(config).await?;

    flow_collector(config, provider.clone(), writer.clone())
        .collect(&config.area.bbox, config.tomtom.zoom)
        .await?;

    if let Err(e) = IncidentCollector::new(provider, writer.clone())
        .collect(&config.area.bbox)
        .await
    {
        warn!("Error collecting incidents: {}", e);
    }

    generate_summary(&writer, &config.area.bbox, &config.area.location).await?;

    info!("Done!");
    Ok(())
}

/// Collect flow tiles only
pub async fn run_flow(config: &AppConfig) -> anyhow::Result<()> {
    run_flow_with(config, crate::create_traffic_provider(config)?).await
}

/// Flow collection that fails when every tile failed.
pub async fn run_flow_with(
    config: &AppConfig,
    provider: Arc<dyn TrafficProvider>,
) -> anyhow::Result<()> {
    let writer = prepare_output(config).await?;

    let report = flow_collector(config, provider, writer)
        .collect(&config.area.bbox, config.tomtom.zoom)
        .await?;

    if report.tiles_failed == report.tiles_total && report.tiles_total > 0 {
        anyhow::bail!("All {} flow tiles failed", report.tiles_total);
    }
    Ok(())
}

/// Collect incidents only
pub async fn run_incidents(config: &AppConfig) -> anyhow::Result<()> {
    run_incidents_with(config, crate::create_traffic_provider(config)?).await
}

pub async fn run_incidents_with(
    config: &AppConfig,
    provider: Arc<dyn TrafficProvider>,
) -> anyhow::Result<()> {
    let writer = prepare_output(config).await?;

    IncidentCollector::new(provider, writer)
        .collect(&config.area.bbox)
        .await?;
    Ok(())
}

/// Write the summary for whatever is in the output directory
pub async fn run_summary(config: &AppConfig) -> anyhow::Result<()> {
    let writer = prepare_output(config).await?;
    generate_summary(&writer, &config.area.bbox, &config.area.location).await?;
    Ok(())
}

async fn prepare_output(config: &AppConfig) -> anyhow::Result<OutputWriter> {
    let writer = OutputWriter::new(&config.output.dir);
    writer.ensure_dir().await?;
    Ok(writer)
}

fn flow_collector(
    config: &AppConfig,
    provider: Arc<dyn TrafficProvider>,
    writer: OutputWriter,
) -> FlowCollector {
    FlowCollector::new(provider, writer)
        .with_request_delay(Duration::from_millis(config.tomtom.request_delay_ms))
}
