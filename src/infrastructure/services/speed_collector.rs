//! Per-segment speed sampling through the flow segment endpoint

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::domain::traffic::SpeedRunFiles;
use crate::domain::{DomainError, FeatureCollection, SpeedRunMetadata, SpeedSample, TrafficProvider};
use crate::infrastructure::output::OutputWriter;

/// Outcome of a speed sampling run
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedReport {
    pub segments_found: usize,
    pub queried: usize,
    pub saved: usize,
    pub files: SpeedRunFiles,
}

#[derive(Debug)]
pub struct SpeedCollector {
    provider: Arc<dyn TrafficProvider>,
    writer: OutputWriter,
    request_delay: Duration,
    concurrency: usize,
}

impl SpeedCollector {
    pub fn new(provider: Arc<dyn TrafficProvider>, writer: OutputWriter) -> Self {
        Self {
            provider,
            writer,
            request_delay: Duration::from_millis(200),
            concurrency: 1,
        }
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Query every street of `input` (or the first `limit`) at its center point.
    pub async fn collect(
        &self,
        input: &Path,
        limit: Option<usize>,
    ) -> Result<SpeedReport, DomainError> {
        info!("Reading input data: {}", input.display());
        let text = tokio::fs::read_to_string(input)
            .await
            .map_err(|e| DomainError::io(format!("Failed to read {}: {}", input.display(), e)))?;
        let collection: FeatureCollection = serde_json::from_str(&text)?;
        info!("Total street segments found: {}", collection.len());

        let points: Vec<(f64, f64)> = collection
            .features
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .filter_map(|feature| feature.parsed_geometry()?.center_point())
            .collect();
        let total = points.len();

        info!("Collecting traffic data from API...");
        let samples: Vec<SpeedSample> = stream::iter(points.into_iter().enumerate())
            .map(|(idx, (lat, lon))| self.sample(idx + 1, total, lat, lon))
            .buffered(self.concurrency)
            .filter_map(|sample| async move { sample })
            .collect()
            .await;

        let at = Local::now();
        let metadata = SpeedRunMetadata::new(at, samples.len(), input.display().to_string());
        let files = metadata.output_files.clone();

        info!("Saving {} records...", samples.len());
        self.writer.save_ndjson(&samples, &files.ndjson).await?;
        self.writer.save_json(&samples, &files.json).await?;
        self.writer.save_json(&metadata, &files.metadata).await?;
        info!(
            "Date: {} Time: {}",
            metadata.execution_date, metadata.execution_time
        );

        Ok(SpeedReport {
            segments_found: collection.len(),
            queried: total,
            saved: samples.len(),
            files,
        })
    }

    async fn sample(&self, idx: usize, total: usize, lat: f64, lon: f64) -> Option<SpeedSample> {
        info!("[{}/{}] Coordinates: {:.5}, {:.5}", idx, total, lat, lon);

        let result = self.provider.flow_segment(lat, lon).await;

        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        match result {
            Ok(response) => {
                let sample = SpeedSample::new(lat, lon, response, Local::now());
                match sample.speeds() {
                    Some((current, free)) => info!(
                        "Current speed: {} km/h | Free flow speed: {} km/h",
                        current, free
                    ),
                    None => info!("Current speed: N/A | Free flow speed: N/A"),
                }
                Some(sample)
            }
            Err(e) => {
                warn!("Error querying {:.5},{:.5}: {}", lat, lon, e);
                None
            }
        }
    }
}
