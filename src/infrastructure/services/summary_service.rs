//! Collection summary

use chrono::Local;
use tracing::info;

use crate::domain::{BoundingBox, CollectionSummary, DomainError};
use crate::infrastructure::output::OutputWriter;

pub const SUMMARY_FILE: &str = "collection_summary.json";

/// Write `collection_summary.json` describing every file in the output directory.
///
/// The summary lists the files present before it is written, so it never
/// includes itself on a first run.
pub async fn generate_summary(
    writer: &OutputWriter,
    bbox: &BoundingBox,
    location: &str,
) -> Result<CollectionSummary, DomainError> {
    info!("Generating summary...");

    let summary = CollectionSummary {
        collection_time: Local::now().to_rfc3339(),
        location: location.to_string(),
        bounding_box: *bbox,
        files_collected: writer.list_files().await?,
    };

    writer.save_json(&summary, SUMMARY_FILE).await?;
    info!(
        "Total: {} files, {:.2} MB",
        summary.files_collected.len(),
        summary.total_mb()
    );

    Ok(summary)
}
