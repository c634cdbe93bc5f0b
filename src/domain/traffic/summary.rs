use serde::{Deserialize, Serialize};

use crate::domain::geo::BoundingBox;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// One file present in the output directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedFile {
    pub filename: String,
    pub size_bytes: u64,
    pub size_mb: f64,
}

impl CollectedFile {
    pub fn new(filename: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            filename: filename.into(),
            size_bytes,
            size_mb: round_2(size_bytes as f64 / BYTES_PER_MB),
        }
    }
}

/// Contents of `collection_summary.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub collection_time: String,
    pub location: String,
    pub bounding_box: BoundingBox,
    pub files_collected: Vec<CollectedFile>,
}

impl CollectionSummary {
    pub fn total_bytes(&self) -> u64 {
        self.files_collected.iter().map(|f| f.size_bytes).sum()
    }

    pub fn total_mb(&self) -> f64 {
        self.total_bytes() as f64 / BYTES_PER_MB
    }
}

fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
