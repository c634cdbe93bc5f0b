use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw flow segment response captured for one queried point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedSample {
    pub query_timestamp: String,
    pub query_lat: f64,
    pub query_lon: f64,
    pub tomtom_raw_response: Value,
}

impl SpeedSample {
    pub fn new(lat: f64, lon: f64, response: Value, at: DateTime<Local>) -> Self {
        Self {
            query_timestamp: at.to_rfc3339(),
            query_lat: lat,
            query_lon: lon,
            tomtom_raw_response: response,
        }
    }

    /// `(current_speed, free_flow_speed)` in km/h when the response has them
    pub fn speeds(&self) -> Option<(f64, f64)> {
        let segment = self.tomtom_raw_response.get("flowSegmentData")?;
        let current = segment.get("currentSpeed")?.as_f64()?;
        let free = segment.get("freeFlowSpeed")?.as_f64()?;
        Some((current, free))
    }
}

/// File names written by one speed sampling run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedRunFiles {
    pub ndjson: String,
    pub json: String,
    pub metadata: String,
}

impl SpeedRunFiles {
    pub fn for_stamp(stamp: &str) -> Self {
        Self {
            ndjson: format!("tomtom_raw_flow_data_{}.ndjson", stamp),
            json: format!("tomtom_raw_flow_data_{}.json", stamp),
            metadata: format!("tomtom_raw_flow_metadata_{}.json", stamp),
        }
    }
}

/// Metadata describing a speed sampling run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedRunMetadata {
    pub execution_date: String,
    pub execution_time: String,
    pub execution_datetime_iso: String,
    pub total_records: usize,
    pub input_file: String,
    pub output_files: SpeedRunFiles,
}

impl SpeedRunMetadata {
    pub fn new(at: DateTime<Local>, total_records: usize, input_file: impl Into<String>) -> Self {
        Self {
            execution_date: at.format("%Y-%m-%d").to_string(),
            execution_time: at.format("%H:%M:%S").to_string(),
            execution_datetime_iso: at.to_rfc3339(),
            total_records,
            input_file: input_file.into(),
            output_files: SpeedRunFiles::for_stamp(&run_stamp(at)),
        }
    }
}

/// `YYYYMMDD_HHMMSS` stamp used in output file names
pub fn run_stamp(at: DateTime<Local>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}
