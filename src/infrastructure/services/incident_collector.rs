//! Traffic incident collection (accidents, closures, roadworks)

use std::sync::Arc;

use chrono::Local;
use serde_json::{json, Value};
use tracing::info;

use crate::domain::{
    BoundingBox, DomainError, Feature, FeatureCollection, Properties, TrafficProvider,
};
use crate::infrastructure::output::OutputWriter;

pub const INCIDENTS_RAW_FILE: &str = "traffic_incidents_raw.json";
pub const INCIDENTS_GEOJSON_FILE: &str = "traffic_incidents.geojson";
pub const INCIDENTS_RECORDS_FILE: &str = "traffic_incidents_records.ndjson";

#[derive(Debug)]
pub struct IncidentCollector {
    provider: Arc<dyn TrafficProvider>,
    writer: OutputWriter,
}

impl IncidentCollector {
    pub fn new(provider: Arc<dyn TrafficProvider>, writer: OutputWriter) -> Self {
        Self { provider, writer }
    }

    /// Fetch incidents inside `bbox` and write raw, GeoJSON and NDJSON files.
    ///
    /// Returns the number of incidents saved.
    pub async fn collect(&self, bbox: &BoundingBox) -> Result<usize, DomainError> {
        bbox.validate()?;
        info!("Collecting traffic incidents...");

        let raw = self.provider.incidents(bbox).await?;
        self.writer.save_json(&raw, INCIDENTS_RAW_FILE).await?;

        let collection = incidents_to_features(&raw);
        self.writer
            .save_json(&collection, INCIDENTS_GEOJSON_FILE)
            .await?;
        self.writer
            .save_ndjson(collection.records(), INCIDENTS_RECORDS_FILE)
            .await?;

        info!("Saved {} incidents", collection.len());
        Ok(collection.len())
    }
}

/// Turn an incident details response into a feature collection.
pub fn incidents_to_features(raw: &Value) -> FeatureCollection {
    let timestamp = Local::now().to_rfc3339();

    let features = raw
        .get("incidents")
        .and_then(Value::as_array)
        .map(|incidents| {
            incidents
                .iter()
                .map(|incident| {
                    let geometry = incident.get("geometry").cloned().unwrap_or(Value::Null);
                    let mut properties: Properties = incident
                        .get("properties")
                        .and_then(Value::as_object)
                        .cloned()
                        .unwrap_or_default();
                    properties.insert("timestamp".into(), json!(timestamp));
                    Feature::from_raw(geometry, properties)
                })
                .collect()
        })
        .unwrap_or_default();

    FeatureCollection::new(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traffic::MockTrafficProvider;

    fn sample_response() -> Value {
        json!({
            "incidents": [
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[27.58, 47.16], [27.59, 47.17]]
                    },
                    "properties": {
                        "id": "abc",
                        "iconCategory": 9,
                        "magnitudeOfDelay": 2,
                        "from": "Podu Roș",
                        "to": "Piața Unirii"
                    }
                },
                {
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [27.6, 47.15]}
                }
            ]
        })
    }

    #[test]
    fn test_incidents_to_features() {
        let collection = incidents_to_features(&sample_response());

        assert_eq!(collection.len(), 2);
        let first = &collection.features[0];
        assert_eq!(first.properties["id"], "abc");
        assert_eq!(first.properties["from"], "Podu Roș");
        assert!(first.properties["timestamp"].is_string());
        assert!(first.parsed_geometry().is_some());

        let second = &collection.features[1];
        assert_eq!(second.properties.len(), 1);
    }

    #[test]
    fn test_missing_incidents_key() {
        assert!(incidents_to_features(&json!({"error": "x"})).is_empty());
    }

    #[tokio::test]
    async fn test_collect_writes_three_files() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = MockTrafficProvider::new().with_incidents(sample_response());
        let collector = IncidentCollector::new(Arc::new(provider), OutputWriter::new(tmp.path()));

        let count = collector.collect(&BoundingBox::iasi()).await.unwrap();

        assert_eq!(count, 2);
        for file in [INCIDENTS_RAW_FILE, INCIDENTS_GEOJSON_FILE, INCIDENTS_RECORDS_FILE] {
            assert!(tmp.path().join(file).exists(), "{} missing", file);
        }

        let raw: Value = serde_json::from_str(
            &std::fs::read_to_string(tmp.path().join(INCIDENTS_RAW_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(raw, sample_response());
    }

    #[tokio::test]
    async fn test_provider_failure_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let collector = IncidentCollector::new(
            Arc::new(MockTrafficProvider::new()),
            OutputWriter::new(tmp.path()),
        );

        assert!(collector.collect(&BoundingBox::iasi()).await.is_err());
        assert!(!tmp.path().join(INCIDENTS_RAW_FILE).exists());
    }
}
