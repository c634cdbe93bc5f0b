//! Traffic flow tile collection

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::geo::tiles_for_bbox;
use crate::domain::{
    BoundingBox, DomainError, Feature, FeatureCollection, TileCoord, TrafficProvider,
};
use crate::infrastructure::mvt::decode_tile;
use crate::infrastructure::output::OutputWriter;

pub const FLOW_GEOJSON_FILE: &str = "traffic_flow_tiles.geojson";
pub const FLOW_RECORDS_FILE: &str = "traffic_flow_records.ndjson";

/// Outcome of a flow collection run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowReport {
    pub tiles_total: usize,
    pub tiles_failed: usize,
    pub features: usize,
}

/// Downloads flow tiles covering an area and writes them as GeoJSON + NDJSON
#[derive(Debug)]
pub struct FlowCollector {
    provider: Arc<dyn TrafficProvider>,
    writer: OutputWriter,
    request_delay: Duration,
}

impl FlowCollector {
    pub fn new(provider: Arc<dyn TrafficProvider>, writer: OutputWriter) -> Self {
        Self {
            provider,
            writer,
            request_delay: Duration::from_millis(200),
        }
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub async fn collect(&self, bbox: &BoundingBox, zoom: u8) -> Result<FlowReport, DomainError> {
        bbox.validate()?;
        let tiles = tiles_for_bbox(bbox, zoom);
        info!(
            "Collecting traffic flow tiles from {}: {} tiles at zoom {}",
            self.provider.provider_name(),
            tiles.len(),
            zoom
        );

        let mut report = FlowReport {
            tiles_total: tiles.len(),
            ..Default::default()
        };
        let mut features = Vec::new();

        for tile in tiles {
            match self.collect_tile(tile).await {
                Ok(mut tile_features) => features.append(&mut tile_features),
                Err(e) => {
                    warn!("Error tile {},{}: {}", tile.x, tile.y, e);
                    report.tiles_failed += 1;
                }
            }

            if !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        let collection = FeatureCollection::new(features);
        report.features = collection.len();

        self.writer.save_json(&collection, FLOW_GEOJSON_FILE).await?;
        self.writer
            .save_ndjson(collection.records(), FLOW_RECORDS_FILE)
            .await?;

        info!(
            "Saved {} street segments ({} of {} tiles failed)",
            report.features, report.tiles_failed, report.tiles_total
        );
        Ok(report)
    }

    async fn collect_tile(&self, tile: TileCoord) -> Result<Vec<Feature>, DomainError> {
        let bytes = self.provider.flow_tile(tile).await?;
        tile_features(tile, &bytes)
    }
}

/// Decode one tile and project its features, tagging each with its origin.
pub fn tile_features(tile: TileCoord, bytes: &[u8]) -> Result<Vec<Feature>, DomainError> {
    let timestamp = Local::now().to_rfc3339();
    let mut features = Vec::new();

    for layer in decode_tile(bytes)? {
        for tile_feature in &layer.features {
            let geometry = tile_feature.geographic(tile, layer.extent);

            let mut properties = tile_feature.properties.clone();
            properties.insert("layer".into(), json!(layer.name));
            properties.insert("tile_x".into(), json!(tile.x));
            properties.insert("tile_y".into(), json!(tile.y));
            properties.insert("tile_z".into(), json!(tile.z));
            properties.insert("timestamp".into(), json!(timestamp));

            features.push(Feature::new(&geometry, properties));
        }
    }

    Ok(features)
}


#[cfg(test)]
mod tests {
    use super::fixtures::flow_tile_bytes;
    use super::*;
    use crate::domain::traffic::MockTrafficProvider;
    use crate::domain::Geometry;

    fn tiny_bbox() -> BoundingBox {
        BoundingBox::new(47.158, 27.601, 47.1581, 27.6011)
    }

    #[test]
    fn test_tile_features_adds_origin_properties() {
        let tile = TileCoord::new(15, 18896, 11504);
        let features = tile_features(tile, &flow_tile_bytes(0.8)).unwrap();

        assert_eq!(features.len(), 1);
        let props = &features[0].properties;
        assert_eq!(props["traffic_level"], 0.8);
        assert_eq!(props["layer"], "Traffic flow");
        assert_eq!(props["tile_x"], 18896);
        assert_eq!(props["tile_y"], 11504);
        assert_eq!(props["tile_z"], 15);
        assert!(props["timestamp"].is_string());
    }

    #[test]
    fn test_tile_features_are_inside_tile() {
        let tile = TileCoord::new(15, 18896, 11504);
        let features = tile_features(tile, &flow_tile_bytes(0.5)).unwrap();

        let Some(Geometry::LineString(coords)) = features[0].parsed_geometry() else {
            panic!("expected a LineString");
        };
        assert_eq!(coords.len(), 3);
        for [lon, lat] in coords {
            assert!((27.59..27.62).contains(&lon), "lon {}", lon);
            assert!((47.15..47.17).contains(&lat), "lat {}", lat);
        }
    }

    #[tokio::test]
    async fn test_collect_writes_outputs() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = MockTrafficProvider::new()
            .with_tile(TileCoord::new(15, 18896, 11504), flow_tile_bytes(0.2));
        let collector = FlowCollector::new(Arc::new(provider), OutputWriter::new(tmp.path()))
            .with_request_delay(Duration::ZERO);

        let report = collector.collect(&tiny_bbox(), 15).await.unwrap();

        assert_eq!(
            report,
            FlowReport {
                tiles_total: 1,
                tiles_failed: 0,
                features: 1
            }
        );

        let geojson: FeatureCollection = serde_json::from_str(
            &std::fs::read_to_string(tmp.path().join(FLOW_GEOJSON_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(geojson.len(), 1);

        let records = std::fs::read_to_string(tmp.path().join(FLOW_RECORDS_FILE)).unwrap();
        assert_eq!(records.lines().count(), 1);
        assert!(records.contains("\"tile_z\":15"));
    }

    #[tokio::test]
    async fn test_failed_tiles_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let collector = FlowCollector::new(
            Arc::new(MockTrafficProvider::new()),
            OutputWriter::new(tmp.path()),
        )
        .with_request_delay(Duration::ZERO);

        let report = collector.collect(&tiny_bbox(), 15).await.unwrap();

        assert_eq!(report.tiles_failed, 1);
        assert_eq!(report.features, 0);
        assert!(tmp.path().join(FLOW_GEOJSON_FILE).exists());
    }

    #[tokio::test]
    async fn test_undecodable_tile_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = MockTrafficProvider::new()
            .with_tile(TileCoord::new(15, 18896, 11504), vec![0xffu8, 0xff, 0xff]);
        let collector = FlowCollector::new(Arc::new(provider), OutputWriter::new(tmp.path()))
            .with_request_delay(Duration::ZERO);

        let report = collector.collect(&tiny_bbox(), 15).await.unwrap();
        assert_eq!(report.tiles_failed, 1);
    }

    #[tokio::test]
    async fn test_invalid_bbox_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let collector = FlowCollector::new(
            Arc::new(MockTrafficProvider::new()),
            OutputWriter::new(tmp.path()),
        );

        let bbox = BoundingBox::new(48.0, 27.0, 47.0, 28.0);
        assert!(collector.collect(&bbox, 15).await.is_err());
    }
}
