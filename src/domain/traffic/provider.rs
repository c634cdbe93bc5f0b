use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::geo::{BoundingBox, TileCoord};
use crate::domain::DomainError;

/// Source of traffic observations (TomTom, or a test double)
#[async_trait]
pub trait TrafficProvider: Send + Sync + Debug {
    /// Raw vector tile with relative traffic flow for `tile`
    async fn flow_tile(&self, tile: TileCoord) -> Result<Bytes, DomainError>;

    /// Incident report for everything inside `bbox`
    async fn incidents(&self, bbox: &BoundingBox) -> Result<serde_json::Value, DomainError>;

    /// Flow segment data for the road nearest to the given point
    async fn flow_segment(&self, lat: f64, lon: f64) -> Result<serde_json::Value, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory provider returning canned responses
    #[derive(Debug, Default)]
    pub struct MockTrafficProvider {
        tiles: HashMap<TileCoord, Bytes>,
        incidents: Option<serde_json::Value>,
        segments: Vec<((f64, f64), serde_json::Value)>,
        segment_queries: Mutex<Vec<(f64, f64)>>,
    }

    impl MockTrafficProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_tile(mut self, tile: TileCoord, bytes: impl Into<Bytes>) -> Self {
            self.tiles.insert(tile, bytes.into());
            self
        }

        pub fn with_incidents(mut self, response: serde_json::Value) -> Self {
            self.incidents = Some(response);
            self
        }

        pub fn with_segment(mut self, lat: f64, lon: f64, response: serde_json::Value) -> Self {
            self.segments.push(((lat, lon), response));
            self
        }

        pub fn segment_queries(&self) -> Vec<(f64, f64)> {
            self.segment_queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TrafficProvider for MockTrafficProvider {
        async fn flow_tile(&self, tile: TileCoord) -> Result<Bytes, DomainError> {
            self.tiles
                .get(&tile)
                .cloned()
                .ok_or_else(|| {
                    DomainError::provider_status("mock", 404, format!("No tile {}", tile))
                })
        }

        async fn incidents(&self, _bbox: &BoundingBox) -> Result<serde_json::Value, DomainError> {
            self.incidents
                .clone()
                .ok_or_else(|| DomainError::provider("mock", "No incidents configured"))
        }

        async fn flow_segment(&self, lat: f64, lon: f64) -> Result<serde_json::Value, DomainError> {
            self.segment_queries.lock().unwrap().push((lat, lon));
            self.segments
                .iter()
                .find(|((a, b), _)| (a - lat).abs() < 1e-9 && (b - lon).abs() < 1e-9)
                .map(|(_, response)| response.clone())
                .ok_or_else(|| {
                    DomainError::provider("mock", format!("No segment at {},{}", lat, lon))
                })
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }
}
