//! Domain layer - Core entities, math and traits

pub mod error;
pub mod geo;
pub mod retry;
pub mod traffic;

pub use error::DomainError;
pub use geo::{BoundingBox, Geometry, Position, TileCoord};
pub use retry::RetryConfig;
pub use traffic::{
    CollectedFile, CollectionSummary, Feature, FeatureCollection, Properties, SpeedRunMetadata,
    SpeedSample, TrafficBand, TrafficProvider,
};
