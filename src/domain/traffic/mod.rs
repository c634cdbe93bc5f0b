//! Traffic observation models and the provider seam

mod feature;
mod level;
mod provider;
mod speed;
mod summary;

pub use feature::{Feature, FeatureCollection, Properties};
pub use level::{TrafficBand, DEFAULT_TRAFFIC_LEVEL};
pub use provider::TrafficProvider;
pub use speed::{run_stamp, SpeedRunFiles, SpeedRunMetadata, SpeedSample};
pub use summary::{CollectedFile, CollectionSummary};

#[cfg(test)]
pub use provider::mock::MockTrafficProvider;
