//! Collection and rendering services

mod flow_collector;
mod incident_collector;
mod speed_collector;
mod summary_service;
mod visualization_service;

#[cfg(test)]
pub(crate) use flow_collector::fixtures;
pub use flow_collector::{
    tile_features, FlowCollector, FlowReport, FLOW_GEOJSON_FILE, FLOW_RECORDS_FILE,
};
pub use incident_collector::{
    incidents_to_features, IncidentCollector, INCIDENTS_GEOJSON_FILE, INCIDENTS_RAW_FILE,
    INCIDENTS_RECORDS_FILE,
};
pub use speed_collector::{SpeedCollector, SpeedReport};
pub use summary_service::{generate_summary, SUMMARY_FILE};
pub use visualization_service::{render_segments, visualize, RenderOptions, RenderReport};
