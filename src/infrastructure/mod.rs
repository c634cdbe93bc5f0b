//! Infrastructure layer - External service implementations

pub mod http_client;
pub mod logging;
pub mod mvt;
pub mod output;
pub mod render;
pub mod services;
pub mod tomtom;

pub use http_client::{HttpClient, HttpClientTrait};
pub use output::OutputWriter;
pub use tomtom::TomTomProvider;
