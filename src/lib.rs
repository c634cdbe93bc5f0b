//! Iasi traffic dataset collector
//!
//! Builds an on-disk traffic dataset for a bounding box from the TomTom APIs:
//! - Traffic flow vector tiles decoded to GeoJSON street segments
//! - Incident reports (accidents, closures, roadworks)
//! - Per-segment speed samples from the flow segment endpoint
//! - A PNG rendering of the street network coloured by traffic level

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use domain::TrafficProvider;
use infrastructure::{HttpClient, TomTomProvider};
use tracing::info;

/// Build the TomTom provider from configuration and `TOMTOM_API_KEY`.
pub fn create_traffic_provider(config: &AppConfig) -> anyhow::Result<Arc<dyn TrafficProvider>> {
    let api_key = crate::config::api_key_from_env()?;
    let client = HttpClient::with_timeout(Duration::from_secs(config.tomtom.timeout_secs))?;

    info!("Using TomTom provider at {}", config.tomtom.base_url);
    let provider = TomTomProvider::with_base_url(client, api_key, &config.tomtom.base_url)
        .with_language(&config.tomtom.language)
        .with_retry(config.tomtom.retry.clone());

    Ok(Arc::new(provider))
}
