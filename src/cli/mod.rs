//! CLI module for the Iasi traffic collector
//!
//! Provides subcommands for each stage of building the dataset:
//! - `collect`: flow tiles + incidents + summary (default workflow)
//! - `flow`, `incidents`, `summary`: a single stage
//! - `speeds`: per-segment speed sampling for a collected flow GeoJSON
//! - `render`: PNG visualisation of a collected flow GeoJSON

pub mod collect;
pub mod render;
pub mod speeds;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::warn;

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Iasi traffic collector - TomTom flow tiles, incidents and speed samples
#[derive(Parser)]
#[command(name = "iasi-traffic")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command
#[derive(Args, Clone, Debug, Default)]
pub struct GlobalArgs {
    /// Directory dataset files are written to (overrides config)
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Tile zoom level for flow collection (overrides config)
    #[arg(long, global = true)]
    pub zoom: Option<u8>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Collect flow tiles and incidents, then write the summary
    Collect,

    /// Collect traffic flow tiles only
    Flow,

    /// Collect traffic incidents only
    Incidents,

    /// Write the collection summary for the output directory
    Summary,

    /// Sample flow segment speeds for every street of a flow GeoJSON
    Speeds(speeds::SpeedsArgs),

    /// Render a flow GeoJSON to a PNG coloured by traffic level
    Render(render::RenderArgs),
}

/// Load `.env` and configuration, apply CLI overrides, start logging.
pub fn bootstrap(global: &GlobalArgs) -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let loaded = AppConfig::load();
    let mut config = loaded.as_ref().cloned().unwrap_or_default();
    logging::init_logging(&config.logging);

    if let Err(e) = loaded {
        warn!("Failed to load configuration, using defaults: {}", e);
    }

    apply_overrides(&mut config, global);
    config.validate()?;

    Ok(config)
}

fn apply_overrides(config: &mut AppConfig, global: &GlobalArgs) {
    if let Some(dir) = &global.output_dir {
        config.output.dir = dir.clone();
    }
    if let Some(zoom) = global.zoom {
        config.tomtom.zoom = zoom;
    }
}
