//! Render command - draws collected streets coloured by traffic level

use std::path::PathBuf;

use clap::Args;

use crate::config::AppConfig;
use crate::infrastructure::services::{visualize, RenderOptions, FLOW_GEOJSON_FILE};

/// Arguments for the render command
#[derive(Args, Clone, Debug)]
pub struct RenderArgs {
    /// Flow GeoJSON to render (defaults to the collected flow tiles)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// PNG to write (overrides config)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Image width in pixels (overrides config)
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels (overrides config)
    #[arg(long)]
    pub height: Option<u32>,
}

/// Run the renderer
pub async fn run(config: &AppConfig, args: RenderArgs) -> anyhow::Result<()> {
    let input = args
        .input
        .unwrap_or_else(|| config.output.dir.join(FLOW_GEOJSON_FILE));
    let output = args.output.unwrap_or_else(|| config.render.output.clone());

    let options = RenderOptions {
        view: config.render.view,
        width: args.width.unwrap_or(config.render.width),
        height: args.height.unwrap_or(config.render.height),
        line_thickness: config.render.line_thickness,
    };

    visualize(&input, &output, &options).await?;
    Ok(())
}
