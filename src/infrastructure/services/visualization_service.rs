//! Traffic level visualisation of a collected flow GeoJSON

use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::{BoundingBox, DomainError, FeatureCollection, TrafficBand};
use crate::infrastructure::render::{label_font, load_segments, Canvas, PixelSegment};

const LEGEND_MARGIN: i32 = 20;
const LEGEND_SWATCH: u32 = 30;
const LEGEND_SPACING: i32 = 40;
const LEGEND_TEXT_X: i32 = LEGEND_MARGIN + LEGEND_SWATCH as i32 + 10;
const LEGEND_TEXT_SIZE: f32 = 28.0;

/// Rendering parameters
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub view: BoundingBox,
    pub width: u32,
    pub height: u32,
    pub line_thickness: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            view: BoundingBox::iasi_render_view(),
            width: 5000,
            height: 5000,
            line_thickness: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub segments: usize,
    pub lines: usize,
    pub output: PathBuf,
}

/// Draw segments plus the labelled legend onto a new canvas.
///
/// Returns the canvas and the number of line pieces drawn.
pub fn render_segments(
    segments: &[PixelSegment],
    options: &RenderOptions,
) -> Result<(Canvas, usize), DomainError> {
    let mut canvas = Canvas::new(options.width, options.height);
    let mut lines = 0;

    for segment in segments {
        let color = segment.band.rgb();
        for pair in segment.points.windows(2) {
            canvas.draw_line(pair[0], pair[1], color, options.line_thickness);
            lines += 1;
        }
    }

    draw_legend(&mut canvas, segments.len())?;
    Ok((canvas, lines))
}

fn draw_legend(canvas: &mut Canvas, segment_count: usize) -> Result<(), DomainError> {
    let font = label_font()?;

    for (i, band) in TrafficBand::ALL.iter().enumerate() {
        let y = LEGEND_MARGIN + i as i32 * LEGEND_SPACING;
        canvas.fill_rect(LEGEND_MARGIN, y, LEGEND_SWATCH, LEGEND_SWATCH, band.rgb());
        canvas.draw_text(
            LEGEND_TEXT_X,
            y,
            band.label(),
            band.rgb(),
            LEGEND_TEXT_SIZE,
            &font,
        );
    }

    let y = LEGEND_MARGIN + TrafficBand::ALL.len() as i32 * LEGEND_SPACING;
    canvas.draw_text(
        LEGEND_MARGIN,
        y,
        &format!("Segments: {}", segment_count),
        [255, 255, 255],
        LEGEND_TEXT_SIZE,
        &font,
    );
    Ok(())
}

/// Read a flow GeoJSON and render it to a PNG at `output`.
pub async fn visualize(
    input: &Path,
    output: &Path,
    options: &RenderOptions,
) -> Result<RenderReport, DomainError> {
    options.view.validate()?;
    if options.width == 0 || options.height == 0 {
        return Err(DomainError::validation("Image size must be non-zero"));
    }

    info!("Visualizing traffic data from {}", input.display());
    let text = tokio::fs::read_to_string(input)
        .await
        .map_err(|e| DomainError::io(format!("Failed to read {}: {}", input.display(), e)))?;
    let collection: FeatureCollection = serde_json::from_str(&text)?;

    let segments = load_segments(&collection, &options.view, options.width, options.height);
    info!("Segments loaded: {}", segments.len());

    info!("Rendering...");
    let options_owned = options.clone();
    let output_owned = output.to_path_buf();
    let segment_count = segments.len();
    let lines = tokio::task::spawn_blocking(move || -> Result<usize, DomainError> {
        let (canvas, lines) = render_segments(&segments, &options_owned)?;
        canvas.save_png(&output_owned)?;
        Ok(lines)
    })
    .await
    .map_err(|e| DomainError::io(format!("Render task failed: {}", e)))??;

    info!(
        "Rendered {} lines from {} segments to {}",
        lines,
        segment_count,
        output.display()
    );

    Ok(RenderReport {
        segments: segment_count,
        lines,
        output: output.to_path_buf(),
    })
}
