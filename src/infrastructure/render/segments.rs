use crate::domain::traffic::DEFAULT_TRAFFIC_LEVEL;
use crate::domain::{BoundingBox, FeatureCollection, TrafficBand};

/// Polyline in image space with its congestion band
#[derive(Debug, Clone, PartialEq)]
pub struct PixelSegment {
    pub points: Vec<(u32, u32)>,
    pub band: TrafficBand,
}

/// Map a position inside `view` to image pixels (y down, north at the top).
///
/// Returns `None` when the position falls outside the image.
pub fn latlon_to_pixel(
    lat: f64,
    lon: f64,
    view: &BoundingBox,
    width: u32,
    height: u32,
) -> Option<(u32, u32)> {
    let norm_lon = (lon - view.min_lon) / view.lon_span();
    let norm_lat = (lat - view.min_lat) / view.lat_span();
    let px = (norm_lon * f64::from(width)).floor();
    let py = ((1.0 - norm_lat) * f64::from(height)).floor();

    if px >= 0.0 && py >= 0.0 && px < f64::from(width) && py < f64::from(height) {
        Some((px as u32, py as u32))
    } else {
        None
    }
}

/// Convert every linear feature to pixel polylines.
///
/// Points outside the image are dropped; polylines left with fewer than two
/// points are dropped.
pub fn load_segments(
    collection: &FeatureCollection,
    view: &BoundingBox,
    width: u32,
    height: u32,
) -> Vec<PixelSegment> {
    let mut segments = Vec::new();

    for feature in &collection.features {
        let Some(geometry) = feature.parsed_geometry() else {
            continue;
        };
        let level = feature
            .property_f64("traffic_level")
            .unwrap_or(DEFAULT_TRAFFIC_LEVEL);
        let band = TrafficBand::from_level(level);

        for line in geometry.lines() {
            let points: Vec<(u32, u32)> = line
                .iter()
                .filter_map(|[lon, lat]| latlon_to_pixel(*lat, *lon, view, width, height))
                .collect();

            if points.len() > 1 {
                segments.push(PixelSegment { points, band });
            }
        }
    }

    segments
}
