use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::BoundingBox;

/// Default vector tile extent (pixels per tile side)
pub const DEFAULT_EXTENT: u32 = 4096;

/// Slippy-map tile address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

fn tiles_per_side(z: u8) -> f64 {
    2f64.powi(i32::from(z))
}

/// Convert a WGS84 position to the tile containing it at zoom `z`.
pub fn latlon_to_tile(lat: f64, lon: f64, z: u8) -> (u32, u32) {
    let n = tiles_per_side(z);
    let x = (lon + 180.0) / 360.0 * n;
    let lat_rad = lat.to_radians();
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n;

    let max = n - 1.0;
    (x.floor().clamp(0.0, max) as u32, y.floor().clamp(0.0, max) as u32)
}

/// Convert a pixel inside a tile to `(lon, lat)`.
///
/// `py` grows downwards from the tile's top edge.
pub fn tile_pixel_to_lonlat(tile: TileCoord, px: f64, py: f64, extent: u32) -> (f64, f64) {
    let n = tiles_per_side(tile.z);
    let extent = f64::from(extent.max(1));
    let x_norm = (f64::from(tile.x) + px / extent) / n;
    let y_norm = (f64::from(tile.y) + py / extent) / n;

    let lon = x_norm * 360.0 - 180.0;
    let merc_n = PI - 2.0 * PI * y_norm;
    let lat = merc_n.sinh().atan().to_degrees();

    (lon, lat)
}

/// All tiles covering a bounding box, x-major then y ascending.
pub fn tiles_for_bbox(bbox: &BoundingBox, z: u8) -> Vec<TileCoord> {
    let (x_a, y_a) = latlon_to_tile(bbox.min_lat, bbox.min_lon, z);
    let (x_b, y_b) = latlon_to_tile(bbox.max_lat, bbox.max_lon, z);

    let (x_min, x_max) = (x_a.min(x_b), x_a.max(x_b));
    let (y_min, y_max) = (y_a.min(y_b), y_a.max(y_b));

    (x_min..=x_max)
        .flat_map(|x| (y_min..=y_max).map(move |y| TileCoord::new(z, x, y)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_latlon_to_tile_origin() {
        assert_eq!(latlon_to_tile(0.0, 0.0, 1), (1, 1));
        assert_eq!(latlon_to_tile(0.0, 0.0, 0), (0, 0));
    }

    #[test]
    fn test_latlon_to_tile_iasi_corners() {
        assert_eq!(latlon_to_tile(47.10, 27.52, 15), (18888, 11512));
        assert_eq!(latlon_to_tile(47.22, 27.66, 15), (18901, 11495));
    }

    #[test]
    fn test_tile_pixel_to_lonlat_world_corners() {
        let (lon, lat) = tile_pixel_to_lonlat(TileCoord::new(0, 0, 0), 0.0, 0.0, 4096);
        assert_close(lon, -180.0);
        assert_close(lat, 85.0511287798066);

        let (lon, lat) = tile_pixel_to_lonlat(TileCoord::new(0, 0, 0), 2048.0, 2048.0, 4096);
        assert_close(lon, 0.0);
        assert_close(lat, 0.0);
    }

    #[test]
    fn test_tile_pixel_to_lonlat_tile_origin() {
        let (lon, lat) = tile_pixel_to_lonlat(TileCoord::new(15, 18889, 11586), 0.0, 0.0, 4096);
        assert_close(lon, 27.520751953125);
        assert_close(lat, 46.54374960273857);
    }

    #[test]
    fn test_pixel_y_grows_southwards() {
        let tile = TileCoord::new(15, 18896, 11504);
        let (_, top) = tile_pixel_to_lonlat(tile, 0.0, 0.0, 4096);
        let (_, bottom) = tile_pixel_to_lonlat(tile, 0.0, 4096.0, 4096);
        assert!(top > bottom);
    }

    #[test]
    fn test_tiles_for_iasi_bbox() {
        let tiles = tiles_for_bbox(&BoundingBox::iasi(), 15);
        assert_eq!(tiles.len(), 14 * 18);
        assert_eq!(tiles.first(), Some(&TileCoord::new(15, 18888, 11495)));
        assert_eq!(tiles[1], TileCoord::new(15, 18888, 11496));
        assert_eq!(tiles.last(), Some(&TileCoord::new(15, 18901, 11512)));
    }

    #[test]
    fn test_tiles_for_tiny_bbox_is_single_tile() {
        let bbox = BoundingBox::new(47.158, 27.601, 47.1581, 27.6011);
        let tiles = tiles_for_bbox(&bbox, 15);
        assert_eq!(tiles, vec![TileCoord::new(15, 18896, 11504)]);
    }

    #[test]
    fn test_tile_display() {
        assert_eq!(TileCoord::new(15, 1, 2).to_string(), "15/1/2");
    }
}
