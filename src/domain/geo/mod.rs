//! Geographic primitives - bounding boxes, slippy-map tiles and GeoJSON geometry

mod bbox;
mod geometry;
mod tile;

pub use bbox::BoundingBox;
pub use geometry::{Geometry, Position};
pub use tile::{latlon_to_tile, tile_pixel_to_lonlat, tiles_for_bbox, TileCoord, DEFAULT_EXTENT};
