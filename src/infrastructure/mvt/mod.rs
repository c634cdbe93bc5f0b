//! Mapbox Vector Tile decoding

mod decoder;
pub mod proto;

pub use decoder::{decode_tile, DecodedLayer, TileFeature};
