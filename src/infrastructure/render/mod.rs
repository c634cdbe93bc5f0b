//! Raster rendering of the collected street network

mod canvas;
mod segments;

pub use canvas::{label_font, Canvas};
pub use segments::{latlon_to_pixel, load_segments, PixelSegment};
