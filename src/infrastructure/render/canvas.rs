use std::path::Path;

use ab_glyph::{FontRef, PxScale};
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut};
use imageproc::rect::Rect;

use crate::domain::DomainError;

static LABEL_FONT: &[u8] = include_bytes!("../../../assets/fonts/DejaVuSans.ttf");

/// Bundled font used for legend labels
pub fn label_font() -> Result<FontRef<'static>, DomainError> {
    FontRef::try_from_slice(LABEL_FONT)
        .map_err(|e| DomainError::decode(format!("Invalid label font: {}", e)))
}

/// RGB raster the street network is drawn on
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    /// Black canvas of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x < self.width() && y < self.height() {
            Some(self.image.get_pixel(x, y).0)
        } else {
            None
        }
    }

    /// Draw a segment `thickness` pixels wide.
    pub fn draw_line(&mut self, from: (u32, u32), to: (u32, u32), color: [u8; 3], thickness: u32) {
        let radius = (thickness.max(1) / 2) as i64;
        let color = Rgb(color);

        for dx in -radius..=radius {
            for dy in -radius..=radius {
                let start = ((from.0 as i64 + dx) as f32, (from.1 as i64 + dy) as f32);
                let end = ((to.0 as i64 + dx) as f32, (to.1 as i64 + dy) as f32);
                draw_line_segment_mut(&mut self.image, start, end, color);
            }
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: [u8; 3]) {
        if width == 0 || height == 0 {
            return;
        }
        draw_filled_rect_mut(
            &mut self.image,
            Rect::at(x, y).of_size(width, height),
            Rgb(color),
        );
    }

    /// Draw `text` with its top-left corner at `(x, y)`, clipped to the canvas.
    pub fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        color: [u8; 3],
        size: f32,
        font: &FontRef<'_>,
    ) {
        draw_text_mut(
            &mut self.image,
            Rgb(color),
            x,
            y,
            PxScale::from(size),
            font,
            text,
        );
    }

    pub fn save_png(&self, path: &Path) -> Result<(), DomainError> {
        self.image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| DomainError::io(format!("Failed to write {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_canvas_is_black() {
        let canvas = Canvas::new(4, 3);
        assert_eq!(canvas.width(), 4);
        assert_eq!(canvas.height(), 3);
        assert_eq!(canvas.pixel(3, 2), Some([0, 0, 0]));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn test_thick_line_covers_neighbours() {
        let mut canvas = Canvas::new(20, 20);
        canvas.draw_line((2, 10), (17, 10), [0, 255, 0], 3);

        assert_eq!(canvas.pixel(10, 10), Some([0, 255, 0]));
        assert_eq!(canvas.pixel(10, 9), Some([0, 255, 0]));
        assert_eq!(canvas.pixel(10, 11), Some([0, 255, 0]));
        assert_eq!(canvas.pixel(10, 13), Some([0, 0, 0]));
    }

    #[test]
    fn test_line_at_edge_does_not_panic() {
        let mut canvas = Canvas::new(5, 5);
        canvas.draw_line((0, 0), (4, 4), [255, 0, 0], 3);
        assert_eq!(canvas.pixel(0, 0), Some([255, 0, 0]));
    }

    #[test]
    fn test_fill_rect() {
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_rect(2, 2, 3, 3, [255, 165, 0]);
        assert_eq!(canvas.pixel(3, 3), Some([255, 165, 0]));
        assert_eq!(canvas.pixel(6, 6), Some([0, 0, 0]));
    }

    #[test]
    fn test_draw_text_marks_pixels() {
        let font = label_font().unwrap();
        let mut canvas = Canvas::new(120, 40);
        canvas.draw_text(2, 2, "Segments: 7", [255, 255, 255], 24.0, &font);

        let lit = (0..120)
            .flat_map(|x| (0..40).map(move |y| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y) != Some([0, 0, 0]))
            .count();
        assert!(lit > 20);
    }

    #[test]
    fn test_draw_text_outside_canvas_is_clipped() {
        let font = label_font().unwrap();
        let mut canvas = Canvas::new(10, 10);
        canvas.draw_text(500, 500, "far away", [255, 0, 0], 24.0, &font);
        assert_eq!(canvas.pixel(9, 9), Some([0, 0, 0]));
    }

    #[test]
    fn test_save_png() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.png");
        Canvas::new(8, 8).save_png(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
    }
}
