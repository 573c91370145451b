//! Pixel snippet extraction.
//!
//! The image pixels themselves live with the host; the overlay consumes them
//! through [`SnippetSource`] to cut out the region under the current
//! selection.

use annokit_core::error::SnippetError;
use annokit_core::geometry::{Rect, Size};
use image::RgbaImage;

/// Supplies image pixels for snippet extraction.
pub trait SnippetSource {
    /// Full image dimensions in pixels.
    fn image_size(&self) -> Size;

    /// Copies the region (image pixel coordinates) out of the source. The
    /// region is clamped to the image bounds.
    fn extract(&self, region: Rect) -> Result<RgbaImage, SnippetError>;
}

/// A [`SnippetSource`] over an in-memory RGBA image.
pub struct ImagePixels {
    pixels: RgbaImage,
}

impl ImagePixels {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }
}

impl SnippetSource for ImagePixels {
    fn image_size(&self) -> Size {
        Size::new(self.pixels.width() as f64, self.pixels.height() as f64)
    }

    fn extract(&self, region: Rect) -> Result<RgbaImage, SnippetError> {
        let region = region.normalized();
        let (img_w, img_h) = (self.pixels.width() as f64, self.pixels.height() as f64);

        let x0 = region.x.max(0.0).min(img_w);
        let y0 = region.y.max(0.0).min(img_h);
        let x1 = (region.x + region.width).max(0.0).min(img_w);
        let y1 = (region.y + region.height).max(0.0).min(img_h);

        let width = (x1 - x0).round() as u32;
        let height = (y1 - y0).round() as u32;
        if width == 0 || height == 0 {
            return Err(SnippetError::EmptyRegion { width, height });
        }

        Ok(
            image::imageops::crop_imm(&self.pixels, x0.round() as u32, y0.round() as u32, width, height)
                .to_image(),
        )
    }
}
