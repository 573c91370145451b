//! Overlay transform derivation.
//!
//! The overlay group's transform is derived state: recomputed from the
//! viewport on every relevant event, never diffed or cached across calls.
//! Composition order is translate, then scale, then rotate — rotation happens
//! in the already-scaled, already-translated frame.

use annokit_core::geometry::{rotate_point, Point};

use crate::viewport::Viewport;

/// The affine transform applied to the overlay root group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayTransform {
    /// Screen position of the image origin, in container pixels.
    pub translate: Point,
    /// Horizontal scale; negative when the viewport is flipped.
    pub scale_x: f64,
    /// Vertical scale (always positive).
    pub scale_y: f64,
    /// Rotation in degrees.
    pub rotation: f64,
}

impl OverlayTransform {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            translate: Point::ZERO,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
        }
    }

    /// The uniform scale magnitude, used to size screen-constant decorations
    /// such as manipulation handles.
    pub fn scale(&self) -> f64 {
        self.scale_y
    }

    /// Maps an overlay-local (image pixel) point to container pixels.
    pub fn apply(&self, p: Point) -> Point {
        let rotated = rotate_point(p, Point::ZERO, self.rotation);
        Point::new(
            self.translate.x + rotated.x * self.scale_x,
            self.translate.y + rotated.y * self.scale_y,
        )
    }
}

impl Default for OverlayTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Derives the overlay transform from the current viewport state.
///
/// `scale_y` is `zoom × container_width / content_factor`; `scale_x` equals
/// it, negated under horizontal flip. The translation is the screen position
/// of the image origin, mirrored across the container's inner width when
/// flipped.
pub fn derive_transform(viewport: &dyn Viewport) -> OverlayTransform {
    let container = viewport.container_size();
    let scale_y = viewport.zoom() * container.width / viewport.content_factor();
    let scale_x = if viewport.is_flipped() { -scale_y } else { scale_y };

    let mut origin = viewport.pixel_from_point(Point::ZERO);
    if viewport.is_flipped() {
        origin.x = container.width - origin.x;
    }

    OverlayTransform {
        translate: origin,
        scale_x,
        scale_y,
        rotation: viewport.rotation(),
    }
}
