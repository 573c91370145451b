//! The viewport collaborator.
//!
//! The viewer that pans, zooms, and rotates the image is external; the
//! overlay consumes it through the [`Viewport`] trait and reacts to
//! [`ViewportEvent`] notifications pushed by the host. Viewport coordinates
//! are the viewer's own normalized space (the image's width spans 1.0 units);
//! image coordinates are pixels of the loaded image; container pixels are
//! screen pixels relative to the viewer element.

use annokit_core::constants::{VIEW_PADDING, ZOOM_MAX, ZOOM_MIN};
use annokit_core::geometry::{Point, Rect, Size};

/// Viewport change notifications, delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportEvent {
    /// The view was panned.
    Pan,
    /// The zoom level changed.
    Zoom,
    /// The rotation changed.
    Rotate,
    /// The horizontal flip flag changed.
    Flip,
    /// The container was resized.
    Resize,
    /// An image was opened.
    Open,
}

/// Read/steer interface onto the external image viewer.
pub trait Viewport {
    /// Current zoom level (1.0 shows the full image width).
    fn zoom(&self) -> f64;

    /// Container dimensions in screen pixels.
    fn container_size(&self) -> Size;

    /// Pixels of image width per viewport unit for the loaded image.
    fn content_factor(&self) -> f64;

    /// Rotation in degrees.
    fn rotation(&self) -> f64;

    /// Whether the view is mirrored horizontally.
    fn is_flipped(&self) -> bool;

    /// Whether an image is loaded. The overlay skips transform syncs until
    /// this is true.
    fn is_open(&self) -> bool {
        true
    }

    /// Converts a viewport point to container pixels.
    fn pixel_from_point(&self, point: Point) -> Point;

    /// Converts container pixels to a viewport point.
    fn point_from_pixel(&self, pixel: Point) -> Point;

    /// Converts a viewport point to image pixels.
    fn viewport_to_image(&self, point: Point) -> Point;

    /// Converts image pixels to a viewport point.
    fn image_to_viewport(&self, point: Point) -> Point;

    /// Converts a viewport rectangle to an image pixel rectangle.
    fn viewport_to_image_rect(&self, rect: Rect) -> Rect {
        let tl = self.viewport_to_image(Point::new(rect.x, rect.y));
        let br = self.viewport_to_image(Point::new(rect.x + rect.width, rect.y + rect.height));
        Rect::new(tl.x, tl.y, br.x - tl.x, br.y - tl.y).normalized()
    }

    /// Converts an image pixel rectangle to a viewport rectangle.
    fn image_to_viewport_rect(&self, rect: Rect) -> Rect {
        let tl = self.image_to_viewport(Point::new(rect.x, rect.y));
        let br = self.image_to_viewport(Point::new(rect.x + rect.width, rect.y + rect.height));
        Rect::new(tl.x, tl.y, br.x - tl.x, br.y - tl.y).normalized()
    }

    /// Converts window/client coordinates to a viewport point.
    fn window_to_viewport(&self, point: Point) -> Point;

    /// Zooms and pans so the given viewport rectangle fills the view.
    fn fit_bounds(&mut self, bounds: Rect);

    /// Pans so the given viewport point is centered.
    fn pan_to(&mut self, center: Point);
}

/// A minimal planar viewport: zoom and pan over a flat image, no tiling.
///
/// Backs the demo binary and the test suites; real hosts adapt their own
/// viewer instead.
#[derive(Debug, Clone)]
pub struct PlanarViewport {
    zoom: f64,
    center: Point,
    container: Size,
    content_factor: f64,
    rotation: f64,
    flipped: bool,
    /// Container's offset inside the window, for window coordinate
    /// conversion.
    window_offset: Point,
    open: bool,
}

impl PlanarViewport {
    /// Creates a viewport showing an image of `image_width` pixels inside a
    /// container, centered at zoom 1.0.
    pub fn new(container: Size, image_width: f64) -> Self {
        let aspect = container.height / container.width;
        Self {
            zoom: 1.0,
            center: Point::new(0.5, aspect / 2.0),
            container,
            content_factor: image_width,
            rotation: 0.0,
            flipped: false,
            window_offset: Point::ZERO,
            open: true,
        }
    }

    /// Sets the container's offset inside the window.
    pub fn set_window_offset(&mut self, offset: Point) {
        self.window_offset = offset;
    }

    /// Sets the zoom level, constrained to the supported range.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom > ZOOM_MIN && zoom < ZOOM_MAX {
            self.zoom = zoom;
        }
    }

    /// Centers the view on a viewport point.
    pub fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    /// Sets the rotation in degrees.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = degrees;
    }

    /// Sets the horizontal flip flag.
    pub fn set_flipped(&mut self, flipped: bool) {
        self.flipped = flipped;
    }

    /// Resizes the container.
    pub fn set_container_size(&mut self, size: Size) {
        self.container = size;
    }

    /// Marks the viewport open or closed.
    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    /// Viewport units visible along each axis at the current zoom.
    fn visible_extent(&self) -> Size {
        let width = 1.0 / self.zoom;
        let height = self.container.height / (self.container.width * self.zoom);
        Size::new(width, height)
    }

    fn top_left(&self) -> Point {
        let extent = self.visible_extent();
        Point::new(
            self.center.x - extent.width / 2.0,
            self.center.y - extent.height / 2.0,
        )
    }

    /// Container pixels per viewport unit.
    fn pixels_per_unit(&self) -> f64 {
        self.container.width * self.zoom
    }
}

impl Viewport for PlanarViewport {
    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn container_size(&self) -> Size {
        self.container
    }

    fn content_factor(&self) -> f64 {
        self.content_factor
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn is_flipped(&self) -> bool {
        self.flipped
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn pixel_from_point(&self, point: Point) -> Point {
        let tl = self.top_left();
        let ppu = self.pixels_per_unit();
        Point::new((point.x - tl.x) * ppu, (point.y - tl.y) * ppu)
    }

    fn point_from_pixel(&self, pixel: Point) -> Point {
        let tl = self.top_left();
        let ppu = self.pixels_per_unit();
        Point::new(pixel.x / ppu + tl.x, pixel.y / ppu + tl.y)
    }

    fn viewport_to_image(&self, point: Point) -> Point {
        Point::new(point.x * self.content_factor, point.y * self.content_factor)
    }

    fn image_to_viewport(&self, point: Point) -> Point {
        Point::new(point.x / self.content_factor, point.y / self.content_factor)
    }

    fn window_to_viewport(&self, point: Point) -> Point {
        self.point_from_pixel(Point::new(
            point.x - self.window_offset.x,
            point.y - self.window_offset.y,
        ))
    }

    fn fit_bounds(&mut self, bounds: Rect) {
        let bounds = bounds.normalized();
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            return;
        }

        let padding_factor = 1.0 - VIEW_PADDING * 2.0;
        let zoom_x = padding_factor / bounds.width;
        let zoom_y =
            (self.container.height * padding_factor) / (self.container.width * bounds.height);
        self.zoom = zoom_x.min(zoom_y).clamp(ZOOM_MIN, ZOOM_MAX);
        self.center = bounds.center();
    }

    fn pan_to(&mut self, center: Point) {
        self.center = center;
    }
}
