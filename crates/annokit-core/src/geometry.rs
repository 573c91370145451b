//! Geometric primitives for annotation targets.
//!
//! Points and rectangles are in image pixel space unless a function says
//! otherwise. The `Geometry` enum is the target of an annotation; the overlay
//! crate dispatches drawing tools on its `GeometryKind`.

use serde::{Deserialize, Serialize};

/// Represents a 2D point with X and Y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Origin point (0, 0).
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    /// Creates a new point with the given X and Y coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculates the distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A width/height pair, typically container dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Creates a new size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle described by its top-left corner and extent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalizes negative extents so width and height are non-negative.
    pub fn normalized(&self) -> Rect {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Rect::new(x, y, width, height)
    }

    /// Area of the rectangle.
    pub fn area(&self) -> f64 {
        self.width.abs() * self.height.abs()
    }

    /// Center of the rectangle.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether the point lies inside, expanded by `tolerance` on all sides.
    pub fn contains(&self, p: &Point, tolerance: f64) -> bool {
        let r = self.normalized();
        p.x >= r.x - tolerance
            && p.x <= r.x + r.width + tolerance
            && p.y >= r.y - tolerance
            && p.y <= r.y + r.height + tolerance
    }
}

/// Rotates a point around a center by an angle in degrees.
pub fn rotate_point(p: Point, center: Point, angle_deg: f64) -> Point {
    if angle_deg.abs() < 1e-6 {
        return p;
    }
    let angle_rad = angle_deg.to_radians();
    let cos_a = angle_rad.cos();
    let sin_a = angle_rad.sin();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point {
        x: center.x + dx * cos_a - dy * sin_a,
        y: center.y + dx * sin_a + dy * cos_a,
    }
}

/// Tags the geometry variants; drawing tools register under a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Rect,
    Polygon,
    Ellipse,
    Freehand,
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryKind::Rect => write!(f, "rect"),
            GeometryKind::Polygon => write!(f, "polygon"),
            GeometryKind::Ellipse => write!(f, "ellipse"),
            GeometryKind::Freehand => write!(f, "freehand"),
        }
    }
}

/// The geometric target of an annotation, in image pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Rect(Rect),
    Polygon(Vec<Point>),
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    Freehand(Vec<Point>),
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Rect(_) => GeometryKind::Rect,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::Ellipse { .. } => GeometryKind::Ellipse,
            Geometry::Freehand(_) => GeometryKind::Freehand,
        }
    }

    /// Axis-aligned bounding box of the geometry.
    pub fn bounding_box(&self) -> Rect {
        match self {
            Geometry::Rect(r) => r.normalized(),
            Geometry::Polygon(points) | Geometry::Freehand(points) => bounds_of(points),
            Geometry::Ellipse { cx, cy, rx, ry } => {
                Rect::new(cx - rx, cy - ry, rx * 2.0, ry * 2.0)
            }
        }
    }

    /// Bounding-box area; the registry sorts shapes by this, descending.
    pub fn area(&self) -> f64 {
        self.bounding_box().area()
    }

    /// Point-in-geometry test with a tolerance in the same units.
    pub fn contains_point(&self, p: &Point, tolerance: f64) -> bool {
        match self {
            Geometry::Rect(r) => r.contains(p, tolerance),
            Geometry::Polygon(points) | Geometry::Freehand(points) => {
                point_in_polygon(points, p)
                    || (tolerance > 0.0 && distance_to_outline(points, p) <= tolerance)
            }
            Geometry::Ellipse { cx, cy, rx, ry } => {
                if *rx <= 0.0 || *ry <= 0.0 {
                    return false;
                }
                let nx = (p.x - cx) / (rx + tolerance);
                let ny = (p.y - cy) / (ry + tolerance);
                nx * nx + ny * ny <= 1.0
            }
        }
    }

    /// Moves the geometry by a delta, preserving its form.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Geometry::Rect(r) => {
                r.x += dx;
                r.y += dy;
            }
            Geometry::Polygon(points) | Geometry::Freehand(points) => {
                for p in points.iter_mut() {
                    p.x += dx;
                    p.y += dy;
                }
            }
            Geometry::Ellipse { cx, cy, .. } => {
                *cx += dx;
                *cy += dy;
            }
        }
    }
}

fn bounds_of(points: &[Point]) -> Rect {
    if points.is_empty() {
        return Rect::default();
    }
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

/// Distance from a point to the closed outline through the given points.
fn distance_to_outline(points: &[Point], p: &Point) -> f64 {
    if points.is_empty() {
        return f64::INFINITY;
    }
    if points.len() == 1 {
        return points[0].distance_to(p);
    }
    let mut best = f64::INFINITY;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        best = best.min(distance_to_segment(a, b, p));
    }
    best
}

fn distance_to_segment(a: Point, b: Point, p: &Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq < 1e-12 {
        return a.distance_to(p);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    Point::new(a.x + t * dx, a.y + t * dy).distance_to(p)
}

/// Ray-casting point-in-polygon test.
fn point_in_polygon(points: &[Point], p: &Point) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (pi, pj) = (&points[i], &points[j]);
        if (pi.y > p.y) != (pj.y > p.y)
            && p.x < (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
