//! Freehand (and polygon) drawing and editing.

use annokit_core::constants::{HANDLE_BASE_RADIUS, MIN_DRAG_EXTENT};
use annokit_core::geometry::{Geometry, GeometryKind, Point};
use annokit_core::types::shared;

use crate::annotation::Annotation;
use crate::element::{Element, ElementNode};
use crate::input::PointerEvent;

use super::{DrawingTool, EditableShape, FinishedShape};

/// Points closer together than this are dropped while sketching.
const MIN_POINT_SPACING: f64 = 0.5;

struct FreehandSession {
    points: Vec<Point>,
    element: Element,
}

/// Sketches a freehand outline by dragging.
pub struct FreehandTool {
    session: Option<FreehandSession>,
}

impl FreehandTool {
    pub fn new() -> Self {
        Self { session: None }
    }
}

impl Default for FreehandTool {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingTool for FreehandTool {
    fn kind(&self) -> GeometryKind {
        GeometryKind::Freehand
    }

    fn start(&mut self, origin: Point, _event: &PointerEvent) {
        let element = shared(ElementNode::new(Geometry::Freehand(vec![origin])));
        self.session = Some(FreehandSession {
            points: vec![origin],
            element,
        });
    }

    fn on_move(&mut self, point: Point, _event: &PointerEvent) {
        if let Some(session) = self.session.as_mut() {
            let far_enough = session
                .points
                .last()
                .map(|last| last.distance_to(&point) >= MIN_POINT_SPACING)
                .unwrap_or(true);
            if far_enough {
                session.points.push(point);
                session
                    .element
                    .borrow_mut()
                    .set_geometry(Geometry::Freehand(session.points.clone()));
            }
        }
    }

    fn on_up(&mut self, point: Point, event: &PointerEvent) -> Option<FinishedShape> {
        self.on_move(point, event);
        let session = self.session.take()?;

        let geometry = Geometry::Freehand(session.points);
        let bounds = geometry.bounding_box();
        if bounds.width < MIN_DRAG_EXTENT && bounds.height < MIN_DRAG_EXTENT {
            tracing::debug!(?bounds, "freehand gesture too small, discarding");
            return None;
        }

        let annotation = Annotation::draft(geometry.clone());
        {
            let mut node = session.element.borrow_mut();
            node.set_geometry(geometry);
            node.set_annotation_id(Some(annotation.id().clone()));
        }
        Some(FinishedShape {
            annotation,
            element: session.element,
        })
    }

    fn is_drawing(&self) -> bool {
        self.session.is_some()
    }

    fn element(&self) -> Option<Element> {
        self.session.as_ref().map(|s| s.element.clone())
    }

    fn stop(&mut self) {
        self.session = None;
    }

    fn create_editable_shape(&self, annotation: &Annotation) -> Box<dyn EditableShape> {
        Box::new(EditablePolygon::new(annotation))
    }
}

enum PolyDrag {
    Move { last: Point },
    Vertex { index: usize },
}

/// An outline with one handle per vertex and body-move support. Edits both
/// polygon and freehand targets, preserving the variant.
pub struct EditablePolygon {
    element: Element,
    points: Vec<Point>,
    kind: GeometryKind,
    handle_scale: f64,
    drag: Option<PolyDrag>,
}

impl EditablePolygon {
    pub fn new(annotation: &Annotation) -> Self {
        let (points, kind) = match annotation.target() {
            Geometry::Polygon(points) => (points.clone(), GeometryKind::Polygon),
            Geometry::Freehand(points) => (points.clone(), GeometryKind::Freehand),
            other => {
                // Degrade any other target to its bounding outline
                let b = other.bounding_box();
                (
                    vec![
                        Point::new(b.x, b.y),
                        Point::new(b.x + b.width, b.y),
                        Point::new(b.x + b.width, b.y + b.height),
                        Point::new(b.x, b.y + b.height),
                    ],
                    GeometryKind::Polygon,
                )
            }
        };

        let mut node = ElementNode::new(Self::target_of(&points, kind));
        node.set_annotation_id(Some(annotation.id().clone()));
        node.set_interactive(true);

        Self {
            element: shared(node),
            points,
            kind,
            handle_scale: 1.0,
            drag: None,
        }
    }

    fn target_of(points: &[Point], kind: GeometryKind) -> Geometry {
        match kind {
            GeometryKind::Freehand => Geometry::Freehand(points.to_vec()),
            _ => Geometry::Polygon(points.to_vec()),
        }
    }

    fn handle_radius(&self) -> f64 {
        HANDLE_BASE_RADIUS * self.handle_scale
    }

    fn vertex_at(&self, point: Point) -> Option<usize> {
        let radius = self.handle_radius();
        self.points
            .iter()
            .position(|p| p.distance_to(&point) <= radius)
    }

    fn sync_element(&self) {
        self.element
            .borrow_mut()
            .set_geometry(Self::target_of(&self.points, self.kind));
    }
}

impl EditableShape for EditablePolygon {
    fn element(&self) -> Element {
        self.element.clone()
    }

    fn current_target(&self) -> Geometry {
        Self::target_of(&self.points, self.kind)
    }

    fn set_handle_scale(&mut self, scale: f64) {
        self.handle_scale = scale;
        self.element.borrow_mut().set_handle_scale(scale);
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.vertex_at(point).is_some()
            || self.current_target().contains_point(&point, tolerance)
    }

    fn pointer_down(&mut self, point: Point) -> bool {
        if let Some(index) = self.vertex_at(point) {
            self.drag = Some(PolyDrag::Vertex { index });
            true
        } else if self.current_target().contains_point(&point, 0.0) {
            self.drag = Some(PolyDrag::Move { last: point });
            true
        } else {
            false
        }
    }

    fn pointer_drag(&mut self, point: Point) -> Option<Geometry> {
        match self.drag.as_mut()? {
            PolyDrag::Move { last } => {
                let dx = point.x - last.x;
                let dy = point.y - last.y;
                *last = point;
                for p in self.points.iter_mut() {
                    p.x += dx;
                    p.y += dy;
                }
            }
            PolyDrag::Vertex { index } => {
                let index = *index;
                if let Some(p) = self.points.get_mut(index) {
                    *p = point;
                }
            }
        }
        self.sync_element();
        Some(self.current_target())
    }

    fn pointer_up(&mut self, point: Point) -> Option<Geometry> {
        self.drag.as_ref()?;
        self.pointer_drag(point);
        self.drag = None;
        Some(self.current_target())
    }

    fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}
