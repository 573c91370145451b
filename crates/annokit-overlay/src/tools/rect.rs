//! Rectangle drawing and editing.

use annokit_core::constants::{HANDLE_BASE_RADIUS, MIN_DRAG_EXTENT};
use annokit_core::geometry::{Geometry, GeometryKind, Point, Rect};
use annokit_core::types::shared;

use crate::annotation::Annotation;
use crate::element::{Element, ElementNode};
use crate::input::PointerEvent;

use super::{DrawingTool, EditableShape, FinishedShape};

struct RectSession {
    anchor: Point,
    cursor: Point,
    element: Element,
}

impl RectSession {
    fn rect(&self) -> Rect {
        Rect::new(
            self.anchor.x,
            self.anchor.y,
            self.cursor.x - self.anchor.x,
            self.cursor.y - self.anchor.y,
        )
        .normalized()
    }
}

/// Draws axis-aligned rectangles by dragging from one corner to the
/// opposite one.
pub struct RectangleTool {
    session: Option<RectSession>,
}

impl RectangleTool {
    pub fn new() -> Self {
        Self { session: None }
    }
}

impl Default for RectangleTool {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingTool for RectangleTool {
    fn kind(&self) -> GeometryKind {
        GeometryKind::Rect
    }

    fn start(&mut self, origin: Point, _event: &PointerEvent) {
        let element = shared(ElementNode::new(Geometry::Rect(Rect::new(
            origin.x, origin.y, 0.0, 0.0,
        ))));
        self.session = Some(RectSession {
            anchor: origin,
            cursor: origin,
            element,
        });
    }

    fn on_move(&mut self, point: Point, _event: &PointerEvent) {
        if let Some(session) = self.session.as_mut() {
            session.cursor = point;
            let rect = session.rect();
            session.element.borrow_mut().set_geometry(Geometry::Rect(rect));
        }
    }

    fn on_up(&mut self, point: Point, _event: &PointerEvent) -> Option<FinishedShape> {
        let mut session = self.session.take()?;
        session.cursor = point;
        let rect = session.rect();

        if rect.width < MIN_DRAG_EXTENT || rect.height < MIN_DRAG_EXTENT {
            tracing::debug!(?rect, "rectangle gesture too small, discarding");
            return None;
        }

        let annotation = Annotation::draft(Geometry::Rect(rect));
        {
            let mut node = session.element.borrow_mut();
            node.set_geometry(Geometry::Rect(rect));
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
        Box::new(EditableRect::new(annotation))
    }
}

enum RectDrag {
    Move { last: Point },
    Handle { index: usize },
}

/// A rectangle with four corner handles and body-move support.
pub struct EditableRect {
    element: Element,
    /// Opposite corners; normalized into a rect on read so handles may cross.
    a: Point,
    b: Point,
    handle_scale: f64,
    drag: Option<RectDrag>,
}

impl EditableRect {
    pub fn new(annotation: &Annotation) -> Self {
        let rect = annotation.target().bounding_box();
        let a = Point::new(rect.x, rect.y);
        let b = Point::new(rect.x + rect.width, rect.y + rect.height);

        let mut node = ElementNode::new(Geometry::Rect(rect));
        node.set_annotation_id(Some(annotation.id().clone()));
        node.set_interactive(true);

        Self {
            element: shared(node),
            a,
            b,
            handle_scale: 1.0,
            drag: None,
        }
    }

    fn rect(&self) -> Rect {
        Rect::new(self.a.x, self.a.y, self.b.x - self.a.x, self.b.y - self.a.y).normalized()
    }

    fn handles(&self) -> [Point; 4] {
        [
            Point::new(self.a.x, self.a.y),
            Point::new(self.b.x, self.a.y),
            Point::new(self.b.x, self.b.y),
            Point::new(self.a.x, self.b.y),
        ]
    }

    fn handle_radius(&self) -> f64 {
        HANDLE_BASE_RADIUS * self.handle_scale
    }

    fn handle_at(&self, point: Point) -> Option<usize> {
        let radius = self.handle_radius();
        self.handles()
            .iter()
            .position(|h| h.distance_to(&point) <= radius)
    }

    fn sync_element(&self) {
        self.element
            .borrow_mut()
            .set_geometry(Geometry::Rect(self.rect()));
    }
}

impl EditableShape for EditableRect {
    fn element(&self) -> Element {
        self.element.clone()
    }

    fn current_target(&self) -> Geometry {
        Geometry::Rect(self.rect())
    }

    fn set_handle_scale(&mut self, scale: f64) {
        self.handle_scale = scale;
        self.element.borrow_mut().set_handle_scale(scale);
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.handle_at(point).is_some() || self.rect().contains(&point, tolerance)
    }

    fn pointer_down(&mut self, point: Point) -> bool {
        if let Some(index) = self.handle_at(point) {
            self.drag = Some(RectDrag::Handle { index });
            true
        } else if self.rect().contains(&point, 0.0) {
            self.drag = Some(RectDrag::Move { last: point });
            true
        } else {
            false
        }
    }

    fn pointer_drag(&mut self, point: Point) -> Option<Geometry> {
        match self.drag.as_mut()? {
            RectDrag::Move { last } => {
                let dx = point.x - last.x;
                let dy = point.y - last.y;
                *last = point;
                self.a.x += dx;
                self.a.y += dy;
                self.b.x += dx;
                self.b.y += dy;
            }
            RectDrag::Handle { index } => match index {
                0 => {
                    self.a = point;
                }
                1 => {
                    self.b.x = point.x;
                    self.a.y = point.y;
                }
                2 => {
                    self.b = point;
                }
                _ => {
                    self.a.x = point.x;
                    self.b.y = point.y;
                }
            },
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
