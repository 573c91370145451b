//! The shape registry: static shapes rendered inside the overlay group.
//!
//! Each shape is bound 1:1 to an annotation. The registry owns its shapes
//! exclusively while they are not selected; the selection machine takes a
//! shape over (removing it here) for the duration of an editable selection.
//!
//! Identifier lookups that find nothing are silent no-ops throughout.

use annokit_core::geometry::Point;
use annokit_core::types::Shared;

use crate::annotation::{Annotation, AnnotationId, AnnotationRef};
use crate::element::{draw_static_element, Element, OverlayGroup};
use crate::format::{apply_formatter, Formatter};
use crate::input::PointerTracker;

/// A static (non-interactive) shape with its click-to-select tracker.
#[derive(Debug)]
pub struct StaticShape {
    annotation: Annotation,
    element: Element,
    tracker: PointerTracker,
}

impl StaticShape {
    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    pub fn element(&self) -> Element {
        self.element.clone()
    }

    /// Whether the click-to-select tracker accepts input.
    pub fn accepts_clicks(&self) -> bool {
        self.tracker.is_armed()
    }

    /// Bounding-box area of the shape's geometry, the redraw sort key.
    fn area(&self) -> f64 {
        self.annotation.target().area()
    }
}

/// The set of rendered static shapes inside the overlay group.
#[derive(Debug)]
pub struct ShapeRegistry {
    group: Shared<OverlayGroup>,
    shapes: Vec<StaticShape>,
}

impl ShapeRegistry {
    pub fn new(group: Shared<OverlayGroup>) -> Self {
        Self {
            group,
            shapes: Vec::new(),
        }
    }

    /// Draws a shape for the annotation and inserts it into the overlay
    /// group, on top of the existing shapes.
    pub fn add(&mut self, annotation: Annotation, formatter: Option<&Formatter>) -> Element {
        let element = draw_static_element(&annotation);
        apply_formatter(&element, &annotation, formatter);
        self.group.borrow_mut().append(element.clone());

        tracing::debug!(id = %annotation.id(), "shape added");
        self.shapes.push(StaticShape {
            annotation,
            element: element.clone(),
            tracker: PointerTracker::armed("static-shape"),
        });
        element
    }

    /// Removes the shape for an annotation. The tracker is destroyed before
    /// the element detaches, so no input handler can dangle. Unknown
    /// identifiers are a no-op.
    ///
    /// Callers must deselect first if the target is currently selected;
    /// a selection never outlives its backing shape.
    pub fn remove(&mut self, key: impl AnnotationRef) -> Option<Annotation> {
        let id = key.id_ref();
        let index = self.shapes.iter().position(|s| s.annotation.id() == id)?;
        let mut shape = self.shapes.remove(index);

        shape.tracker.destroy();
        self.group.borrow_mut().remove(&shape.element);

        tracing::debug!(id = %shape.annotation.id(), "shape removed");
        Some(shape.annotation)
    }

    /// Exact lookup by identifier (or annotation-like value exposing one).
    pub fn find(&self, key: impl AnnotationRef) -> Option<&StaticShape> {
        let id = key.id_ref();
        self.shapes.iter().find(|s| s.annotation.id() == id)
    }

    pub fn contains(&self, key: impl AnnotationRef) -> bool {
        self.find(key).is_some()
    }

    /// Re-renders all shapes in area-descending order, so small annotations
    /// stay clickable on top of larger ones. Idempotent: the resulting order
    /// depends only on the shape set.
    pub fn redraw(&mut self) {
        self.shapes.sort_by(|a, b| {
            b.area()
                .partial_cmp(&a.area())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let ordered: Vec<Element> = self.shapes.iter().map(|s| s.element.clone()).collect();
        self.group.borrow_mut().restack(&ordered);
        tracing::trace!(shapes = self.shapes.len(), "shapes restacked by area");
    }

    /// Replaces the shape for `previous` (or for the annotation's own
    /// identity when no previous identity is given) with a freshly drawn
    /// shape, then restores area ordering.
    ///
    /// Both removals are remove-if-present, so replacing an identity with
    /// itself is safe.
    pub fn replace(
        &mut self,
        annotation: Annotation,
        previous: Option<&AnnotationId>,
        formatter: Option<&Formatter>,
    ) -> Element {
        if let Some(previous) = previous {
            self.remove(previous);
        }
        self.remove(annotation.id());
        let element = self.add(annotation, formatter);
        self.redraw();
        element
    }

    /// Clears all shapes and adds each annotation in the given order. No
    /// redraw is implied.
    pub fn init(&mut self, annotations: Vec<Annotation>, formatter: Option<&Formatter>) {
        self.clear();
        for annotation in annotations {
            self.add(annotation, formatter);
        }
    }

    /// Removes every shape, destroying trackers first.
    pub fn clear(&mut self) {
        for shape in self.shapes.iter_mut() {
            shape.tracker.destroy();
        }
        let mut group = self.group.borrow_mut();
        for shape in self.shapes.drain(..) {
            group.remove(&shape.element);
        }
    }

    /// The annotations behind all registered shapes, in draw order.
    pub fn annotations(&self) -> Vec<Annotation> {
        self.shapes.iter().map(|s| s.annotation.clone()).collect()
    }

    pub fn shapes(&self) -> &[StaticShape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// The topmost shape whose geometry contains the point, if any.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> Option<&StaticShape> {
        // Later shapes draw on top; walk them first
        self.shapes
            .iter()
            .rev()
            .filter(|s| s.accepts_clicks())
            .find(|s| s.annotation.target().contains_point(&point, tolerance))
    }

    /// Forces a new identifier onto an existing shape. Updates the identity
    /// tag on the element and returns the cloned annotation; geometry is
    /// untouched. Unknown identifiers are a no-op.
    pub fn override_id(
        &mut self,
        original: &AnnotationId,
        forced: AnnotationId,
    ) -> Option<Annotation> {
        let shape = self
            .shapes
            .iter_mut()
            .find(|s| s.annotation.id() == original)?;

        let renamed = shape.annotation.with_id(forced.clone());
        shape.annotation = renamed.clone();
        shape.element.borrow_mut().set_annotation_id(Some(forced));
        Some(renamed)
    }
}
