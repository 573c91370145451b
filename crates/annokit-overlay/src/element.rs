//! Rendered elements and the overlay root group.
//!
//! Rasterization is an external concern; the overlay keeps a retained scene
//! of [`Element`] nodes inside one [`OverlayGroup`] whose transform is synced
//! to the viewport. Renderers walk the group's children in order (later
//! children draw on top).

use annokit_core::geometry::Geometry;
use annokit_core::types::{shared, Shared};
use std::rc::Rc;

use crate::annotation::{Annotation, AnnotationId};
use crate::transform::OverlayTransform;

/// Visual attributes attached to an element. `None` fields defer to the
/// renderer's defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub stroke: Option<String>,
    pub fill: Option<String>,
    pub stroke_width: Option<f64>,
    pub opacity: Option<f64>,
}

/// A single node in the overlay scene.
#[derive(Debug, Clone)]
pub struct ElementNode {
    /// Identity tag linking back to the annotation. A lookup link, not an
    /// ownership edge: dropping the element never drops the annotation.
    annotation_id: Option<AnnotationId>,
    geometry: Geometry,
    style: Style,
    /// Editable elements expose manipulation handles.
    interactive: bool,
    /// Reciprocal-of-zoom factor applied to handle sizes so they stay
    /// constant in screen pixels.
    handle_scale: f64,
}

impl ElementNode {
    /// Creates a non-interactive node for the given geometry.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            annotation_id: None,
            geometry,
            style: Style::default(),
            interactive: false,
            handle_scale: 1.0,
        }
    }

    pub fn annotation_id(&self) -> Option<&AnnotationId> {
        self.annotation_id.as_ref()
    }

    pub fn set_annotation_id(&mut self, id: Option<AnnotationId>) {
        self.annotation_id = id;
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn handle_scale(&self) -> f64 {
        self.handle_scale
    }

    pub fn set_handle_scale(&mut self, scale: f64) {
        self.handle_scale = scale;
    }
}

/// Shared handle to an element node.
pub type Element = Shared<ElementNode>;

/// Draws a static (non-interactive) element for an annotation, tagged with
/// the annotation's identifier.
pub fn draw_static_element(annotation: &Annotation) -> Element {
    let mut node = ElementNode::new(annotation.target().clone());
    node.set_annotation_id(Some(annotation.id().clone()));
    shared(node)
}

/// The root vector group whose transform tracks the viewport.
#[derive(Debug)]
pub struct OverlayGroup {
    transform: OverlayTransform,
    children: Vec<Element>,
    visible: bool,
}

impl OverlayGroup {
    pub fn new() -> Self {
        Self {
            transform: OverlayTransform::identity(),
            children: Vec::new(),
            visible: true,
        }
    }

    pub fn transform(&self) -> OverlayTransform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: OverlayTransform) {
        self.transform = transform;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Children in draw order (later entries on top).
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Appends an element on top of the current children.
    pub fn append(&mut self, element: Element) {
        self.children.push(element);
    }

    /// Detaches an element. Unknown elements are a no-op.
    pub fn remove(&mut self, element: &Element) {
        self.children.retain(|c| !Rc::ptr_eq(c, element));
    }

    /// Removes every child.
    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Re-stacks the given elements, in order, underneath any children not in
    /// the list (so an editable selection stays on top of static shapes).
    pub fn restack(&mut self, ordered: &[Element]) {
        let mut rest: Vec<Element> = Vec::new();
        for child in self.children.drain(..) {
            if !ordered.iter().any(|e| Rc::ptr_eq(e, &child)) {
                rest.push(child);
            }
        }
        self.children.extend(ordered.iter().cloned());
        self.children.extend(rest);
    }
}

impl Default for OverlayGroup {
    fn default() -> Self {
        Self::new()
    }
}
