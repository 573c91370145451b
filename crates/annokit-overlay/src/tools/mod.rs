//! The drawing-tool subsystem.
//!
//! Tools know how to sketch and edit one geometry kind. The overlay's state
//! machine never branches on geometry types; it looks the responsible tool up
//! in the [`ToolRegistry`], so supporting a new kind is a registration, not a
//! code change.

mod freehand;
mod rect;

pub use freehand::{EditablePolygon, FreehandTool};
pub use rect::{EditableRect, RectangleTool};

use std::collections::HashMap;

use annokit_core::error::ToolError;
use annokit_core::geometry::{Geometry, GeometryKind, Point};

use crate::annotation::Annotation;
use crate::element::Element;
use crate::input::PointerEvent;
use crate::viewport::Viewport;

/// The result of a completed drawing session.
#[derive(Debug, Clone)]
pub struct FinishedShape {
    /// The draft annotation carrying the sketched geometry.
    pub annotation: Annotation,
    /// The element the session rendered into the overlay group.
    pub element: Element,
}

/// An interactive, handle-bearing shape for in-place geometry editing.
///
/// Owned by the selection machine while a mutable annotation is selected.
/// Dragging reports geometry fragments which the overlay forwards to
/// listeners as `UpdateTarget` events.
pub trait EditableShape {
    /// The interactive element rendered for this shape.
    fn element(&self) -> Element;

    /// The current (possibly edited) geometry.
    fn current_target(&self) -> Geometry;

    /// Re-scales manipulation handles; `scale` is the reciprocal of the
    /// overlay scale so handles stay constant in screen pixels.
    fn set_handle_scale(&mut self, scale: f64);

    /// Whether the point lies on the shape's interactive region (body or
    /// handles), in image pixels.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Begins a drag. Returns true if a handle or the body was grabbed.
    fn pointer_down(&mut self, point: Point) -> bool;

    /// Advances a drag; returns the updated geometry fragment when the
    /// target changed.
    fn pointer_drag(&mut self, point: Point) -> Option<Geometry>;

    /// Ends a drag; returns the final geometry fragment of the gesture.
    fn pointer_up(&mut self, point: Point) -> Option<Geometry>;

    /// Whether a drag gesture is in progress.
    fn is_dragging(&self) -> bool;
}

/// A drawing tool for one geometry kind.
pub trait DrawingTool {
    /// The geometry kind this tool produces and edits.
    fn kind(&self) -> GeometryKind;

    /// Converts window/client coordinates into overlay-local (image pixel)
    /// coordinates.
    fn to_local(&self, viewport: &dyn Viewport, window_point: Point) -> Point {
        viewport.viewport_to_image(viewport.window_to_viewport(window_point))
    }

    /// Starts a drawing session at the given overlay-local point.
    fn start(&mut self, origin: Point, event: &PointerEvent);

    /// Advances the in-progress session.
    fn on_move(&mut self, point: Point, event: &PointerEvent);

    /// Finalizes the session. `None` means the gesture was too small to
    /// yield a shape; the session ends either way.
    fn on_up(&mut self, point: Point, event: &PointerEvent) -> Option<FinishedShape>;

    /// Whether a drawing session is in progress.
    fn is_drawing(&self) -> bool;

    /// The in-progress session's element, if any.
    fn element(&self) -> Option<Element>;

    /// Terminates the session without producing a shape.
    fn stop(&mut self);

    /// Builds an editable shape for an existing annotation of this kind.
    fn create_editable_shape(&self, annotation: &Annotation) -> Box<dyn EditableShape>;
}

/// Registry mapping geometry kinds to their drawing tools.
pub struct ToolRegistry {
    tools: HashMap<GeometryKind, Box<dyn DrawingTool>>,
    /// Registration order, for stable kind listings.
    order: Vec<GeometryKind>,
    active: Option<GeometryKind>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
            active: None,
        }
    }

    /// Creates a registry with the built-in tools; the rectangle tool starts
    /// active.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(RectangleTool::new()));
        registry.register(Box::new(FreehandTool::new()));
        registry.active = Some(GeometryKind::Rect);
        registry
    }

    /// Registers a tool, replacing any previous tool for the same kind. The
    /// first registered tool becomes active.
    pub fn register(&mut self, tool: Box<dyn DrawingTool>) {
        let kind = tool.kind();
        if self.tools.insert(kind, tool).is_none() {
            self.order.push(kind);
        }
        if self.active.is_none() {
            self.active = Some(kind);
        }
        tracing::debug!(%kind, "drawing tool registered");
    }

    /// Registered kinds, in registration order.
    pub fn kinds(&self) -> Vec<GeometryKind> {
        self.order.clone()
    }

    /// The active kind, if any tool is registered.
    pub fn active(&self) -> Option<GeometryKind> {
        self.active
    }

    /// Activates the tool for a kind.
    pub fn set_active(&mut self, kind: GeometryKind) -> Result<(), ToolError> {
        if self.tools.contains_key(&kind) {
            self.active = Some(kind);
            Ok(())
        } else {
            Err(ToolError::UnknownKind {
                kind: kind.to_string(),
            })
        }
    }

    /// The tool responsible for a geometry kind.
    pub fn tool_for(&self, kind: GeometryKind) -> Option<&dyn DrawingTool> {
        self.tools.get(&kind).map(|t| t.as_ref())
    }

    /// The active tool.
    pub fn active_tool(&self) -> Option<&dyn DrawingTool> {
        self.active.and_then(|kind| self.tool_for(kind))
    }

    /// The active tool, mutably.
    pub fn active_tool_mut(&mut self) -> Option<&mut (dyn DrawingTool + 'static)> {
        match self.active {
            Some(kind) => self.tools.get_mut(&kind).map(|t| t.as_mut()),
            None => None,
        }
    }

    /// Stops the active tool's session, if one is in progress.
    pub fn stop_active(&mut self) {
        if let Some(tool) = self.active_tool_mut() {
            if tool.is_drawing() {
                tool.stop();
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("kinds", &self.order)
            .field("active", &self.active)
            .finish()
    }
}
