//! Overlay event definitions.
//!
//! Events are distributed over a per-overlay [`EventBus`]; they carry live
//! [`Element`] handles for consumers such as floating toolbars, so unlike
//! plain data events they are loggable via `description()` but not
//! serialized.

use annokit_core::event_bus::{BusEvent, EventBus};
use annokit_core::geometry::Geometry;

use crate::annotation::Annotation;
use crate::element::Element;
use crate::input::PointerEvent;

/// Event bus type used by the overlay.
pub type OverlayBus = EventBus<OverlayEvent>;

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayEventCategory {
    /// Selection lifecycle and motion events.
    Selection,
    /// New-annotation drawing events.
    Drawing,
    /// In-place editing events.
    Editing,
    /// Hover transitions on non-drawing shapes.
    Hover,
}

impl std::fmt::Display for OverlayEventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverlayEventCategory::Selection => write!(f, "Selection"),
            OverlayEventCategory::Drawing => write!(f, "Drawing"),
            OverlayEventCategory::Editing => write!(f, "Editing"),
            OverlayEventCategory::Hover => write!(f, "Hover"),
        }
    }
}

/// Events the overlay emits to external consumers.
#[derive(Debug, Clone)]
pub enum OverlayEvent {
    /// A new in-progress annotation was drawn.
    CreateSelection {
        /// The freshly drawn draft annotation.
        annotation: Annotation,
    },
    /// A shape became selected.
    Select {
        /// The selected annotation.
        annotation: Annotation,
        /// The selected shape's renderable element.
        element: Element,
    },
    /// An editable shape's geometry changed.
    UpdateTarget {
        /// The editable shape's element.
        element: Element,
        /// The in-progress geometry fragment.
        fragment: Geometry,
    },
    /// The selected shape's screen position changed due to viewport motion.
    MoveSelection {
        /// The selected shape's renderable element.
        element: Element,
    },
    /// The pointer entered a non-drawing shape.
    MouseEnterAnnotation {
        /// The hovered annotation.
        annotation: Annotation,
        /// The raw pointer event.
        event: PointerEvent,
    },
    /// The pointer left a non-drawing shape.
    MouseLeaveAnnotation {
        /// The formerly hovered annotation.
        annotation: Annotation,
        /// The raw pointer event.
        event: PointerEvent,
    },
}

impl BusEvent for OverlayEvent {
    type Category = OverlayEventCategory;

    fn category(&self) -> OverlayEventCategory {
        match self {
            OverlayEvent::CreateSelection { .. } => OverlayEventCategory::Drawing,
            OverlayEvent::Select { .. } => OverlayEventCategory::Selection,
            OverlayEvent::UpdateTarget { .. } => OverlayEventCategory::Editing,
            OverlayEvent::MoveSelection { .. } => OverlayEventCategory::Selection,
            OverlayEvent::MouseEnterAnnotation { .. } => OverlayEventCategory::Hover,
            OverlayEvent::MouseLeaveAnnotation { .. } => OverlayEventCategory::Hover,
        }
    }

    fn description(&self) -> String {
        match self {
            OverlayEvent::CreateSelection { annotation } => {
                format!("Created selection {}", annotation.id())
            }
            OverlayEvent::Select { annotation, .. } => {
                format!("Selected {}", annotation.id())
            }
            OverlayEvent::UpdateTarget { fragment, .. } => {
                format!("Target updated ({:?} kind)", fragment.kind())
            }
            OverlayEvent::MoveSelection { .. } => "Selection moved".to_string(),
            OverlayEvent::MouseEnterAnnotation { annotation, .. } => {
                format!("Pointer entered {}", annotation.id())
            }
            OverlayEvent::MouseLeaveAnnotation { annotation, .. } => {
                format!("Pointer left {}", annotation.id())
            }
        }
    }
}
