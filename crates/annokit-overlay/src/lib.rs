//! # annokit Overlay
//!
//! An interactive annotation overlay that stays visually registered with a
//! pannable/zoomable/rotatable image viewport while letting a user select,
//! create, and edit geometric annotations drawn on top of the image.
//!
//! ## Core Components
//!
//! - **Transform Sync**: derives the overlay group's affine transform from
//!   viewport state on every relevant event
//! - **Shape Registry**: the rendered shapes, bound 1:1 to annotations, with
//!   area-sorted draw order
//! - **Selection Machine**: swaps a static shape for an editable one and
//!   back, owning at most one selection at a time
//! - **Drawing Controller**: arbitrates pointer input between sketching a
//!   new annotation and viewport navigation
//!
//! ## Architecture
//!
//! ```text
//! ImageOverlay (facade)
//!   ├── OverlayGroup (root vector group, synced transform)
//!   ├── ShapeRegistry (static shapes + click trackers)
//!   ├── SelectionController (Idle / Static / Editing)
//!   ├── DrawingController (modifier-armed primary tracker)
//!   └── ToolRegistry (geometry kind -> DrawingTool)
//!
//! Collaborators (host-provided)
//!   ├── Viewport (pan/zoom/rotate/flip + conversions)
//!   ├── KeyboardState (injected modifier-key provider)
//!   ├── Formatter (pure shape decoration)
//!   └── SnippetSource (image pixels)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use annokit_overlay::{ImageOverlay, OverlayConfig};
//!
//! let mut overlay = ImageOverlay::new(viewport, keyboard, OverlayConfig::default());
//! overlay.add_annotation(annotation);
//! overlay.select_annotation_by_id(&id);
//! ```

pub mod annotation;
pub mod drawing;
pub mod element;
pub mod events;
pub mod format;
pub mod input;
pub mod overlay;
pub mod registry;
pub mod selection;
pub mod snippet;
pub mod tools;
pub mod transform;
pub mod viewport;

// Re-export all public types from submodules
pub use annotation::{Annotation, AnnotationBody, AnnotationId, AnnotationRef};
pub use drawing::DrawingController;
pub use element::{draw_static_element, Element, ElementNode, OverlayGroup, Style};
pub use events::{OverlayBus, OverlayEvent, OverlayEventCategory};
pub use format::{apply_formatter, Formatter};
pub use input::{Key, KeyboardState, MemoryKeyState, PointerButton, PointerEvent, PointerTracker};
pub use overlay::{ImageOverlay, OverlayConfig};
pub use registry::{ShapeRegistry, StaticShape};
pub use selection::{SelectOptions, SelectionController};
pub use snippet::{ImagePixels, SnippetSource};
pub use tools::{
    DrawingTool, EditablePolygon, EditableRect, EditableShape, FinishedShape, FreehandTool,
    RectangleTool, ToolRegistry,
};
pub use transform::{derive_transform, OverlayTransform};
pub use viewport::{PlanarViewport, Viewport, ViewportEvent};
