//! The selection/editing state machine.
//!
//! At most one shape is selected at any time. Selecting a mutable annotation
//! swaps its static shape for an editable one from the tool registry;
//! deselecting reverses the swap. A deselect performed as a side effect of
//! another operation always completes — including destroying the previous
//! pointer tracker — before the triggering operation continues.

use std::rc::Rc;

use annokit_core::geometry::Point;
use annokit_core::types::Shared;

use crate::annotation::{Annotation, AnnotationId};
use crate::element::{Element, OverlayGroup};
use crate::events::{OverlayBus, OverlayEvent};
use crate::format::Formatter;
use crate::input::PointerTracker;
use crate::registry::ShapeRegistry;
use crate::tools::{EditableShape, ToolRegistry};

/// Options for a select transition.
#[derive(Debug, Clone, Copy)]
pub struct SelectOptions {
    /// Layer-wide read-only mode forces static selection.
    pub read_only: bool,
    /// Headless mode forces static selection.
    pub headless: bool,
    /// Current overlay scale, for handle sizing.
    pub scale: f64,
    /// Suppress the `Select` notification.
    pub silent: bool,
}

enum SelectionState {
    Idle,
    /// Read-only or headless selection: the shape is left as-is.
    Static {
        annotation: Annotation,
        element: Element,
    },
    /// The static shape was replaced by an editable one.
    Editing {
        annotation: Annotation,
        shape: Box<dyn EditableShape>,
        tracker: PointerTracker,
    },
}

/// Owns the current selection and drives its transitions.
pub struct SelectionController {
    state: SelectionState,
    group: Shared<OverlayGroup>,
    events: Rc<OverlayBus>,
}

impl SelectionController {
    pub fn new(group: Shared<OverlayGroup>, events: Rc<OverlayBus>) -> Self {
        Self {
            state: SelectionState::Idle,
            group,
            events,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, SelectionState::Idle)
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, SelectionState::Editing { .. })
    }

    /// The selected annotation, if any.
    pub fn annotation(&self) -> Option<&Annotation> {
        match &self.state {
            SelectionState::Idle => None,
            SelectionState::Static { annotation, .. }
            | SelectionState::Editing { annotation, .. } => Some(annotation),
        }
    }

    /// The selected shape's renderable element: the editable shape's
    /// interactive element, or the static element otherwise.
    pub fn element(&self) -> Option<Element> {
        match &self.state {
            SelectionState::Idle => None,
            SelectionState::Static { element, .. } => Some(element.clone()),
            SelectionState::Editing { shape, .. } => Some(shape.element()),
        }
    }

    /// The current selection as (annotation, element).
    pub fn selected(&self) -> Option<(Annotation, Element)> {
        Some((self.annotation()?.clone(), self.element()?))
    }

    /// Selects a shape.
    ///
    /// No-op when the annotation already equals the current selection. A
    /// different prior selection is deselected first, synchronously.
    /// `element` is the shape's current element: the registry's element for
    /// registered annotations, or the freshly drawn element for a draft.
    #[allow(clippy::too_many_arguments)]
    pub fn select(
        &mut self,
        annotation: Annotation,
        element: Element,
        registry: &mut ShapeRegistry,
        tools: &mut ToolRegistry,
        formatter: Option<&Formatter>,
        options: SelectOptions,
    ) {
        if self.annotation().map(Annotation::id) == Some(annotation.id()) {
            return;
        }
        if !self.is_idle() {
            // Selection is never additive
            self.deselect(registry, tools, formatter, false);
        }

        let editable_allowed =
            !(options.read_only || options.headless || annotation.is_read_only());
        let tool = if editable_allowed {
            tools.tool_for(annotation.target().kind())
        } else {
            None
        };

        match tool {
            None => {
                tracing::debug!(id = %annotation.id(), "selected (static)");
                self.state = SelectionState::Static {
                    annotation: annotation.clone(),
                    element: element.clone(),
                };
                if !options.silent {
                    self.events
                        .publish(OverlayEvent::Select { annotation, element });
                }
            }
            Some(tool) => {
                // The static shape leaves the registry for the duration of
                // the selection; a draft's rubber-band element leaves the
                // group directly.
                if registry.contains(annotation.id()) {
                    registry.remove(annotation.id());
                } else {
                    self.group.borrow_mut().remove(&element);
                }

                let mut shape = tool.create_editable_shape(&annotation);
                shape.set_handle_scale(1.0 / options.scale.max(f64::EPSILON));

                let interactive = shape.element();
                self.group.borrow_mut().append(interactive.clone());

                tracing::debug!(id = %annotation.id(), "selected (editable)");
                self.state = SelectionState::Editing {
                    annotation: annotation.clone(),
                    shape,
                    tracker: PointerTracker::new("editable-shape"),
                };
                if !options.silent {
                    self.events.publish(OverlayEvent::Select {
                        annotation,
                        element: interactive,
                    });
                }
            }
        }
    }

    /// Deselects the current shape, if any.
    ///
    /// A draft annotation is discarded (the active drawing tool is stopped);
    /// a committed annotation is re-added to the registry as a fresh static
    /// shape, followed by a redraw unless skipped.
    pub fn deselect(
        &mut self,
        registry: &mut ShapeRegistry,
        tools: &mut ToolRegistry,
        formatter: Option<&Formatter>,
        skip_redraw: bool,
    ) {
        match std::mem::replace(&mut self.state, SelectionState::Idle) {
            SelectionState::Idle => {}
            SelectionState::Static {
                annotation,
                element,
            } => match annotation {
                Annotation::Draft(_) => {
                    tracing::debug!(id = %annotation.id(), "draft selection discarded");
                    self.group.borrow_mut().remove(&element);
                    tools.stop_active();
                }
                Annotation::Committed(_) => {
                    tracing::debug!(id = %annotation.id(), "deselected (static)");
                }
            },
            SelectionState::Editing {
                annotation,
                shape,
                mut tracker,
            } => {
                // Tracker first, then the shape itself
                tracker.destroy();
                let element = shape.element();
                self.group.borrow_mut().remove(&element);
                drop(shape);

                match annotation {
                    Annotation::Draft(_) => {
                        tracing::debug!(id = %annotation.id(), "draft selection discarded");
                        tools.stop_active();
                    }
                    committed @ Annotation::Committed(_) => {
                        tracing::debug!(id = %committed.id(), "deselected, shape re-added");
                        registry.add(committed, formatter);
                        if !skip_redraw {
                            registry.redraw();
                        }
                    }
                }
            }
        }
    }

    /// Re-scales the editable shape's handles by the reciprocal of the
    /// overlay scale; a side effect of every transform recompute.
    pub fn rescale_handles(&mut self, scale: f64) {
        if let SelectionState::Editing { shape, .. } = &mut self.state {
            shape.set_handle_scale(1.0 / scale.max(f64::EPSILON));
        }
    }

    /// Notifies listeners that the selected shape's screen position changed.
    pub fn publish_move(&self) {
        if let Some(element) = self.element() {
            self.events.publish(OverlayEvent::MoveSelection { element });
        }
    }

    /// Hover transition over the editable shape: the dedicated tracker is
    /// armed only while the pointer is over the interactive region, so
    /// viewport navigation resumes the instant the pointer leaves it.
    /// Returns whether the tracker is armed.
    pub fn pointer_over(&mut self, point: Point, tolerance: f64) -> bool {
        if let SelectionState::Editing { shape, tracker, .. } = &mut self.state {
            if !shape.is_dragging() {
                if shape.hit_test(point, tolerance) {
                    tracker.arm();
                } else {
                    tracker.disarm();
                }
            }
            tracker.is_armed()
        } else {
            false
        }
    }

    /// Forwards a press to the editable shape when its tracker is armed.
    /// Returns whether the event was consumed.
    pub fn pointer_down(&mut self, point: Point) -> bool {
        if let SelectionState::Editing { shape, tracker, .. } = &mut self.state {
            if tracker.is_armed() {
                return shape.pointer_down(point);
            }
        }
        false
    }

    /// Forwards a drag to the editable shape, publishing the geometry
    /// fragment to listeners. Returns whether the event was consumed.
    pub fn pointer_drag(&mut self, point: Point) -> bool {
        if let SelectionState::Editing { shape, .. } = &mut self.state {
            if shape.is_dragging() {
                if let Some(fragment) = shape.pointer_drag(point) {
                    self.events.publish(OverlayEvent::UpdateTarget {
                        element: shape.element(),
                        fragment,
                    });
                }
                return true;
            }
        }
        false
    }

    /// Ends an editing drag, publishing the final fragment. Returns whether
    /// the event was consumed.
    pub fn pointer_up(&mut self, point: Point) -> bool {
        if let SelectionState::Editing { shape, .. } = &mut self.state {
            if shape.is_dragging() {
                if let Some(fragment) = shape.pointer_up(point) {
                    self.events.publish(OverlayEvent::UpdateTarget {
                        element: shape.element(),
                        fragment,
                    });
                }
                return true;
            }
        }
        false
    }

    /// Whether an editing drag gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        match &self.state {
            SelectionState::Editing { shape, .. } => shape.is_dragging(),
            _ => false,
        }
    }

    /// Forces a new identifier onto the selected shape, if it matches
    /// `original`. Geometry is untouched.
    pub fn override_id(
        &mut self,
        original: &AnnotationId,
        forced: AnnotationId,
    ) -> Option<Annotation> {
        match &mut self.state {
            SelectionState::Idle => None,
            SelectionState::Static {
                annotation,
                element,
            } => {
                if annotation.id() != original {
                    return None;
                }
                *annotation = annotation.with_id(forced.clone());
                element.borrow_mut().set_annotation_id(Some(forced));
                Some(annotation.clone())
            }
            SelectionState::Editing {
                annotation, shape, ..
            } => {
                if annotation.id() != original {
                    return None;
                }
                *annotation = annotation.with_id(forced.clone());
                shape.element().borrow_mut().set_annotation_id(Some(forced));
                Some(annotation.clone())
            }
        }
    }
}

impl std::fmt::Debug for SelectionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            SelectionState::Idle => "Idle".to_string(),
            SelectionState::Static { annotation, .. } => {
                format!("Static({})", annotation.id())
            }
            SelectionState::Editing { annotation, .. } => {
                format!("Editing({})", annotation.id())
            }
        };
        f.debug_struct("SelectionController")
            .field("state", &state)
            .finish()
    }
}
