//! The overlay facade.
//!
//! `ImageOverlay` wires the transform sync, shape registry, selection machine
//! and drawing controller together and exposes the public operations. The
//! host forwards viewport, pointer and keyboard events here; pointer handlers
//! return whether the overlay consumed the event, so unconsumed input falls
//! through to viewport navigation.

use std::rc::Rc;

use annokit_core::error::{Result, SnippetError};
use annokit_core::event_bus::{EventFilter, SubscriptionId};
use annokit_core::geometry::{GeometryKind, Point};
use annokit_core::types::{shared, Shared};
use image::RgbaImage;

use crate::annotation::{Annotation, AnnotationId, AnnotationRef};
use crate::drawing::DrawingController;
use crate::element::{Element, OverlayGroup};
use crate::events::{OverlayBus, OverlayEvent, OverlayEventCategory};
use crate::format::Formatter;
use crate::input::{Key, KeyboardState, PointerEvent};
use crate::registry::ShapeRegistry;
use crate::selection::{SelectOptions, SelectionController};
use crate::snippet::SnippetSource;
use crate::tools::{FinishedShape, ToolRegistry};
use crate::transform::{derive_transform, OverlayTransform};
use crate::viewport::{Viewport, ViewportEvent};

/// Overlay configuration.
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    /// Layer-wide read-only mode: selections stay static, drawing never arms.
    pub read_only: bool,
    /// Headless mode: selections stay static (no editor shapes).
    pub headless: bool,
    /// The modifier key that arms the drawing tracker.
    pub drawing_modifier: Key,
    /// Hit-test tolerance in screen pixels.
    pub hit_tolerance: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            read_only: false,
            headless: false,
            drawing_modifier: Key::Shift,
            hit_tolerance: annokit_core::constants::DEFAULT_HIT_TOLERANCE,
        }
    }
}

/// An annotation overlay bound to one viewport.
pub struct ImageOverlay {
    viewport: Shared<dyn Viewport>,
    keyboard: Rc<dyn KeyboardState>,
    events: Rc<OverlayBus>,
    group: Shared<OverlayGroup>,
    registry: ShapeRegistry,
    selection: SelectionController,
    drawing: DrawingController,
    tools: ToolRegistry,
    config: OverlayConfig,
    formatter: Option<Formatter>,
    pixel_source: Option<Box<dyn SnippetSource>>,
    hovered: Option<AnnotationId>,
}

impl ImageOverlay {
    /// Creates an overlay over the given viewport with the built-in tools.
    pub fn new(
        viewport: Shared<dyn Viewport>,
        keyboard: Rc<dyn KeyboardState>,
        config: OverlayConfig,
    ) -> Self {
        let events = Rc::new(OverlayBus::new());
        let group = shared(OverlayGroup::new());
        let registry = ShapeRegistry::new(group.clone());
        let selection = SelectionController::new(group.clone(), events.clone());
        let drawing = DrawingController::new(config.drawing_modifier);

        let mut overlay = Self {
            viewport,
            keyboard,
            events,
            group,
            registry,
            selection,
            drawing,
            tools: ToolRegistry::with_defaults(),
            config,
            formatter: None,
            pixel_source: None,
            hovered: None,
        };
        overlay.on_viewport_change(ViewportEvent::Open);
        overlay
    }

    /// Replaces the tool registry (e.g. to register custom geometry kinds).
    pub fn set_tool_registry(&mut self, tools: ToolRegistry) {
        self.tools = tools;
    }

    /// Sets the formatting collaborator applied to (re)drawn shapes.
    pub fn set_formatter(&mut self, formatter: Option<Formatter>) {
        self.formatter = formatter;
    }

    /// Attaches the pixel source backing snippet extraction.
    pub fn set_pixel_source(&mut self, source: Option<Box<dyn SnippetSource>>) {
        self.pixel_source = source;
    }

    // ------------------------------------------------------------------
    // Transform sync
    // ------------------------------------------------------------------

    /// Recomputes and applies the overlay transform from viewport state.
    /// Called by the host on every pan/zoom/rotate/flip/resize/open event.
    pub fn on_viewport_change(&mut self, event: ViewportEvent) {
        if !self.viewport.borrow().is_open() {
            return;
        }
        let transform = derive_transform(&*self.viewport.borrow());
        self.group.borrow_mut().set_transform(transform);
        tracing::trace!(?event, "overlay transform synced");

        if !self.selection.is_idle() {
            self.selection.rescale_handles(transform.scale());
            self.selection.publish_move();
        }
    }

    /// The transform currently applied to the overlay group.
    pub fn transform(&self) -> OverlayTransform {
        self.group.borrow().transform()
    }

    /// The current overlay scale factor
    /// (`zoom × container_width / content_factor`).
    pub fn current_scale(&self) -> f64 {
        let viewport = self.viewport.borrow();
        let factor = viewport.content_factor();
        if factor <= 0.0 {
            return 1.0;
        }
        viewport.zoom() * viewport.container_size().width / factor
    }

    // ------------------------------------------------------------------
    // Annotation CRUD
    // ------------------------------------------------------------------

    /// Clears all shapes and adds each annotation in the given order.
    pub fn init(&mut self, annotations: Vec<Annotation>) {
        self.selection
            .deselect(&mut self.registry, &mut self.tools, self.formatter.as_ref(), true);
        self.registry.init(annotations, self.formatter.as_ref());
    }

    /// Adds a shape for the annotation.
    pub fn add_annotation(&mut self, annotation: Annotation) -> Element {
        self.registry.add(annotation, self.formatter.as_ref())
    }

    /// Removes the annotation's shape. Deselects first when the target is
    /// currently selected; unknown identifiers are a no-op.
    pub fn remove_annotation(&mut self, key: impl AnnotationRef) {
        let id = key.id_ref().clone();
        if self.selection.annotation().map(Annotation::id) == Some(&id) {
            self.selection
                .deselect(&mut self.registry, &mut self.tools, self.formatter.as_ref(), true);
        }
        self.registry.remove(&id);
    }

    /// Replaces the annotation under `previous` (or under its own identity)
    /// and restores area ordering. Deselects first when either identity is
    /// currently selected.
    pub fn replace_annotation(
        &mut self,
        annotation: Annotation,
        previous: Option<&AnnotationId>,
    ) -> Element {
        let selected = self.selection.annotation().map(Annotation::id);
        if selected == Some(annotation.id()) || (previous.is_some() && selected == previous) {
            self.selection
                .deselect(&mut self.registry, &mut self.tools, self.formatter.as_ref(), true);
        }
        self.registry
            .replace(annotation, previous, self.formatter.as_ref())
    }

    /// All annotations: the registry's shapes plus a committed annotation
    /// currently held by the selection machine. Drafts are excluded.
    pub fn annotations(&self) -> Vec<Annotation> {
        let mut all = self.registry.annotations();
        if let Some(annotation) = self.selection.annotation() {
            if !annotation.is_draft() && !self.registry.contains(annotation.id()) {
                all.push(annotation.clone());
            }
        }
        all
    }

    /// Re-renders all shapes in area-descending order.
    pub fn redraw(&mut self) {
        self.registry.redraw();
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Selects an annotation programmatically (silently: consumers initiated
    /// the call and already know). Unknown identifiers are a no-op returning
    /// `None`.
    pub fn select_annotation_by_id(
        &mut self,
        key: impl AnnotationRef,
    ) -> Option<(Annotation, Element)> {
        let id = key.id_ref().clone();
        if self.selection.annotation().map(Annotation::id) == Some(&id) {
            return self.selection.selected();
        }
        let (annotation, element) = {
            let shape = self.registry.find(&id)?;
            (shape.annotation().clone(), shape.element())
        };
        let options = self.select_options(true);
        self.selection.select(
            annotation,
            element,
            &mut self.registry,
            &mut self.tools,
            self.formatter.as_ref(),
            options,
        );
        self.selection.selected()
    }

    /// Deselects the current shape, if any.
    pub fn deselect(&mut self) {
        self.selection
            .deselect(&mut self.registry, &mut self.tools, self.formatter.as_ref(), false);
    }

    /// Cancels the current selection; drafts are discarded.
    pub fn cancel_selected(&mut self) {
        self.deselect();
    }

    /// The current selection as (annotation, element).
    pub fn selected(&self) -> Option<(Annotation, Element)> {
        self.selection.selected()
    }

    /// Forces a new identifier onto an existing selected or unselected
    /// shape. Returns the cloned annotation; geometry is untouched.
    pub fn override_annotation_id(
        &mut self,
        original: &AnnotationId,
        forced: impl Into<AnnotationId>,
    ) -> Option<Annotation> {
        let forced = forced.into();
        if let Some(renamed) = self.selection.override_id(original, forced.clone()) {
            return Some(renamed);
        }
        self.registry.override_id(original, forced)
    }

    // ------------------------------------------------------------------
    // Drawing tools
    // ------------------------------------------------------------------

    /// The registered drawing-tool kinds.
    pub fn tool_kinds(&self) -> Vec<GeometryKind> {
        self.tools.kinds()
    }

    /// Activates the drawing tool for a kind.
    pub fn set_tool(&mut self, kind: GeometryKind) -> Result<()> {
        self.tools.set_active(kind)?;
        Ok(())
    }

    /// Enables or disables drawing.
    pub fn set_drawing_enabled(&mut self, enabled: bool) {
        let session_active = self.session_active();
        let selection_active = !self.selection.is_idle();
        self.drawing
            .set_enabled(enabled, self.keyboard.as_ref(), selection_active, session_active);
    }

    /// Whether the drawing tracker currently claims pointer input.
    pub fn is_drawing_armed(&self) -> bool {
        self.drawing.is_armed()
    }

    // ------------------------------------------------------------------
    // Viewport navigation helpers
    // ------------------------------------------------------------------

    /// Fits the viewport to an annotation's bounds. Unknown identifiers are
    /// a no-op.
    pub fn fit_viewport_to(&mut self, key: impl AnnotationRef) {
        if let Some(annotation) = self.annotation_by_id(key.id_ref()) {
            let bounds = annotation.target().bounding_box();
            let viewport_rect = self.viewport.borrow().image_to_viewport_rect(bounds);
            self.viewport.borrow_mut().fit_bounds(viewport_rect);
            self.on_viewport_change(ViewportEvent::Zoom);
        }
    }

    /// Pans the viewport to center an annotation. Unknown identifiers are a
    /// no-op.
    pub fn pan_to(&mut self, key: impl AnnotationRef) {
        if let Some(annotation) = self.annotation_by_id(key.id_ref()) {
            let center = annotation.target().bounding_box().center();
            let viewport_center = self.viewport.borrow().image_to_viewport(center);
            self.viewport.borrow_mut().pan_to(viewport_center);
            self.on_viewport_change(ViewportEvent::Pan);
        }
    }

    /// Extracts the image pixels under the current selection. `Ok(None)`
    /// when nothing is selected.
    pub fn selected_snippet(&self) -> Result<Option<RgbaImage>> {
        let Some((annotation, _)) = self.selection.selected() else {
            return Ok(None);
        };
        let source = self.pixel_source.as_ref().ok_or(SnippetError::NoSource)?;
        let snippet = source.extract(annotation.target().bounding_box())?;
        Ok(Some(snippet))
    }

    // ------------------------------------------------------------------
    // Visibility & teardown
    // ------------------------------------------------------------------

    /// Shows or hides the overlay.
    pub fn set_visible(&mut self, visible: bool) {
        self.group.borrow_mut().set_visible(visible);
    }

    pub fn is_visible(&self) -> bool {
        self.group.borrow().is_visible()
    }

    /// Tears the overlay down: selection, trackers, shapes and
    /// subscriptions.
    pub fn destroy(&mut self) {
        self.selection
            .deselect(&mut self.registry, &mut self.tools, None, true);
        self.tools.stop_active();
        self.registry.clear();
        self.drawing.destroy();
        self.events.clear();
        self.group.borrow_mut().clear();
        tracing::debug!("overlay destroyed");
    }

    // ------------------------------------------------------------------
    // Event subscription
    // ------------------------------------------------------------------

    /// The overlay's event bus.
    pub fn events(&self) -> Rc<OverlayBus> {
        self.events.clone()
    }

    /// Subscribes to overlay events.
    pub fn subscribe<F>(
        &self,
        filter: EventFilter<OverlayEventCategory>,
        handler: F,
    ) -> SubscriptionId
    where
        F: Fn(OverlayEvent) + 'static,
    {
        self.events.subscribe(filter, handler)
    }

    /// Removes a subscription.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// The overlay group, for renderers.
    pub fn group(&self) -> Shared<OverlayGroup> {
        self.group.clone()
    }

    // ------------------------------------------------------------------
    // Input routing
    // ------------------------------------------------------------------

    /// Key-press notification from the host.
    pub fn key_down(&mut self, key: Key) {
        if self.config.read_only {
            return;
        }
        self.drawing.key_down(key, !self.selection.is_idle());
    }

    /// Key-release notification from the host.
    pub fn key_up(&mut self, key: Key) {
        let session_active = self.session_active();
        self.drawing.key_up(key, session_active);
    }

    /// Pointer press. Returns whether the overlay consumed the event.
    pub fn pointer_down(&mut self, event: PointerEvent) -> bool {
        if !self.is_visible() {
            return false;
        }

        // The armed drawing tracker claims the press and starts a session
        if self.drawing.is_armed() {
            let viewport = &self.viewport;
            if let Some(tool) = self.tools.active_tool_mut() {
                if !tool.is_drawing() {
                    let local = {
                        let vp = viewport.borrow();
                        tool.to_local(&*vp, event.window)
                    };
                    tool.start(local, &event);
                    if let Some(element) = tool.element() {
                        self.group.borrow_mut().append(element);
                    }
                    tracing::debug!("drawing session started");
                }
                return true;
            }
        }

        let point = self.image_point(event.window);
        let tolerance = self.image_tolerance();

        // The editable shape's dedicated tracker
        if self.selection.is_editing() {
            self.selection.pointer_over(point, tolerance);
            if self.selection.pointer_down(point) {
                return true;
            }
        }

        // Click-to-select on static shapes
        let hit = self
            .registry
            .hit_test(point, tolerance)
            .map(|shape| (shape.annotation().clone(), shape.element()));
        if let Some((annotation, element)) = hit {
            let options = self.select_options(false);
            self.selection.select(
                annotation,
                element,
                &mut self.registry,
                &mut self.tools,
                self.formatter.as_ref(),
                options,
            );
            return true;
        }

        false
    }

    /// Pointer move. Returns whether the overlay consumed the event.
    pub fn pointer_move(&mut self, event: PointerEvent) -> bool {
        if !self.is_visible() {
            return false;
        }

        // Advance an in-progress drawing session
        if self.session_active() {
            let viewport = &self.viewport;
            if let Some(tool) = self.tools.active_tool_mut() {
                let local = {
                    let vp = viewport.borrow();
                    tool.to_local(&*vp, event.window)
                };
                tool.on_move(local, &event);
            }
            return true;
        }

        let point = self.image_point(event.window);
        let tolerance = self.image_tolerance();

        if self.selection.is_editing() {
            if self.selection.pointer_drag(point) {
                return true;
            }
            // Hover arming: navigation resumes the instant the pointer
            // leaves the editable region
            return self.selection.pointer_over(point, tolerance);
        }

        self.update_hover(point, tolerance, &event);
        false
    }

    /// Pointer release. Returns whether the overlay consumed the event.
    pub fn pointer_up(&mut self, event: PointerEvent) -> bool {
        if !self.is_visible() {
            return false;
        }

        // Finalize an in-progress drawing session
        if self.session_active() {
            let mut finished = None;
            {
                let viewport = &self.viewport;
                if let Some(tool) = self.tools.active_tool_mut() {
                    let local = {
                        let vp = viewport.borrow();
                        tool.to_local(&*vp, event.window)
                    };
                    let rubber = tool.element();
                    finished = tool.on_up(local, &event);
                    if finished.is_none() {
                        if let Some(element) = rubber {
                            self.group.borrow_mut().remove(&element);
                        }
                    }
                }
            }
            match finished {
                Some(shape) => self.complete_drawing(shape),
                None => {
                    // The gesture yielded nothing; honor a modifier released
                    // mid-session now
                    if !self.keyboard.is_pressed(self.drawing.modifier()) {
                        self.drawing.disarm();
                    }
                }
            }
            return true;
        }

        let point = self.image_point(event.window);
        self.selection.pointer_up(point)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// The sole path by which a freshly drawn shape enters the selection
    /// machine.
    fn complete_drawing(&mut self, finished: FinishedShape) {
        self.drawing.disarm();

        let annotation = finished.annotation.clone();
        let options = self.select_options(false);
        self.selection.select(
            finished.annotation,
            finished.element,
            &mut self.registry,
            &mut self.tools,
            self.formatter.as_ref(),
            options,
        );
        self.events
            .publish(OverlayEvent::CreateSelection { annotation });
        tracing::debug!("drawing session completed");
    }

    fn select_options(&self, silent: bool) -> SelectOptions {
        SelectOptions {
            read_only: self.config.read_only,
            headless: self.config.headless,
            scale: self.current_scale(),
            silent,
        }
    }

    fn session_active(&self) -> bool {
        self.tools
            .active_tool()
            .map(|tool| tool.is_drawing())
            .unwrap_or(false)
    }

    fn image_point(&self, window: Point) -> Point {
        let viewport = self.viewport.borrow();
        viewport.viewport_to_image(viewport.window_to_viewport(window))
    }

    /// Hit tolerance converted from screen pixels into image pixels.
    fn image_tolerance(&self) -> f64 {
        self.config.hit_tolerance / self.current_scale().max(f64::EPSILON)
    }

    fn annotation_by_id(&self, id: &AnnotationId) -> Option<Annotation> {
        if let Some(shape) = self.registry.find(id) {
            return Some(shape.annotation().clone());
        }
        self.selection
            .annotation()
            .filter(|annotation| annotation.id() == id)
            .cloned()
    }

    fn update_hover(&mut self, point: Point, tolerance: f64, event: &PointerEvent) {
        let hit = self
            .registry
            .hit_test(point, tolerance)
            .map(|shape| shape.annotation().clone());
        let hit_id = hit.as_ref().map(|annotation| annotation.id().clone());
        if hit_id == self.hovered {
            return;
        }

        if let Some(previous_id) = self.hovered.take() {
            if let Some(previous) = self.annotation_by_id(&previous_id) {
                self.events.publish(OverlayEvent::MouseLeaveAnnotation {
                    annotation: previous,
                    event: *event,
                });
            }
        }
        if let Some(annotation) = hit {
            self.hovered = Some(annotation.id().clone());
            self.events.publish(OverlayEvent::MouseEnterAnnotation {
                annotation,
                event: *event,
            });
        }
    }
}

impl std::fmt::Debug for ImageOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageOverlay")
            .field("shapes", &self.registry.len())
            .field("selection", &self.selection)
            .field("tools", &self.tools)
            .field("config", &self.config)
            .finish()
    }
}
