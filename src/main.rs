use std::rc::Rc;

use annokit::{
    init_logging, Annotation, AnnotationId, BusEvent, EventFilter, Geometry, ImageOverlay, Key,
    MemoryKeyState, OverlayConfig, PlanarViewport, Point, PointerEvent, Rect, Size, ViewportEvent,
};
use annokit_core::types::shared;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logging()?;

    tracing::info!(version = annokit::VERSION, built = annokit::BUILD_DATE, "annokit demo");

    // A 1000x800 container showing a 1000px-wide image
    let viewport = shared(PlanarViewport::new(Size::new(1000.0, 800.0), 1000.0));
    let keyboard = Rc::new(MemoryKeyState::new());

    let mut overlay = ImageOverlay::new(
        viewport.clone(),
        keyboard.clone(),
        OverlayConfig::default(),
    );

    overlay.subscribe(EventFilter::All, |event| {
        tracing::info!(event = %event.description(), "overlay event");
    });

    // Seed a few annotations and restore area ordering
    overlay.init(vec![
        Annotation::committed(
            "building",
            Geometry::Rect(Rect::new(120.0, 80.0, 400.0, 300.0)),
        ),
        Annotation::committed(
            "window",
            Geometry::Rect(Rect::new(200.0, 140.0, 60.0, 40.0)),
        ),
        Annotation::committed(
            "door",
            Geometry::Polygon(vec![
                Point::new(300.0, 300.0),
                Point::new(340.0, 300.0),
                Point::new(340.0, 380.0),
                Point::new(300.0, 380.0),
            ]),
        ),
    ]);
    overlay.redraw();
    tracing::info!(count = overlay.annotations().len(), "annotations loaded");

    // Zoom in; the overlay transform follows
    viewport.borrow_mut().set_zoom(2.0);
    overlay.on_viewport_change(ViewportEvent::Zoom);
    tracing::info!(transform = ?overlay.transform(), scale = overlay.current_scale(), "after zoom");

    // Programmatic selection swaps the static shape for an editable one
    overlay.select_annotation_by_id(&AnnotationId::new("window"));
    if let Some((annotation, _element)) = overlay.selected() {
        tracing::info!(id = %annotation.id(), "selection active");
    }
    overlay.deselect();

    // Draw a new rectangle: hold the modifier, press, drag, release
    keyboard.press(Key::Shift);
    overlay.key_down(Key::Shift);
    overlay.pointer_down(PointerEvent::at(Point::new(600.0, 500.0)));
    overlay.pointer_move(PointerEvent::at(Point::new(650.0, 540.0)));
    overlay.pointer_up(PointerEvent::at(Point::new(700.0, 580.0)));
    keyboard.release(Key::Shift);
    overlay.key_up(Key::Shift);

    if let Some((draft, _)) = overlay.selected() {
        tracing::info!(id = %draft.id(), draft = draft.is_draft(), "drawn selection");

        // Commit the draft the way an application would
        let committed = draft.commit();
        overlay.deselect();
        overlay.add_annotation(committed);
        overlay.redraw();
    }

    tracing::info!(count = overlay.annotations().len(), "final annotation count");

    overlay.destroy();
    Ok(())
}
