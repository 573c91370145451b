//! Drawing arbitration: modifier arming, session lifecycle, completion.

use annokit_core::geometry::{Geometry, Point, Rect};
use annokit_overlay::{AnnotationId, ImagePixels, Key, OverlayConfig, PointerEvent};

use crate::util::{fixture, fixture_with, record_events, rect_annotation};

fn press(x: f64, y: f64) -> PointerEvent {
    PointerEvent::at(Point::new(x, y))
}

#[test]
fn test_full_drawing_flow() {
    let (_viewport, keys, mut overlay) = fixture();
    let events = record_events(&overlay);

    // disarmed -> armed
    assert!(!overlay.is_drawing_armed());
    keys.press(Key::Shift);
    overlay.key_down(Key::Shift);
    assert!(overlay.is_drawing_armed());

    // press starts the session; moves advance it; release completes it
    assert!(overlay.pointer_down(press(200.0, 200.0)));
    assert!(overlay.pointer_move(press(300.0, 260.0)));
    assert!(overlay.pointer_up(press(400.0, 320.0)));

    // The tracker released the pointer; the new shape is selected
    assert!(!overlay.is_drawing_armed());
    let (annotation, element) = overlay.selected().expect("selection holds the new shape");
    assert!(annotation.is_draft());
    assert_eq!(
        annotation.target(),
        &Geometry::Rect(Rect::new(200.0, 200.0, 200.0, 120.0))
    );
    assert!(element.borrow().is_interactive());

    // Exactly one creation notification, after the select notification
    let log = events.borrow();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0], format!("select:{}", annotation.id()));
    assert_eq!(log[1], format!("create:{}", annotation.id()));
}

#[test]
fn test_press_without_modifier_falls_through_to_navigation() {
    let (_viewport, _keys, mut overlay) = fixture();
    assert!(!overlay.pointer_down(press(200.0, 200.0)));
    assert!(overlay.selected().is_none());
}

#[test]
fn test_modifier_does_not_arm_while_editing() {
    let (_viewport, keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("a", 100.0, 100.0, 200.0, 150.0));
    overlay.select_annotation_by_id(&AnnotationId::new("a"));

    keys.press(Key::Shift);
    overlay.key_down(Key::Shift);
    assert!(!overlay.is_drawing_armed());
}

#[test]
fn test_modifier_release_mid_session_keeps_tracking() {
    let (_viewport, keys, mut overlay) = fixture();

    keys.press(Key::Shift);
    overlay.key_down(Key::Shift);
    overlay.pointer_down(press(200.0, 200.0));

    // Released mid-draw: the session must complete undisturbed
    keys.release(Key::Shift);
    overlay.key_up(Key::Shift);
    assert!(overlay.is_drawing_armed());

    assert!(overlay.pointer_move(press(300.0, 300.0)));
    assert!(overlay.pointer_up(press(300.0, 300.0)));
    assert!(overlay.selected().is_some());
    assert!(!overlay.is_drawing_armed());
}

#[test]
fn test_tiny_gesture_completes_without_shape() {
    let (_viewport, keys, mut overlay) = fixture();
    let events = record_events(&overlay);

    keys.press(Key::Shift);
    overlay.key_down(Key::Shift);
    overlay.pointer_down(press(200.0, 200.0));
    keys.release(Key::Shift);
    overlay.key_up(Key::Shift);
    overlay.pointer_up(press(201.0, 201.0));

    assert!(overlay.selected().is_none());
    assert!(events.borrow().is_empty());
    // Modifier no longer held, so the tracker released with the session
    assert!(!overlay.is_drawing_armed());
    assert!(overlay.group().borrow().is_empty());
}

#[test]
fn test_drawing_disabled_blocks_arming() {
    let (_viewport, keys, mut overlay) = fixture();
    overlay.set_drawing_enabled(false);

    keys.press(Key::Shift);
    overlay.key_down(Key::Shift);
    assert!(!overlay.is_drawing_armed());

    // Re-enabling consults the injected key state
    overlay.set_drawing_enabled(true);
    assert!(overlay.is_drawing_armed());
}

#[test]
fn test_read_only_layer_never_arms() {
    let (_viewport, keys, mut overlay) = fixture_with(OverlayConfig {
        read_only: true,
        ..OverlayConfig::default()
    });
    keys.press(Key::Shift);
    overlay.key_down(Key::Shift);
    assert!(!overlay.is_drawing_armed());
}

#[test]
fn test_deselect_discards_draft() {
    let (_viewport, keys, mut overlay) = fixture();

    keys.press(Key::Shift);
    overlay.key_down(Key::Shift);
    overlay.pointer_down(press(200.0, 200.0));
    overlay.pointer_up(press(300.0, 300.0));
    assert!(overlay.selected().is_some());

    overlay.deselect();

    // The draft is gone rather than re-materialized
    assert!(overlay.selected().is_none());
    assert!(overlay.annotations().is_empty());
    assert!(overlay.group().borrow().is_empty());
}

#[test]
fn test_hover_suppressed_during_drawing_session() {
    let (_viewport, keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("a", 100.0, 100.0, 200.0, 150.0));
    let events = record_events(&overlay);

    keys.press(Key::Shift);
    overlay.key_down(Key::Shift);
    overlay.pointer_down(press(500.0, 500.0));
    // Crosses over the existing shape mid-draw
    overlay.pointer_move(press(150.0, 150.0));

    assert!(!events.borrow().iter().any(|e| e.starts_with("enter")));
}

#[test]
fn test_hover_events_on_static_shapes() {
    let (_viewport, _keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("a", 100.0, 100.0, 200.0, 150.0));
    let events = record_events(&overlay);

    overlay.pointer_move(press(150.0, 150.0));
    overlay.pointer_move(press(160.0, 160.0));
    overlay.pointer_move(press(600.0, 600.0));

    assert_eq!(events.borrow().as_slice(), ["enter:a", "leave:a"]);
}

#[test]
fn test_click_selects_topmost_shape_and_notifies() {
    let (_viewport, _keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("large", 100.0, 100.0, 400.0, 300.0));
    overlay.add_annotation(rect_annotation("small", 150.0, 150.0, 50.0, 50.0));
    overlay.redraw();
    let events = record_events(&overlay);

    assert!(overlay.pointer_down(press(170.0, 170.0)));

    let (selected, _) = overlay.selected().unwrap();
    assert_eq!(selected.id(), &AnnotationId::new("small"));
    assert_eq!(events.borrow().as_slice(), ["select:small"]);
}

#[test]
fn test_editing_drag_emits_update_fragments() {
    let (_viewport, _keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("a", 200.0, 200.0, 100.0, 80.0));
    overlay.select_annotation_by_id(&AnnotationId::new("a"));
    let events = record_events(&overlay);

    // Grab the bottom-right corner handle and pull
    assert!(overlay.pointer_down(press(300.0, 280.0)));
    assert!(overlay.pointer_move(press(340.0, 320.0)));
    assert!(overlay.pointer_up(press(340.0, 320.0)));

    let log = events.borrow();
    assert!(log.iter().all(|e| e == "update"));
    assert!(log.len() >= 2);

    let (annotation, _) = overlay.selected().unwrap();
    // The stored annotation value is immutable; edits travel via events
    assert_eq!(
        annotation.target(),
        &Geometry::Rect(Rect::new(200.0, 200.0, 100.0, 80.0))
    );
}

#[test]
fn test_pointer_over_editable_consumes_navigation() {
    let (_viewport, _keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("a", 200.0, 200.0, 100.0, 80.0));
    overlay.select_annotation_by_id(&AnnotationId::new("a"));

    // Over the shape: armed, navigation blocked
    assert!(overlay.pointer_move(press(250.0, 240.0)));
    // Off the shape: navigation resumes instantly
    assert!(!overlay.pointer_move(press(600.0, 600.0)));
}

#[test]
fn test_hidden_overlay_ignores_input() {
    let (_viewport, keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("a", 100.0, 100.0, 200.0, 150.0));
    overlay.set_visible(false);

    keys.press(Key::Shift);
    overlay.key_down(Key::Shift);
    assert!(!overlay.pointer_down(press(150.0, 150.0)));
    assert!(overlay.selected().is_none());
}

#[test]
fn test_snippet_extraction_for_selection() {
    let (_viewport, _keys, mut overlay) = fixture();
    let pixels = image::RgbaImage::from_pixel(1000, 800, image::Rgba([7, 7, 7, 255]));
    overlay.set_pixel_source(Some(Box::new(ImagePixels::new(pixels))));
    overlay.add_annotation(rect_annotation("a", 100.0, 100.0, 200.0, 150.0));

    // No selection: silently empty
    assert!(overlay.selected_snippet().unwrap().is_none());

    overlay.select_annotation_by_id(&AnnotationId::new("a"));
    let snippet = overlay.selected_snippet().unwrap().unwrap();
    assert_eq!(snippet.dimensions(), (200, 150));
}

#[test]
fn test_snippet_without_source_fails() {
    let (_viewport, _keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("a", 100.0, 100.0, 200.0, 150.0));
    overlay.select_annotation_by_id(&AnnotationId::new("a"));

    assert!(overlay.selected_snippet().is_err());
}

#[test]
fn test_switching_tools() {
    let (_viewport, keys, mut overlay) = fixture();
    overlay
        .set_tool(annokit_core::geometry::GeometryKind::Freehand)
        .unwrap();
    assert!(overlay
        .set_tool(annokit_core::geometry::GeometryKind::Ellipse)
        .is_err());

    keys.press(Key::Shift);
    overlay.key_down(Key::Shift);
    overlay.pointer_down(press(100.0, 100.0));
    overlay.pointer_move(press(150.0, 100.0));
    overlay.pointer_move(press(150.0, 150.0));
    overlay.pointer_up(press(100.0, 150.0));

    let (annotation, _) = overlay.selected().unwrap();
    assert_eq!(
        annotation.target().kind(),
        annokit_core::geometry::GeometryKind::Freehand
    );
}
