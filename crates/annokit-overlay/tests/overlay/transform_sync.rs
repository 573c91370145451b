//! Overlay transform derivation against viewport state.

use annokit_core::geometry::Point;
use annokit_overlay::{AnnotationId, Viewport, ViewportEvent};

use crate::util::{fixture, record_events, rect_annotation};

#[test]
fn test_zoom_two_yields_scale_two_translate_origin() {
    let (viewport, _keys, mut overlay) = fixture();

    viewport.borrow_mut().set_zoom(2.0);
    overlay.on_viewport_change(ViewportEvent::Zoom);

    let expected_origin = viewport.borrow().pixel_from_point(Point::ZERO);
    let transform = overlay.transform();
    assert_eq!(transform.translate, expected_origin);
    assert_eq!(transform.scale_x, 2.0);
    assert_eq!(transform.scale_y, 2.0);
    assert_eq!(transform.rotation, 0.0);
}

#[test]
fn test_transform_is_identity_at_default_view() {
    let (_viewport, _keys, overlay) = fixture();
    let transform = overlay.transform();
    assert_eq!(transform.translate, Point::ZERO);
    assert_eq!(transform.scale_x, 1.0);
    assert_eq!(transform.scale_y, 1.0);
}

#[test]
fn test_flip_negates_scale_x_and_mirrors_origin() {
    let (viewport, _keys, mut overlay) = fixture();

    viewport.borrow_mut().set_flipped(true);
    overlay.on_viewport_change(ViewportEvent::Flip);

    let transform = overlay.transform();
    assert_eq!(transform.scale_x, -1.0);
    assert_eq!(transform.scale_y, 1.0);
    // Origin mirrored across the container's inner width (was at x = 0)
    assert_eq!(transform.translate.x, 1000.0);
}

#[test]
fn test_rotation_passes_through() {
    let (viewport, _keys, mut overlay) = fixture();

    viewport.borrow_mut().set_rotation(30.0);
    overlay.on_viewport_change(ViewportEvent::Rotate);

    assert_eq!(overlay.transform().rotation, 30.0);
}

#[test]
fn test_closed_viewport_skips_sync() {
    let (viewport, _keys, mut overlay) = fixture();

    viewport.borrow_mut().set_open(false);
    viewport.borrow_mut().set_zoom(4.0);
    overlay.on_viewport_change(ViewportEvent::Zoom);

    // Still the transform derived at construction time
    assert_eq!(overlay.transform().scale_y, 1.0);
}

#[test]
fn test_recompute_rescales_handles_and_notifies_move() {
    let (viewport, _keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("a", 100.0, 100.0, 200.0, 150.0));
    overlay.select_annotation_by_id(&AnnotationId::new("a"));

    let events = record_events(&overlay);

    viewport.borrow_mut().set_zoom(4.0);
    overlay.on_viewport_change(ViewportEvent::Zoom);

    assert_eq!(events.borrow().as_slice(), ["move"]);

    // Handles shrink by the reciprocal of the scale so they stay constant
    // on screen
    let (_, element) = overlay.selected().unwrap();
    assert!((element.borrow().handle_scale() - 0.25).abs() < 1e-9);
}

#[test]
fn test_no_move_notification_without_selection() {
    let (viewport, _keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("a", 100.0, 100.0, 200.0, 150.0));

    let events = record_events(&overlay);
    viewport.borrow_mut().set_zoom(3.0);
    overlay.on_viewport_change(ViewportEvent::Zoom);

    assert!(events.borrow().is_empty());
}

#[test]
fn test_current_scale_follows_formula() {
    let (viewport, _keys, overlay) = fixture();
    // zoom × container_width / content_factor = 2 × 1000 / 1000
    viewport.borrow_mut().set_zoom(2.0);
    assert!((overlay.current_scale() - 2.0).abs() < 1e-9);
}

#[test]
fn test_fit_viewport_to_annotation_centers_it() {
    let (viewport, _keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("a", 100.0, 100.0, 200.0, 100.0));

    overlay.fit_viewport_to(&AnnotationId::new("a"));

    // The annotation center lands at the container center
    let center_pixel = viewport
        .borrow()
        .pixel_from_point(viewport.borrow().image_to_viewport(Point::new(200.0, 150.0)));
    assert!((center_pixel.x - 500.0).abs() < 1e-6);
    assert!((center_pixel.y - 400.0).abs() < 1e-6);
    assert!(viewport.borrow().zoom() > 1.0);
}

#[test]
fn test_pan_to_unknown_annotation_is_noop() {
    let (viewport, _keys, mut overlay) = fixture();
    let zoom_before = viewport.borrow().zoom();

    overlay.pan_to(&AnnotationId::new("missing"));
    overlay.fit_viewport_to(&AnnotationId::new("missing"));

    assert_eq!(viewport.borrow().zoom(), zoom_before);
    assert_eq!(overlay.transform().scale_y, 1.0);
}
