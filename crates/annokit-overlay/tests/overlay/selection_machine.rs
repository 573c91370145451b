//! Selection/editing state machine transitions.

use annokit_core::geometry::{Geometry, Rect};
use annokit_overlay::{Annotation, AnnotationId, OverlayConfig};

use crate::util::{fixture, fixture_with, record_events, rect_annotation};

#[test]
fn test_select_swaps_static_for_editable() {
    let (_viewport, _keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("a", 100.0, 100.0, 200.0, 150.0));

    let (annotation, element) = overlay
        .select_annotation_by_id(&AnnotationId::new("a"))
        .expect("selection");

    assert_eq!(annotation.id(), &AnnotationId::new("a"));
    assert!(element.borrow().is_interactive());

    // The static shape left the registry; only the editable element remains
    let group = overlay.group();
    assert_eq!(group.borrow().len(), 1);
}

#[test]
fn test_select_then_deselect_restores_exactly_one_static_shape() {
    let (_viewport, _keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("a", 100.0, 100.0, 200.0, 150.0));

    overlay.select_annotation_by_id(&AnnotationId::new("a"));
    overlay.deselect();

    assert!(overlay.selected().is_none());
    let group = overlay.group();
    assert_eq!(group.borrow().len(), 1);
    let element = group.borrow().children()[0].clone();
    assert!(!element.borrow().is_interactive());
    assert_eq!(
        element.borrow().annotation_id(),
        Some(&AnnotationId::new("a"))
    );
    assert_eq!(overlay.annotations().len(), 1);
}

#[test]
fn test_select_same_annotation_twice_is_noop() {
    let (_viewport, _keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("a", 100.0, 100.0, 200.0, 150.0));

    let first = overlay
        .select_annotation_by_id(&AnnotationId::new("a"))
        .unwrap();
    // The shape is no longer in the registry, but re-selecting its id is
    // still answered from the selection itself
    let events = record_events(&overlay);
    let again = overlay
        .select_annotation_by_id(&AnnotationId::new("a"))
        .unwrap();

    assert!(std::rc::Rc::ptr_eq(&first.1, &again.1));
    assert!(events.borrow().is_empty());
}

#[test]
fn test_switching_selection_deselects_first() {
    let (_viewport, _keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("a", 100.0, 100.0, 200.0, 150.0));
    overlay.add_annotation(rect_annotation("b", 500.0, 400.0, 100.0, 100.0));

    overlay.select_annotation_by_id(&AnnotationId::new("a"));
    overlay.select_annotation_by_id(&AnnotationId::new("b"));

    let (selected, _) = overlay.selected().unwrap();
    assert_eq!(selected.id(), &AnnotationId::new("b"));

    // "a" is back in the registry as a static shape; "b" is editable
    let group = overlay.group();
    assert_eq!(group.borrow().len(), 2);
    assert_eq!(overlay.annotations().len(), 2);

    overlay.deselect();
    assert_eq!(group.borrow().len(), 2);
    assert_eq!(overlay.annotations().len(), 2);
}

#[test]
fn test_read_only_annotation_selects_static() {
    let (_viewport, _keys, mut overlay) = fixture();
    overlay.add_annotation(
        rect_annotation("a", 100.0, 100.0, 200.0, 150.0).with_read_only(true),
    );

    let (_, element) = overlay
        .select_annotation_by_id(&AnnotationId::new("a"))
        .unwrap();

    // The existing static shape is kept
    assert!(!element.borrow().is_interactive());
    let group = overlay.group();
    assert_eq!(group.borrow().len(), 1);
    assert!(std::rc::Rc::ptr_eq(&group.borrow().children()[0], &element));
}

#[test]
fn test_read_only_layer_selects_static() {
    let (_viewport, _keys, mut overlay) = fixture_with(OverlayConfig {
        read_only: true,
        ..OverlayConfig::default()
    });
    overlay.add_annotation(rect_annotation("a", 100.0, 100.0, 200.0, 150.0));

    let (_, element) = overlay
        .select_annotation_by_id(&AnnotationId::new("a"))
        .unwrap();
    assert!(!element.borrow().is_interactive());
}

#[test]
fn test_headless_layer_selects_static() {
    let (_viewport, _keys, mut overlay) = fixture_with(OverlayConfig {
        headless: true,
        ..OverlayConfig::default()
    });
    overlay.add_annotation(rect_annotation("a", 100.0, 100.0, 200.0, 150.0));

    let (_, element) = overlay
        .select_annotation_by_id(&AnnotationId::new("a"))
        .unwrap();
    assert!(!element.borrow().is_interactive());
}

#[test]
fn test_unknown_geometry_kind_degrades_to_static() {
    let (_viewport, _keys, mut overlay) = fixture();
    // No tool is registered for ellipses by default
    overlay.add_annotation(Annotation::committed(
        "e",
        Geometry::Ellipse {
            cx: 300.0,
            cy: 300.0,
            rx: 50.0,
            ry: 30.0,
        },
    ));

    let (_, element) = overlay
        .select_annotation_by_id(&AnnotationId::new("e"))
        .unwrap();
    assert!(!element.borrow().is_interactive());
}

#[test]
fn test_select_unknown_id_is_noop() {
    let (_viewport, _keys, mut overlay) = fixture();
    assert!(overlay
        .select_annotation_by_id(&AnnotationId::new("missing"))
        .is_none());
    assert!(overlay.selected().is_none());
}

#[test]
fn test_remove_selected_deselects_then_removes() {
    let (_viewport, _keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("a", 100.0, 100.0, 200.0, 150.0));
    overlay.select_annotation_by_id(&AnnotationId::new("a"));

    overlay.remove_annotation(AnnotationId::new("a"));

    assert!(overlay.selected().is_none());
    assert!(overlay.annotations().is_empty());
    let group = overlay.group();
    assert!(group.borrow().is_empty());
}

#[test]
fn test_replace_selected_deselects_first() {
    let (_viewport, _keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("a", 100.0, 100.0, 200.0, 150.0));
    overlay.select_annotation_by_id(&AnnotationId::new("a"));

    let updated = rect_annotation("a", 100.0, 100.0, 300.0, 200.0);
    overlay.replace_annotation(updated.clone(), None);

    assert!(overlay.selected().is_none());
    assert_eq!(overlay.annotations(), vec![updated]);
    let group = overlay.group();
    assert_eq!(group.borrow().len(), 1);
}

#[test]
fn test_replace_by_previous_identity() {
    let (_viewport, _keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("old", 100.0, 100.0, 200.0, 150.0));

    let renamed = rect_annotation("new", 100.0, 100.0, 200.0, 150.0);
    overlay.replace_annotation(renamed, Some(&AnnotationId::new("old")));

    let ids: Vec<AnnotationId> = overlay
        .annotations()
        .iter()
        .map(|a| a.id().clone())
        .collect();
    assert_eq!(ids, vec![AnnotationId::new("new")]);
}

#[test]
fn test_override_id_on_selected_shape() {
    let (_viewport, _keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("temp", 100.0, 100.0, 200.0, 150.0));
    overlay.select_annotation_by_id(&AnnotationId::new("temp"));

    let renamed = overlay
        .override_annotation_id(&AnnotationId::new("temp"), "assigned")
        .expect("override");

    assert_eq!(renamed.id(), &AnnotationId::new("assigned"));
    assert_eq!(
        renamed.target(),
        &Geometry::Rect(Rect::new(100.0, 100.0, 200.0, 150.0))
    );

    let (selected, element) = overlay.selected().unwrap();
    assert_eq!(selected.id(), &AnnotationId::new("assigned"));
    assert_eq!(
        element.borrow().annotation_id(),
        Some(&AnnotationId::new("assigned"))
    );
}

#[test]
fn test_override_id_on_unselected_shape() {
    let (_viewport, _keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("temp", 100.0, 100.0, 200.0, 150.0));

    let renamed = overlay
        .override_annotation_id(&AnnotationId::new("temp"), "assigned")
        .expect("override");
    assert_eq!(renamed.id(), &AnnotationId::new("assigned"));

    assert!(overlay
        .select_annotation_by_id(&AnnotationId::new("assigned"))
        .is_some());
}

#[test]
fn test_override_unknown_id_is_noop() {
    let (_viewport, _keys, mut overlay) = fixture();
    assert!(overlay
        .override_annotation_id(&AnnotationId::new("missing"), "other")
        .is_none());
}

#[test]
fn test_init_clears_existing_selection_and_shapes() {
    let (_viewport, _keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("a", 100.0, 100.0, 200.0, 150.0));
    overlay.select_annotation_by_id(&AnnotationId::new("a"));

    overlay.init(vec![
        rect_annotation("x", 0.0, 0.0, 50.0, 50.0),
        rect_annotation("y", 60.0, 60.0, 20.0, 20.0),
    ]);

    assert!(overlay.selected().is_none());
    let ids: Vec<AnnotationId> = overlay
        .annotations()
        .iter()
        .map(|a| a.id().clone())
        .collect();
    assert_eq!(ids, vec![AnnotationId::new("x"), AnnotationId::new("y")]);
}

#[test]
fn test_destroy_tears_everything_down() {
    let (_viewport, _keys, mut overlay) = fixture();
    overlay.add_annotation(rect_annotation("a", 100.0, 100.0, 200.0, 150.0));
    overlay.select_annotation_by_id(&AnnotationId::new("a"));
    let events = record_events(&overlay);

    overlay.destroy();

    assert!(overlay.selected().is_none());
    assert!(overlay.annotations().is_empty());
    assert!(overlay.group().borrow().is_empty());
    assert_eq!(overlay.events().subscriber_count(), 0);
    assert!(events.borrow().is_empty());
}
