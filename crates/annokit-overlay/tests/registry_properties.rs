//! Property-based checks on the shape registry.

use std::collections::HashSet;

use proptest::prelude::*;

use annokit_core::geometry::{Geometry, Rect};
use annokit_core::types::shared;
use annokit_overlay::{Annotation, AnnotationId, OverlayGroup, ShapeRegistry};

#[derive(Debug, Clone)]
enum Op {
    Add { slot: u8, size: u16 },
    Remove { slot: u8 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..8, 1u16..500).prop_map(|(slot, size)| Op::Add { slot, size }),
        (0u8..8).prop_map(|slot| Op::Remove { slot }),
    ]
}

fn annotation(slot: u8, size: u16) -> Annotation {
    Annotation::committed(
        format!("anno-{}", slot),
        Geometry::Rect(Rect::new(0.0, 0.0, size as f64, size as f64)),
    )
}

proptest! {
    /// For all add/remove sequences, the rendered shape count equals the
    /// number of distinct live annotation identifiers.
    #[test]
    fn shape_count_matches_live_ids(ops in proptest::collection::vec(op_strategy(), 0..64)) {
        let group = shared(OverlayGroup::new());
        let mut registry = ShapeRegistry::new(group.clone());
        let mut live: HashSet<u8> = HashSet::new();

        for op in ops {
            match op {
                Op::Add { slot, size } => {
                    // The registry binds shapes 1:1; adding an existing id
                    // goes through replace semantics
                    if live.contains(&slot) {
                        registry.replace(annotation(slot, size), None, None);
                    } else {
                        registry.add(annotation(slot, size), None);
                        live.insert(slot);
                    }
                }
                Op::Remove { slot } => {
                    registry.remove(AnnotationId::new(format!("anno-{}", slot)));
                    live.remove(&slot);
                }
            }
        }

        prop_assert_eq!(registry.len(), live.len());
        prop_assert_eq!(group.borrow().len(), live.len());

        let ids: HashSet<String> = registry
            .annotations()
            .iter()
            .map(|a| a.id().to_string())
            .collect();
        prop_assert_eq!(ids.len(), live.len());
    }

    /// Redraw is idempotent on the resulting order.
    #[test]
    fn redraw_is_idempotent(sizes in proptest::collection::vec(1u16..500, 0..24)) {
        let group = shared(OverlayGroup::new());
        let mut registry = ShapeRegistry::new(group.clone());
        for (i, size) in sizes.iter().enumerate() {
            registry.add(annotation(i as u8, *size), None);
        }

        let order_of = |group: &std::cell::RefCell<OverlayGroup>| -> Vec<String> {
            group
                .borrow()
                .children()
                .iter()
                .map(|e| e.borrow().annotation_id().unwrap().to_string())
                .collect()
        };

        registry.redraw();
        let first = order_of(&group);
        registry.redraw();
        let second = order_of(&group);
        prop_assert_eq!(&first, &second);

        // And the order really is area-descending
        let areas: Vec<f64> = group
            .borrow()
            .children()
            .iter()
            .map(|e| e.borrow().geometry().area())
            .collect();
        prop_assert!(areas.windows(2).all(|w| w[0] >= w[1]));
    }
}
