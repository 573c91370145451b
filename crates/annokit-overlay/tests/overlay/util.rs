//! Shared fixtures for the overlay suites.

use std::cell::RefCell;
use std::rc::Rc;

use annokit_core::event_bus::EventFilter;
use annokit_core::geometry::{Geometry, Rect, Size};
use annokit_core::types::{shared, Shared};
use annokit_overlay::{
    Annotation, ImageOverlay, MemoryKeyState, OverlayConfig, OverlayEvent, PlanarViewport,
};

/// A 1000x800 container over a 1000px-wide image. At zoom 1.0 the default
/// view maps window coordinates 1:1 onto image pixels, which keeps gesture
/// coordinates readable.
pub fn fixture() -> (Shared<PlanarViewport>, Rc<MemoryKeyState>, ImageOverlay) {
    fixture_with(OverlayConfig::default())
}

pub fn fixture_with(
    config: OverlayConfig,
) -> (Shared<PlanarViewport>, Rc<MemoryKeyState>, ImageOverlay) {
    let viewport = shared(PlanarViewport::new(Size::new(1000.0, 800.0), 1000.0));
    let keyboard = Rc::new(MemoryKeyState::new());
    let overlay = ImageOverlay::new(viewport.clone(), keyboard.clone(), config);
    (viewport, keyboard, overlay)
}

pub fn rect_annotation(id: &str, x: f64, y: f64, w: f64, h: f64) -> Annotation {
    Annotation::committed(id, Geometry::Rect(Rect::new(x, y, w, h)))
}

/// Compact event labels for asserting on emission order.
pub fn record_events(overlay: &ImageOverlay) -> Rc<RefCell<Vec<String>>> {
    let log: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    overlay.subscribe(EventFilter::All, move |event| {
        let label = match &event {
            OverlayEvent::CreateSelection { annotation } => {
                format!("create:{}", annotation.id())
            }
            OverlayEvent::Select { annotation, .. } => format!("select:{}", annotation.id()),
            OverlayEvent::UpdateTarget { .. } => "update".to_string(),
            OverlayEvent::MoveSelection { .. } => "move".to_string(),
            OverlayEvent::MouseEnterAnnotation { annotation, .. } => {
                format!("enter:{}", annotation.id())
            }
            OverlayEvent::MouseLeaveAnnotation { annotation, .. } => {
                format!("leave:{}", annotation.id())
            }
        };
        sink.borrow_mut().push(label);
    });
    log
}
