//! # annokit
//!
//! An interactive annotation overlay engine for pannable, zoomable, rotatable
//! image viewports: select, create, and edit geometric annotations drawn on
//! top of an image while the overlay stays visually registered with the
//! viewer.
//!
//! ## Architecture
//!
//! annokit is organized as a workspace with multiple crates:
//!
//! 1. **annokit-core** - Geometry primitives, errors, event bus, shared types
//! 2. **annokit-overlay** - Transform sync, shape registry, selection machine,
//!    drawing controller, tool registry
//! 3. **annokit** - Demo binary wiring a planar viewport to an overlay
//!
//! ## Features
//!
//! - **Viewport Registration**: one affine transform, recomputed per viewport
//!   event, keeps overlay-local coordinates aligned with image pixels
//! - **Shape Lifecycle**: add/remove/replace/init with area-sorted draw order
//! - **Selection Machine**: static vs. editable shapes, draft vs. committed
//!   annotations, handle re-scaling under zoom
//! - **Drawing Arbitration**: modifier-armed drawing that never competes with
//!   viewport navigation for the pointer

pub use annokit_overlay as overlay;

pub use annokit_core::{
    BusEvent, Error, EventBus, EventFilter, Geometry, GeometryKind, Point, Rect, Result, Size,
    SnippetError, SubscriptionId, ToolError,
};

pub use annokit_overlay::{
    Annotation, AnnotationId, Element, ImageOverlay, Key, MemoryKeyState, OverlayConfig,
    OverlayEvent, OverlayEventCategory, PlanarViewport, PointerEvent, Viewport, ViewportEvent,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
