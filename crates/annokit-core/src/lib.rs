//! # annokit Core
//!
//! Core types and utilities for the annokit annotation overlay.
//! Provides the geometric primitives, error types, event distribution,
//! and shared-type aliases used by the overlay crate.

pub mod constants;
pub mod error;
pub mod event_bus;
pub mod geometry;
pub mod types;

pub use error::{Error, Result, SnippetError, ToolError};

pub use geometry::{rotate_point, Geometry, GeometryKind, Point, Rect, Size};

// Re-export event bus for convenience
pub use event_bus::{BusEvent, EventBus, EventFilter, SubscriptionId};

// Re-export type aliases for convenience
pub use types::{
    shared, shared_none, shared_some, Callback, DataCallback, Shared, SharedHashMap, SharedOption,
    SharedVec,
};
