//! Synchronous event distribution.
//!
//! The overlay notifies consumers (toolbars, editors, application code)
//! through a per-instance [`EventBus`]. Event types implement [`BusEvent`] so
//! the bus can filter by category and describe events for logging.

mod bus;

pub use bus::{EventBus, EventFilter, SubscriptionId};

/// Implemented by event enums distributed over an [`EventBus`].
pub trait BusEvent: Clone + 'static {
    /// Category tag used by [`EventFilter::Categories`].
    type Category: Copy + PartialEq + 'static;

    /// Get the category of this event
    fn category(&self) -> Self::Category;

    /// Get a short description of this event for logging
    fn description(&self) -> String;
}
