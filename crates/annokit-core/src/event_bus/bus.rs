//! Event Bus implementation.
//!
//! Provides a subscription registry for synchronous event distribution. The
//! bus is generic over the event type so each overlay instance carries its own
//! bus; there is deliberately no process-global instance, letting several
//! overlays coexist on one page without sharing listeners.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::rc::Rc;
use uuid::Uuid;

use super::BusEvent;

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Filter to receive only specific event types
#[derive(Debug, Clone)]
pub enum EventFilter<C> {
    /// Receive all events.
    All,
    /// Receive events matching any of these categories.
    Categories(Vec<C>),
}

impl<C> Default for EventFilter<C> {
    fn default() -> Self {
        EventFilter::All
    }
}

impl<C: PartialEq> EventFilter<C> {
    /// Check if an event matches this filter
    pub fn matches<E: BusEvent<Category = C>>(&self, event: &E) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

/// Type alias for event handler functions
type EventHandler<E> = Rc<dyn Fn(E)>;

/// Event bus for overlay event distribution
///
/// Handlers run synchronously on the publishing call stack, in the same
/// cooperative execution context that delivers viewport and pointer events.
/// The handler table is snapshotted before dispatch, so a handler may
/// subscribe or unsubscribe without deadlocking the bus.
pub struct EventBus<E: BusEvent> {
    /// Registered synchronous handlers
    handlers: RwLock<HashMap<SubscriptionId, (EventFilter<E::Category>, EventHandler<E>)>>,
}

impl<E: BusEvent> EventBus<E> {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Publish an event to all matching subscribers
    ///
    /// Returns the number of handlers that received the event.
    pub fn publish(&self, event: E) -> usize {
        let matching: Vec<EventHandler<E>> = {
            let handlers = self.handlers.read();
            handlers
                .values()
                .filter(|(filter, _)| filter.matches(&event))
                .map(|(_, handler)| Rc::clone(handler))
                .collect()
        };

        tracing::trace!(
            description = %event.description(),
            handlers = matching.len(),
            "publishing event"
        );

        let count = matching.len();
        for handler in matching {
            handler(event.clone());
        }
        count
    }

    /// Subscribe to events with a synchronous handler
    ///
    /// The handler is called on the publishing call stack, so it should
    /// return quickly to avoid stalling event dispatch.
    pub fn subscribe<F>(&self, filter: EventFilter<E::Category>, handler: F) -> SubscriptionId
    where
        F: Fn(E) + 'static,
    {
        let id = SubscriptionId::new();
        let mut handlers = self.handlers.write();
        handlers.insert(id, (filter, Rc::new(handler)));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Unsubscribe from events
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write();
        let removed = handlers.remove(&id).is_some();
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Get the number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Remove every subscription, used at overlay teardown.
    pub fn clear(&self) {
        self.handlers.write().clear();
    }
}

impl<E: BusEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: BusEvent> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
