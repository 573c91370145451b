//! Input primitives: pointer events, keyboard state, and pointer trackers.
//!
//! The overlay never installs page-global listeners. The host forwards
//! pointer and key events to each overlay, and the modifier-key state comes
//! from an injected [`KeyboardState`] provider so several overlay instances
//! compose safely and tests can simulate keys without a real device.

use std::cell::RefCell;
use std::collections::HashSet;

use annokit_core::geometry::Point;

/// Pointer button involved in an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Auxiliary,
}

/// A raw pointer event, in window/client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Position in window coordinates.
    pub window: Point,
    pub button: PointerButton,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl PointerEvent {
    /// A primary-button event at the given window position.
    pub fn at(window: Point) -> Self {
        Self {
            window,
            button: PointerButton::Primary,
            shift: false,
            ctrl: false,
            alt: false,
        }
    }
}

/// Keyboard keys the overlay reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Shift,
    Control,
    Alt,
    Meta,
}

/// Injected keyboard-state provider.
pub trait KeyboardState {
    /// Whether the key is currently held down.
    fn is_pressed(&self, key: Key) -> bool;
}

/// An in-memory [`KeyboardState`] the host (or a test) updates directly.
#[derive(Debug, Default)]
pub struct MemoryKeyState {
    held: RefCell<HashSet<Key>>,
}

impl MemoryKeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key press.
    pub fn press(&self, key: Key) {
        self.held.borrow_mut().insert(key);
    }

    /// Records a key release.
    pub fn release(&self, key: Key) {
        self.held.borrow_mut().remove(&key);
    }
}

impl KeyboardState for MemoryKeyState {
    fn is_pressed(&self, key: Key) -> bool {
        self.held.borrow().contains(&key)
    }
}

/// A pointer tracker: the armed/disarmed gate deciding whether its owner
/// receives pointer events or lets them fall through to viewport navigation.
///
/// `destroy` is the only removal path; a destroyed tracker never reports
/// armed again, so input handlers cannot dangle past their owning shape.
#[derive(Debug)]
pub struct PointerTracker {
    label: &'static str,
    armed: bool,
    destroyed: bool,
}

impl PointerTracker {
    /// Creates a disarmed tracker.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            armed: false,
            destroyed: false,
        }
    }

    /// Creates a tracker that starts armed (click-to-select on static
    /// shapes).
    pub fn armed(label: &'static str) -> Self {
        Self {
            label,
            armed: true,
            destroyed: false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed && !self.destroyed
    }

    pub fn arm(&mut self) {
        if !self.destroyed && !self.armed {
            tracing::trace!(tracker = self.label, "tracker armed");
            self.armed = true;
        }
    }

    pub fn disarm(&mut self) {
        if self.armed {
            tracing::trace!(tracker = self.label, "tracker disarmed");
            self.armed = false;
        }
    }

    /// Permanently detaches the tracker from input dispatch.
    pub fn destroy(&mut self) {
        if !self.destroyed {
            tracing::trace!(tracker = self.label, "tracker destroyed");
            self.armed = false;
            self.destroyed = true;
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}
