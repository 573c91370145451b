//! The drawing interaction controller.
//!
//! Arbitrates the overlay's primary pointer tracker between two mutually
//! exclusive uses: drawing a new annotation, and letting the viewport's own
//! navigation handle the same input device. The tracker starts disarmed;
//! holding the designated modifier key arms it, but only while nothing is
//! selected. Releasing the modifier disarms it unless a drawing session is
//! in progress — disarming mid-draw would abort input without completing
//! the shape.

use crate::input::{Key, KeyboardState, PointerTracker};

/// Gates the overlay's primary pointer tracker for freehand drawing.
#[derive(Debug)]
pub struct DrawingController {
    tracker: PointerTracker,
    enabled: bool,
    modifier: Key,
}

impl DrawingController {
    pub fn new(modifier: Key) -> Self {
        Self {
            tracker: PointerTracker::new("drawing"),
            enabled: true,
            modifier,
        }
    }

    /// The designated arming modifier.
    pub fn modifier(&self) -> Key {
        self.modifier
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the primary tracker currently claims pointer input.
    pub fn is_armed(&self) -> bool {
        self.tracker.is_armed()
    }

    /// Enables or disables drawing. Enabling consults the injected keyboard
    /// state, so a modifier already held arms the tracker immediately;
    /// disabling leaves an in-progress session undisturbed.
    pub fn set_enabled(
        &mut self,
        enabled: bool,
        keyboard: &dyn KeyboardState,
        selection_active: bool,
        session_active: bool,
    ) {
        self.enabled = enabled;
        if !enabled {
            if !session_active {
                self.tracker.disarm();
            }
        } else if keyboard.is_pressed(self.modifier) && !selection_active {
            self.tracker.arm();
        }
    }

    /// Key-press notification. Arms the tracker when the designated modifier
    /// goes down — unless a shape is selected, since drawing must not start
    /// while editing is in progress.
    pub fn key_down(&mut self, key: Key, selection_active: bool) {
        if key == self.modifier && self.enabled && !selection_active {
            self.tracker.arm();
        }
    }

    /// Key-release notification. Disarms unless a session is in progress.
    pub fn key_up(&mut self, key: Key, session_active: bool) {
        if key == self.modifier && !session_active {
            self.tracker.disarm();
        }
    }

    /// Releases the tracker; called when a drawing session completes.
    pub fn disarm(&mut self) {
        self.tracker.disarm();
    }

    /// Permanently detaches the tracker at overlay teardown.
    pub fn destroy(&mut self) {
        self.tracker.destroy();
    }
}
