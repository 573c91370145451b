//! Type aliases for commonly used complex types.
//!
//! The overlay runs on a single cooperative execution context (the one that
//! delivers viewport, pointer, and keyboard events), so shared state is
//! `Rc<RefCell<T>>` throughout. These aliases give the pattern one name:
//! - **Readability**: `Shared<OverlayGroup>` is clearer than the full type
//! - **Consistency**: the same pattern used the same way across crates
//! - **Refactoring**: change the underlying type in one place

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
///
/// This is the fundamental building block for overlay state: elements, the
/// overlay group, and the viewport collaborator are all shared this way.
///
/// # Example
/// ```rust,ignore
/// let group: Shared<OverlayGroup> = shared(OverlayGroup::new());
/// group.borrow_mut().set_visible(false);
/// ```
pub type Shared<T> = Rc<RefCell<T>>;

/// An optional shared reference, for lazily-initialized shared state.
pub type SharedOption<T> = Rc<RefCell<Option<T>>>;

/// A shared vector for single-threaded collection management.
pub type SharedVec<T> = Rc<RefCell<Vec<T>>>;

/// A shared hash map for single-threaded key-value storage.
pub type SharedHashMap<K, V> = Rc<RefCell<HashMap<K, V>>>;

/// A boxed callback taking no arguments.
pub type Callback = Box<dyn Fn()>;

/// A boxed callback receiving a borrowed value.
pub type DataCallback<T> = Box<dyn Fn(&T)>;

/// Wraps a value in `Rc<RefCell<...>>`.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Wraps `None` in `Rc<RefCell<Option<...>>>`.
pub fn shared_none<T>() -> SharedOption<T> {
    Rc::new(RefCell::new(None))
}

/// Wraps a value in `Rc<RefCell<Some(...)>>`.
pub fn shared_some<T>(value: T) -> SharedOption<T> {
    Rc::new(RefCell::new(Some(value)))
}
