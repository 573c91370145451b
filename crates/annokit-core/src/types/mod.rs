//! Shared type aliases.

mod aliases;

pub use aliases::{
    shared, shared_none, shared_some, Callback, DataCallback, Shared, SharedHashMap, SharedOption,
    SharedVec,
};
