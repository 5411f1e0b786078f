//! Common collection type aliases used throughout the engine

pub use slotmap::{new_key_type, Key, SlotMap};

/// Type alias for a generational handle-based storage map
pub type HandleMap<K, T> = SlotMap<K, T>;
