//! Ring Module
//!
//! Consistent-hashing node selection.

mod hash_ring;

pub use hash_ring::{HashFn, HashRing, DEFAULT_REPLICAS};
