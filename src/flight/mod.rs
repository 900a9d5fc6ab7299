//! Flight Module
//!
//! Request coalescing so a burst of misses for one key triggers a single fetch.

mod group;

pub use group::{FlightGroup, DEFAULT_GRACE};
