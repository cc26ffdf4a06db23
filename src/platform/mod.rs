//! Platform abstraction layer
//!
//! Wall-clock access lives behind [`time::Clock`] so score timestamps can be
//! pinned in tests.

pub mod time;

pub use time::{Clock, FixedClock, SystemClock};
