//! Core abstractions for babytrack.
//!
//! This module provides shared utilities used across features.

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};
