//! Diaper and feeding quick records.

pub mod model;
pub mod storage;

pub use model::{DiaperChange, DiaperKind, FeedingRecord};
pub use storage::RecordStorage;
