//! Timed session tracking for nursing and sleep.
//!
//! - [`Tracker`]: the start/pause/resume/stop state machine
//! - [`SessionStore`]: the persistence port it writes through
//! - [`SqliteSessionStore`]: the local database adapter
//! - [`elapsed_seconds_at`]: elapsed time rebuilt from stored fields
//! - [`Ticker`]: redraw scheduling for live displays

pub mod elapsed;
pub mod model;
pub mod port;
pub mod storage;
pub mod ticker;
pub mod tracker;

pub use elapsed::{active_millis_at, elapsed_seconds_at};
pub use model::{
    Activity, ActivityKind, Command, NewSession, SessionId, SessionUpdate, Side, TimedSession,
    TrackerState,
};
pub use port::SessionStore;
pub use storage::SqliteSessionStore;
pub use ticker::Ticker;
pub use tracker::{Tracker, TrackerSnapshot};
