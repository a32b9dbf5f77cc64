//! Summaries and reports over logged activity.
//!
//! Minutes are whole minutes of each finished session, summed. Open
//! sessions count as sessions but add no minutes until they are stopped.

pub mod history;
pub mod period;
pub mod report;
pub mod summary;

pub use history::{recent_history, HistoryEntry, HistoryKind};
pub use period::ReportPeriod;
pub use report::{DayBreakdown, PeriodReport};
pub use summary::{DailySummary, LastNursing};

use crate::features::session::TimedSession;

fn session_minutes(session: &TimedSession) -> i64 {
    if session.is_open() {
        0
    } else {
        session.duration_seconds.div_euclid(60)
    }
}
