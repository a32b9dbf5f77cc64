//! Today's at-a-glance summary.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::period::{end_of_day, start_of_day};
use super::session_minutes;
use crate::error::TrackError;
use crate::features::records::{DiaperKind, RecordStorage};
use crate::features::session::{ActivityKind, Side, SqliteSessionStore, TimedSession};

/// The most recent finished nursing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastNursing {
    /// Side nursed.
    pub side: Side,
    /// Final duration in seconds.
    pub duration_seconds: i64,
    /// Start instant.
    pub started_at: DateTime<Utc>,
    /// Close instant.
    pub ended_at: DateTime<Utc>,
    /// Side to offer next.
    pub suggested_side: Side,
}

impl LastNursing {
    fn from_session(session: &TimedSession) -> Option<Self> {
        let side = session.activity.side()?;
        Some(Self {
            side,
            duration_seconds: session.duration_seconds,
            started_at: session.started_at,
            ended_at: session.ended_at?,
            suggested_side: side.opposite(),
        })
    }
}

/// Counts for one local day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    /// Local date summarized.
    pub date: NaiveDate,
    /// All diaper changes.
    pub diapers: usize,
    /// Wet diapers.
    pub pee: usize,
    /// Dirty diapers.
    pub poop: usize,
    /// Bottle feedings.
    pub feedings: usize,
    /// Nursing sessions started today, open ones included.
    pub nursing_sessions: usize,
    /// Whole minutes of finished nursing sessions.
    pub nursing_minutes: i64,
    /// Sleep sessions started today, open ones included.
    pub sleep_sessions: usize,
    /// Whole minutes of finished sleep sessions.
    pub sleep_minutes: i64,
    /// Last finished nursing session, any day.
    pub last_nursing: Option<LastNursing>,
}

impl DailySummary {
    /// Summarize the local day containing `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub fn today<Tz: TimeZone>(
        sessions: &SqliteSessionStore<'_>,
        records: &RecordStorage<'_>,
        user_id: &str,
        now: &DateTime<Tz>,
    ) -> Result<Self, TrackError> {
        let tz = now.timezone();
        let date = now.date_naive();
        let start = start_of_day(&tz, date).with_timezone(&Utc);
        let end = end_of_day(&tz, date).with_timezone(&Utc);

        let diapers = records.diapers_in_range(user_id, start, end)?;
        let feedings = records.feedings_in_range(user_id, start, end)?;
        let day_sessions = sessions.range(user_id, start, end)?;

        let pee = diapers.iter().filter(|d| d.kind == DiaperKind::Pee).count();
        let (nursing, sleep): (Vec<_>, Vec<_>) = day_sessions
            .iter()
            .partition(|s| s.activity.kind() == ActivityKind::Nursing);

        let last_nursing = sessions
            .last_closed(user_id, ActivityKind::Nursing)?
            .as_ref()
            .and_then(LastNursing::from_session);

        Ok(Self {
            date,
            diapers: diapers.len(),
            pee,
            poop: diapers.len() - pee,
            feedings: feedings.len(),
            nursing_sessions: nursing.len(),
            nursing_minutes: nursing.iter().copied().map(session_minutes).sum(),
            sleep_sessions: sleep.len(),
            sleep_minutes: sleep.iter().copied().map(session_minutes).sum(),
            last_nursing,
        })
    }
}
