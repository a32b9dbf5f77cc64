//! Combined activity history.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::TrackError;
use crate::features::records::{DiaperChange, FeedingRecord, RecordStorage};
use crate::features::session::{ActivityKind, SqliteSessionStore, TimedSession};

/// Which records a history listing includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    /// Everything.
    #[default]
    All,
    /// Diaper changes only.
    Diaper,
    /// Bottle feedings only.
    Feeding,
    /// Nursing sessions only.
    Nursing,
    /// Sleep sessions only.
    Sleep,
}

/// One row of the history listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HistoryEntry {
    /// A diaper change.
    Diaper(DiaperChange),
    /// A bottle feeding.
    Feeding(FeedingRecord),
    /// A nursing or sleep session.
    Session(TimedSession),
}

impl HistoryEntry {
    /// When the entry happened (session start for sessions).
    #[must_use]
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Self::Diaper(d) => d.created_at,
            Self::Feeding(f) => f.created_at,
            Self::Session(s) => s.started_at,
        }
    }
}

/// The `limit` most recent entries of `kind`, newest first.
///
/// # Errors
///
/// Returns an error if any query fails.
pub fn recent_history(
    sessions: &SqliteSessionStore<'_>,
    records: &RecordStorage<'_>,
    user_id: &str,
    kind: HistoryKind,
    limit: usize,
) -> Result<Vec<HistoryEntry>, TrackError> {
    let mut entries = Vec::new();

    if matches!(kind, HistoryKind::All | HistoryKind::Diaper) {
        entries.extend(
            records
                .recent_diapers(user_id, limit)?
                .into_iter()
                .map(HistoryEntry::Diaper),
        );
    }
    if matches!(kind, HistoryKind::All | HistoryKind::Feeding) {
        entries.extend(
            records
                .recent_feedings(user_id, limit)?
                .into_iter()
                .map(HistoryEntry::Feeding),
        );
    }
    let session_kind = match kind {
        HistoryKind::All => Some(None),
        HistoryKind::Nursing => Some(Some(ActivityKind::Nursing)),
        HistoryKind::Sleep => Some(Some(ActivityKind::Sleep)),
        HistoryKind::Diaper | HistoryKind::Feeding => None,
    };
    if let Some(filter) = session_kind {
        entries.extend(
            sessions
                .recent(user_id, filter, limit)?
                .into_iter()
                .map(HistoryEntry::Session),
        );
    }

    entries.sort_by(|a, b| b.at().cmp(&a.at()));
    entries.truncate(limit);
    Ok(entries)
}
