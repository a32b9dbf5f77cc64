//! Timed session storage.
//!
//! Implements the [`SessionStore`] port on the local database and adds the
//! history queries used by reports and the CLI.

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use tracing::{debug, warn};

use super::model::{
    Activity, ActivityKind, NewSession, SessionId, SessionUpdate, Side, TimedSession,
};
use super::port::SessionStore;
use crate::error::TrackError;
use crate::storage::{timestamp, Database};

const SESSION_COLUMNS: &str = "id, user_id, kind, side, started_at, ended_at, \
     accumulated_pause_ms, pause_started_at, is_paused, duration_seconds";

/// SQLite-backed session store.
#[derive(Clone, Copy)]
pub struct SqliteSessionStore<'db> {
    db: &'db Database,
}

impl<'db> SqliteSessionStore<'db> {
    /// Create a store over an open database.
    #[must_use]
    pub const fn new(db: &'db Database) -> Self {
        Self { db }
    }

    /// Get a session by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get(&self, id: SessionId) -> Result<Option<TimedSession>, TrackError> {
        let sql = format!("SELECT {SESSION_COLUMNS} FROM timed_sessions WHERE id = ?1");
        self.db
            .connection()
            .query_row(&sql, [id.0], row_to_session)
            .optional()
            .map_err(|e| unavailable("query session", &e))
    }

    /// Most recent sessions for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn recent(
        &self,
        user_id: &str,
        kind: Option<ActivityKind>,
        limit: usize,
    ) -> Result<Vec<TimedSession>, TrackError> {
        let conn = self.db.connection();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM timed_sessions
                 WHERE user_id = ?1 AND (?2 IS NULL OR kind = ?2)
                 ORDER BY started_at DESC, id DESC
                 LIMIT ?3"
            ))
            .map_err(|e| unavailable("prepare query", &e))?;

        let rows = stmt
            .query_map(params![user_id, kind.map(ActivityKind::as_str), limit], row_to_session)
            .map_err(|e| unavailable("query sessions", &e))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| unavailable("read sessions", &e))
    }

    /// Sessions that started in `[start, end)`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TimedSession>, TrackError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM timed_sessions
                 WHERE user_id = ?1 AND started_at >= ?2 AND started_at < ?3
                 ORDER BY started_at ASC, id ASC"
            ))
            .map_err(|e| unavailable("prepare query", &e))?;

        let rows = stmt
            .query_map(
                params![user_id, timestamp::to_sql(start), timestamp::to_sql(end)],
                row_to_session,
            )
            .map_err(|e| unavailable("query sessions", &e))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| unavailable("read sessions", &e))
    }

    /// The most recently closed session of `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn last_closed(
        &self,
        user_id: &str,
        kind: ActivityKind,
    ) -> Result<Option<TimedSession>, TrackError> {
        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM timed_sessions
             WHERE user_id = ?1 AND kind = ?2 AND ended_at IS NOT NULL
             ORDER BY ended_at DESC, id DESC
             LIMIT 1"
        );
        self.db
            .connection()
            .query_row(&sql, params![user_id, kind.as_str()], row_to_session)
            .optional()
            .map_err(|e| unavailable("query last session", &e))
    }
}

impl SessionStore for SqliteSessionStore<'_> {
    fn create_session(&self, new: &NewSession) -> Result<SessionId, TrackError> {
        let conn = self.db.connection();

        conn.execute(
            r"INSERT INTO timed_sessions
              (user_id, kind, side, started_at, accumulated_pause_ms, is_paused, duration_seconds)
              VALUES (?1, ?2, ?3, ?4, 0, 0, 0)",
            params![
                new.user_id,
                new.activity.kind().as_str(),
                new.activity.side().map(Side::as_str),
                timestamp::to_sql(new.started_at),
            ],
        )
        .map_err(|e| unavailable("insert session", &e))?;

        let id = SessionId(conn.last_insert_rowid());
        debug!(%id, kind = %new.activity.kind(), "session row inserted");
        Ok(id)
    }

    fn update_session(&self, id: SessionId, update: &SessionUpdate) -> Result<(), TrackError> {
        if update.is_empty() {
            return Ok(());
        }

        let mut columns: Vec<&str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(paused) = update.is_paused {
            columns.push("is_paused");
            values.push(Value::Integer(i64::from(paused)));
        }
        if let Some(pause_started_at) = update.pause_started_at {
            columns.push("pause_started_at");
            values.push(opt_timestamp(pause_started_at));
        }
        if let Some(accumulated) = update.accumulated_pause_ms {
            columns.push("accumulated_pause_ms");
            values.push(Value::Integer(accumulated));
        }
        if let Some(ended_at) = update.ended_at {
            columns.push("ended_at");
            values.push(opt_timestamp(ended_at));
        }
        if let Some(duration) = update.duration_seconds {
            columns.push("duration_seconds");
            values.push(Value::Integer(duration));
        }

        let assignments = columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{column} = ?{}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        // Closed rows are immutable except for a reopen, which only applies to them.
        let guard = if update.reopens() {
            "ended_at IS NOT NULL"
        } else {
            "ended_at IS NULL"
        };
        let sql = format!(
            "UPDATE timed_sessions SET {assignments} WHERE id = ?{} AND {guard}",
            columns.len() + 1
        );
        values.push(Value::Integer(id.0));

        let rows = self
            .db
            .connection()
            .execute(&sql, params_from_iter(values.iter()))
            .map_err(|e| unavailable("update session", &e))?;

        if rows == 0 {
            return Err(self.rejected_update(id, update));
        }

        debug!(%id, fields = %columns.join(","), "session row updated");
        Ok(())
    }

    fn find_open_session(
        &self,
        user_id: &str,
        kind: ActivityKind,
    ) -> Result<Option<TimedSession>, TrackError> {
        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM timed_sessions
             WHERE user_id = ?1 AND kind = ?2 AND ended_at IS NULL
             ORDER BY started_at DESC, id DESC
             LIMIT 1"
        );
        self.db
            .connection()
            .query_row(&sql, params![user_id, kind.as_str()], row_to_session)
            .optional()
            .map_err(|e| unavailable("query open session", &e))
    }

    fn delete_session(&self, id: SessionId) -> Result<(), TrackError> {
        let rows = self
            .db
            .connection()
            .execute("DELETE FROM timed_sessions WHERE id = ?1", [id.0])
            .map_err(|e| unavailable("delete session", &e))?;

        if rows == 0 {
            return Err(TrackError::NotFound(format!("session {id}")));
        }

        debug!(%id, "session row deleted");
        Ok(())
    }
}

impl SqliteSessionStore<'_> {
    /// Explain why a guarded update matched no row.
    fn rejected_update(&self, id: SessionId, update: &SessionUpdate) -> TrackError {
        match self.get(id) {
            Ok(None) => TrackError::NotFound(format!("session {id}")),
            Ok(Some(existing)) if update.reopens() => TrackError::Conflict {
                kind: existing.activity.kind(),
                id,
            },
            Ok(Some(_)) => {
                warn!(%id, "refused to update a closed session");
                TrackError::SessionClosed(id)
            }
            Err(err) => err,
        }
    }
}

fn opt_timestamp(at: Option<DateTime<Utc>>) -> Value {
    at.map_or(Value::Null, |t| Value::Text(timestamp::to_sql(t)))
}

fn unavailable(action: &str, err: &rusqlite::Error) -> TrackError {
    warn!(error = %err, "failed to {action}");
    TrackError::StorageUnavailable(format!("Failed to {action}: {err}"))
}

/// Convert a database row to a `TimedSession`.
fn row_to_session(row: &Row<'_>) -> rusqlite::Result<TimedSession> {
    let kind_str: String = row.get(2)?;
    let side_str: Option<String> = row.get(3)?;
    let started_at: String = row.get(4)?;
    let ended_at: Option<String> = row.get(5)?;
    let pause_started_at: Option<String> = row.get(7)?;

    let kind = ActivityKind::parse(&kind_str).ok_or_else(|| invalid_text(2, &kind_str))?;
    let side = match (kind, side_str.as_deref()) {
        (_, Some(s)) => Side::parse(s).ok_or_else(|| invalid_text(3, s))?,
        (ActivityKind::Nursing, None) => return Err(invalid_text(3, "NULL")),
        (ActivityKind::Sleep, None) => Side::default(),
    };

    Ok(TimedSession {
        id: SessionId(row.get(0)?),
        user_id: row.get(1)?,
        activity: Activity::new(kind, side),
        started_at: timestamp::from_sql(4, &started_at)?,
        ended_at: timestamp::from_sql_opt(5, ended_at.as_deref())?,
        accumulated_pause_ms: row.get(6)?,
        pause_started_at: timestamp::from_sql_opt(7, pause_started_at.as_deref())?,
        is_paused: row.get(8)?,
        duration_seconds: row.get(9)?,
    })
}

fn invalid_text(idx: usize, raw: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        format!("unexpected value {raw:?}").into(),
    )
}
