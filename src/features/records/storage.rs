//! Quick record storage.
//!
//! Persists diaper changes and feedings to the local database.

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use tracing::debug;

use super::model::{DiaperChange, DiaperKind, FeedingRecord};
use crate::error::TrackError;
use crate::storage::{timestamp, Database};

/// Storage for diaper and feeding records.
#[derive(Clone, Copy)]
pub struct RecordStorage<'db> {
    db: &'db Database,
}

impl<'db> RecordStorage<'db> {
    /// Create storage over an open database.
    #[must_use]
    pub const fn new(db: &'db Database) -> Self {
        Self { db }
    }

    /// Log a diaper change.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_diaper(
        &self,
        user_id: &str,
        kind: DiaperKind,
        at: DateTime<Utc>,
    ) -> Result<DiaperChange, TrackError> {
        let conn = self.db.connection();

        conn.execute(
            "INSERT INTO diaper_changes (user_id, kind, created_at) VALUES (?1, ?2, ?3)",
            params![user_id, kind.as_str(), timestamp::to_sql(at)],
        )
        .map_err(|e| TrackError::Database(format!("Failed to insert diaper change: {e}")))?;

        let id = conn.last_insert_rowid();
        debug!(id, %kind, "diaper change inserted");
        Ok(DiaperChange {
            id,
            user_id: user_id.to_string(),
            kind,
            created_at: at,
        })
    }

    /// Log a feeding.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_feeding(
        &self,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> Result<FeedingRecord, TrackError> {
        let conn = self.db.connection();

        conn.execute(
            "INSERT INTO feeding_records (user_id, created_at) VALUES (?1, ?2)",
            params![user_id, timestamp::to_sql(at)],
        )
        .map_err(|e| TrackError::Database(format!("Failed to insert feeding: {e}")))?;

        let id = conn.last_insert_rowid();
        debug!(id, "feeding inserted");
        Ok(FeedingRecord {
            id,
            user_id: user_id.to_string(),
            created_at: at,
        })
    }

    /// Most recent diaper changes, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn recent_diapers(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<DiaperChange>, TrackError> {
        self.query(
            "SELECT id, user_id, kind, created_at FROM diaper_changes
             WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC
             LIMIT ?2",
            params![user_id, sql_limit(limit)],
            row_to_diaper,
        )
    }

    /// Most recent feedings, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn recent_feedings(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<FeedingRecord>, TrackError> {
        self.query(
            "SELECT id, user_id, created_at FROM feeding_records
             WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC
             LIMIT ?2",
            params![user_id, sql_limit(limit)],
            row_to_feeding,
        )
    }

    /// Diaper changes logged in `[start, end)`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn diapers_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DiaperChange>, TrackError> {
        self.query(
            "SELECT id, user_id, kind, created_at FROM diaper_changes
             WHERE user_id = ?1 AND created_at >= ?2 AND created_at < ?3
             ORDER BY created_at ASC, id ASC",
            params![user_id, timestamp::to_sql(start), timestamp::to_sql(end)],
            row_to_diaper,
        )
    }

    /// Feedings logged in `[start, end)`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn feedings_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FeedingRecord>, TrackError> {
        self.query(
            "SELECT id, user_id, created_at FROM feeding_records
             WHERE user_id = ?1 AND created_at >= ?2 AND created_at < ?3
             ORDER BY created_at ASC, id ASC",
            params![user_id, timestamp::to_sql(start), timestamp::to_sql(end)],
            row_to_feeding,
        )
    }

    /// Delete a diaper change.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::NotFound`] if no such record exists.
    pub fn delete_diaper(&self, id: i64) -> Result<(), TrackError> {
        self.delete("diaper_changes", "diaper change", id)
    }

    /// Delete a feeding.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::NotFound`] if no such record exists.
    pub fn delete_feeding(&self, id: i64) -> Result<(), TrackError> {
        self.delete("feeding_records", "feeding", id)
    }

    fn query<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>, TrackError>
    where
        P: rusqlite::Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| TrackError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map(params, map)
            .map_err(|e| TrackError::Database(format!("Failed to query records: {e}")))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| TrackError::Database(format!("Failed to read records: {e}")))
    }

    fn delete(&self, table: &str, label: &str, id: i64) -> Result<(), TrackError> {
        let rows = self
            .db
            .connection()
            .execute(&format!("DELETE FROM {table} WHERE id = ?1"), [id])
            .map_err(|e| TrackError::Database(format!("Failed to delete {label}: {e}")))?;

        if rows == 0 {
            return Err(TrackError::NotFound(format!("{label} {id}")));
        }

        debug!(id, table, "record deleted");
        Ok(())
    }
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn row_to_diaper(row: &Row<'_>) -> rusqlite::Result<DiaperChange> {
    let kind: String = row.get(2)?;
    let created_at: String = row.get(3)?;

    Ok(DiaperChange {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: DiaperKind::parse(&kind).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                format!("unknown diaper kind {kind:?}").into(),
            )
        })?,
        created_at: timestamp::from_sql(3, &created_at)?,
    })
}

fn row_to_feeding(row: &Row<'_>) -> rusqlite::Result<FeedingRecord> {
    let created_at: String = row.get(2)?;

    Ok(FeedingRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        created_at: timestamp::from_sql(2, &created_at)?,
    })
}
