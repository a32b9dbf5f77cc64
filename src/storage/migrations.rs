//! Database migrations for babytrack.
//!
//! Each migration is a function that upgrades the schema by one version.
//! Migrations are run automatically when the database is opened.

use rusqlite::Connection;
use tracing::info;

use crate::error::TrackError;

/// Current schema version.
const CURRENT_VERSION: i32 = 1;

/// Get the current schema version from the database.
///
/// Returns 0 if no version has been set (new database).
pub fn get_version(conn: &Connection) -> Result<i32, TrackError> {
    let version: i32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| TrackError::Database(format!("Failed to get schema version: {e}")))?;

    Ok(version)
}

/// Set the schema version in the database.
fn set_version(conn: &Connection, version: i32) -> Result<(), TrackError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| TrackError::Database(format!("Failed to set schema version: {e}")))
}

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<(), TrackError> {
    let current = get_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(());
    }

    for version in (current + 1)..=CURRENT_VERSION {
        run_migration(conn, version)?;
        set_version(conn, version)?;
        info!(version, "schema migrated");
    }

    Ok(())
}

/// Run a specific migration.
fn run_migration(conn: &Connection, version: i32) -> Result<(), TrackError> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(TrackError::Database(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: Initial schema.
///
/// Creates tables for:
/// - `timed_sessions`: nursing and sleep sessions, open and closed
/// - `diaper_changes`: pee/poop records
/// - `feeding_records`: bottle feedings
fn migrate_v1(conn: &Connection) -> Result<(), TrackError> {
    conn.execute_batch(
        r"
        -- Nursing and sleep sessions
        CREATE TABLE IF NOT EXISTS timed_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            side TEXT,
            started_at TEXT NOT NULL,
            ended_at TEXT,
            accumulated_pause_ms INTEGER NOT NULL DEFAULT 0,
            pause_started_at TEXT,
            is_paused INTEGER NOT NULL DEFAULT 0,
            duration_seconds INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_timed_sessions_open
        ON timed_sessions(user_id, kind, ended_at);

        CREATE INDEX IF NOT EXISTS idx_timed_sessions_started
        ON timed_sessions(started_at);

        -- Diaper changes
        CREATE TABLE IF NOT EXISTS diaper_changes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_diaper_changes_created
        ON diaper_changes(user_id, created_at);

        -- Bottle feedings
        CREATE TABLE IF NOT EXISTS feeding_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_feeding_records_created
        ON feeding_records(user_id, created_at);
        ",
    )
    .map_err(|e| TrackError::Database(format!("Migration v1 failed: {e}")))
}
