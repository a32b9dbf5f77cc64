//! `SQLite` database connection.
//!
//! The database is stored at `~/.babytrack/babytrack.db` and contains tables for:
//! - Nursing and sleep sessions
//! - Diaper changes
//! - Feeding records

use std::time::Duration;

use rusqlite::Connection;
use tracing::debug;

use crate::error::TrackError;

use super::migrations;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at a specific path.
    ///
    /// Creates the database file and runs migrations if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_at(path: &std::path::Path) -> Result<Self, TrackError> {
        let conn = Connection::open(path).map_err(|e| {
            TrackError::Database(format!("Failed to open database {}: {e}", path.display()))
        })?;

        // The dashboard and one-shot commands may hold the file at the same time
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(|e| TrackError::Database(format!("Failed to set busy timeout: {e}")))?;

        let db = Self { conn };
        db.migrate()?;
        debug!(path = %path.display(), "database opened");

        Ok(db)
    }

    /// Open an in-memory database (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_in_memory() -> Result<Self, TrackError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            TrackError::Database(format!("Failed to open in-memory database: {e}"))
        })?;

        let db = Self { conn };
        db.migrate()?;

        Ok(db)
    }

    /// Run database migrations.
    fn migrate(&self) -> Result<(), TrackError> {
        migrations::run(&self.conn)
    }

    /// Get the current schema version.
    ///
    /// # Errors
    ///
    /// Returns an error if the version cannot be read.
    pub fn schema_version(&self) -> Result<i32, TrackError> {
        migrations::get_version(&self.conn)
    }

    /// Get a reference to the underlying connection.
    ///
    /// Feature stores run their own statements through it.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}
