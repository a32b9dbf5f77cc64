//! Command implementations for babytrack.
//!
//! Every handler returns the text to print, already rendered for the
//! requested output format.

mod records;
mod report;
mod session;
mod shell;

pub use records::{delete, history, log};
pub use report::{report, summary};
pub use session::{nursing, sleep, SessionAction};
pub use shell::completions;

use std::path::PathBuf;

use tracing::debug;

use crate::config::{Config, Paths};
use crate::core::SystemClock;
use crate::error::TrackError;
use crate::features::records::RecordStorage;
use crate::features::session::{ActivityKind, SqliteSessionStore, Tracker, TrackerState};
use crate::storage::Database;

/// Resolve the data directory from `--home`/`BABYTRACK_HOME` or `$HOME`.
///
/// # Errors
///
/// Returns an error if no home directory can be determined.
pub fn resolve_paths(home: Option<PathBuf>) -> Result<Paths, TrackError> {
    home.map_or_else(Paths::new, |root| Ok(Paths::with_root(root)))
}

/// Everything a command needs: paths, settings and the open database.
pub struct Context {
    /// Data directory layout.
    pub paths: Paths,
    /// Loaded settings.
    pub config: Config,
    db: Database,
}

impl Context {
    /// Create the data directory if needed and open the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or database cannot be opened.
    pub fn open(paths: Paths, config: Config) -> Result<Self, TrackError> {
        paths.ensure_dirs()?;
        let db = Database::open_at(&paths.database)?;
        debug!(root = %paths.root.display(), user = %config.general.user_id, "context ready");
        Ok(Self { paths, config, db })
    }

    /// The open database.
    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.db
    }

    /// Owner of every record written.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.config.general.user_id
    }

    /// Session store over the open database.
    #[must_use]
    pub const fn sessions(&self) -> SqliteSessionStore<'_> {
        SqliteSessionStore::new(&self.db)
    }

    /// Record storage over the open database.
    #[must_use]
    pub const fn records(&self) -> RecordStorage<'_> {
        RecordStorage::new(&self.db)
    }

    /// A tracker for `kind`, reattached to the open session if there is one.
    ///
    /// # Errors
    ///
    /// Returns an error if the open session cannot be queried.
    pub fn tracker(
        &self,
        kind: ActivityKind,
    ) -> Result<Tracker<SqliteSessionStore<'_>>, TrackError> {
        let tracker = Tracker::load(self.sessions(), SystemClock, self.user_id(), kind)?;
        if tracker.state() == TrackerState::Idle {
            Ok(tracker.with_side(self.config.timer.default_side))
        } else {
            Ok(tracker)
        }
    }
}
