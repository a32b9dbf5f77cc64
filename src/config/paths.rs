//! Path resolution for babytrack configuration and data files.
//!
//! All babytrack data is stored in `~/.babytrack/` unless `BABYTRACK_HOME`
//! points somewhere else:
//! - `config.yaml` - Main configuration file
//! - `babytrack.db` - SQLite database for sessions and records

use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::TrackError;

/// Environment variable overriding the data root.
pub const HOME_ENV: &str = "BABYTRACK_HOME";

/// Paths to babytrack configuration and data files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Root directory: `~/.babytrack/`
    pub root: PathBuf,
    /// Config file: `~/.babytrack/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.babytrack/babytrack.db`
    pub database: PathBuf,
}

impl Paths {
    /// Resolve paths from `BABYTRACK_HOME`, else the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if neither variable is set.
    pub fn new() -> Result<Self, TrackError> {
        resolve_root(std::env::var_os(HOME_ENV), std::env::var_os("HOME")).map(Self::with_root)
    }

    /// Create paths with a custom root directory.
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("babytrack.db"),
            root,
        }
    }

    /// Ensure the root directory exists, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), TrackError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                TrackError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }
        Ok(())
    }
}

fn resolve_root(
    override_root: Option<OsString>,
    home: Option<OsString>,
) -> Result<PathBuf, TrackError> {
    if let Some(root) = override_root.filter(|r| !r.is_empty()) {
        return Ok(PathBuf::from(root));
    }
    home.filter(|h| !h.is_empty())
        .map(|h| PathBuf::from(h).join(".babytrack"))
        .ok_or_else(|| TrackError::Config("Could not determine home directory".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_with_root() {
        let root = PathBuf::from("/tmp/test-babytrack");
        let paths = Paths::with_root(root.clone());

        assert_eq!(paths.root, root);
        assert_eq!(paths.config_file, root.join("config.yaml"));
        assert_eq!(paths.database, root.join("babytrack.db"));
    }

    #[test]
    fn test_override_wins_over_home() {
        let root = resolve_root(Some("/data/baby".into()), Some("/home/me".into())).unwrap();
        assert_eq!(root, PathBuf::from("/data/baby"));
    }

    #[test]
    fn test_home_fallback() {
        let root = resolve_root(None, Some("/home/me".into())).unwrap();
        assert_eq!(root, PathBuf::from("/home/me/.babytrack"));

        let root = resolve_root(Some(OsString::new()), Some("/home/me".into())).unwrap();
        assert_eq!(root, PathBuf::from("/home/me/.babytrack"));
    }

    #[test]
    fn test_no_home() {
        assert!(matches!(resolve_root(None, None), Err(TrackError::Config(_))));
    }

    #[test]
    fn test_ensure_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("nested").join("root"));

        paths.ensure_dirs().unwrap();

        assert!(paths.root.exists());
    }
}
