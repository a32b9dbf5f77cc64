//! Configuration settings for babytrack.
//!
//! Settings are loaded from `~/.babytrack/config.yaml`. Every field has a
//! default, so partial files are fine.

use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::error::TrackError;
use crate::features::report::ReportPeriod;
use crate::features::session::Side;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Timer settings.
    pub timer: TimerConfig,
    /// Live dashboard settings.
    pub dashboard: DashboardConfig,
    /// Report settings.
    pub reports: ReportsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Owner of every record written.
    #[serde(default = "default_user_id")]
    pub user_id: String,
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

/// Timer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Redraw interval of live timers in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Side used by `nursing start` without `--side`.
    #[serde(default)]
    pub default_side: Side,
}

/// Live dashboard settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Seconds between summary refreshes.
    #[serde(default = "default_summary_refresh_secs")]
    pub summary_refresh_secs: u64,
}

/// Report settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportsConfig {
    /// Period used by `report` without an argument.
    #[serde(default)]
    pub default_period: ReportPeriod,
}

// Default value functions for serde
fn default_user_id() -> String {
    "local".to_string()
}

const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

fn default_log_level() -> String {
    "warn".to_string()
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

const fn default_summary_refresh_secs() -> u64 {
    30
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            default_output: default_output_format(),
            color: default_color(),
            log_level: default_log_level(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            default_side: Side::default(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            summary_refresh_secs: default_summary_refresh_secs(),
        }
    }
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, TrackError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            TrackError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            TrackError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), TrackError> {
        let contents = serde_yaml::to_string(self)
            .map_err(|e| TrackError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, contents).map_err(|e| {
            TrackError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }
}
