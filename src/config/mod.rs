//! Configuration management for babytrack.
//!
//! This module handles loading configuration from `~/.babytrack/`.

mod paths;
mod settings;

pub use paths::{Paths, HOME_ENV};
pub use settings::{
    ColorSetting, Config, DashboardConfig, GeneralConfig, ReportsConfig, TimerConfig,
};
