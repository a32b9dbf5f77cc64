//! Output formatting for babytrack.
//!
//! Every command renders either pretty (colored, human) or JSON output.

mod duration;
mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::TrackError;
use crate::features::report::{DailySummary, HistoryEntry, PeriodReport};
use crate::features::session::TrackerSnapshot;

pub use duration::{format_clock, format_duration, format_minutes};
pub use json::*;
pub use pretty::*;

/// Format a tracker status based on output format
///
/// # Errors
///
/// Returns `TrackError::Json` if JSON serialization fails.
pub fn format_status(
    snapshot: &TrackerSnapshot,
    format: OutputFormat,
) -> Result<String, TrackError> {
    match format {
        OutputFormat::Pretty => Ok(format_status_pretty(snapshot)),
        OutputFormat::Json => to_json(snapshot),
    }
}

/// Format a history listing based on output format
///
/// # Errors
///
/// Returns `TrackError::Json` if JSON serialization fails.
pub fn format_history(
    entries: &[HistoryEntry],
    format: OutputFormat,
) -> Result<String, TrackError> {
    match format {
        OutputFormat::Pretty => Ok(format_history_pretty(entries)),
        OutputFormat::Json => format_history_json(entries),
    }
}

/// Format today's summary based on output format
///
/// # Errors
///
/// Returns `TrackError::Json` if JSON serialization fails.
pub fn format_summary(summary: &DailySummary, format: OutputFormat) -> Result<String, TrackError> {
    match format {
        OutputFormat::Pretty => Ok(format_summary_pretty(summary)),
        OutputFormat::Json => to_json(summary),
    }
}

/// Format a period report based on output format
///
/// # Errors
///
/// Returns `TrackError::Json` if JSON serialization fails.
pub fn format_report(report: &PeriodReport, format: OutputFormat) -> Result<String, TrackError> {
    match format {
        OutputFormat::Pretty => Ok(format_report_pretty(report)),
        OutputFormat::Json => to_json(report),
    }
}
