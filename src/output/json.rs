//! JSON output formatting for babytrack.

use serde::Serialize;
use serde_json::json;

use crate::error::TrackError;
use crate::features::report::HistoryEntry;

/// Serialize any value as pretty JSON.
///
/// # Errors
///
/// Returns `TrackError::Json` if serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, TrackError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Format a history listing as JSON.
///
/// # Errors
///
/// Returns `TrackError::Json` if serialization fails.
pub fn format_history_json(entries: &[HistoryEntry]) -> Result<String, TrackError> {
    let output = json!({
        "count": entries.len(),
        "items": entries,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}
