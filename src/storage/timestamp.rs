//! Timestamp columns.
//!
//! Instants are stored as RFC 3339 text in UTC with millisecond precision,
//! so string order matches time order in range queries.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;

/// Render an instant for storage.
#[must_use]
pub fn to_sql(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored instant read from column `idx`.
///
/// # Errors
///
/// Returns a conversion error if the text is not RFC 3339.
pub fn from_sql(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Parse an optional stored instant read from column `idx`.
///
/// # Errors
///
/// Returns a conversion error if the text is present but not RFC 3339.
pub fn from_sql_opt(idx: usize, raw: Option<&str>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    raw.map(|s| from_sql(idx, s)).transpose()
}
