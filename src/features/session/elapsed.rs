//! Elapsed-time reconstruction.
//!
//! Pure functions of a persisted record and an instant. Nothing here depends
//! on how often a caller asks, so a late tick shows the correct value.

use chrono::{DateTime, Utc};

use super::model::{TimedSession, TrackerState};

/// Active (unpaused) milliseconds of `session` as of `now`.
///
/// Open-running sessions count up to `now`; paused sessions stop at the
/// start of the current pause; closed sessions report their final duration.
#[must_use]
pub fn active_millis_at(session: &TimedSession, now: DateTime<Utc>) -> i64 {
    let millis = match session.state() {
        TrackerState::Closed => session.duration_seconds.saturating_mul(1000),
        TrackerState::Paused => match session.pause_started_at {
            Some(paused_at) => span_millis(session, paused_at),
            None => session.duration_seconds.saturating_mul(1000),
        },
        TrackerState::Running | TrackerState::Idle => span_millis(session, now),
    };
    millis.max(0)
}

/// Elapsed whole seconds for display.
///
/// Running sessions floor their active time; paused sessions report the
/// stored checkpoint; closed sessions report the final duration.
#[must_use]
pub fn elapsed_seconds_at(session: &TimedSession, now: DateTime<Utc>) -> i64 {
    match session.state() {
        TrackerState::Closed | TrackerState::Paused => session.duration_seconds,
        TrackerState::Running | TrackerState::Idle => floor_seconds(active_millis_at(session, now)),
    }
}

/// Whole seconds, rounding down.
#[must_use]
pub const fn floor_seconds(millis: i64) -> i64 {
    millis.div_euclid(1000)
}

/// Whole seconds, rounding half up.
#[must_use]
pub const fn round_seconds(millis: i64) -> i64 {
    (millis + 500).div_euclid(1000)
}

fn span_millis(session: &TimedSession, until: DateTime<Utc>) -> i64 {
    (until - session.started_at).num_milliseconds() - session.accumulated_pause_ms
}
