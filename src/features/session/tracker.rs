//! The timed session tracker.
//!
//! One [`Tracker`] owns the lifecycle of one activity kind for one user:
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --resume--> Running
//!                    |                  |
//!                    +------stop--------+--> Closed --start--> Running
//! ```
//!
//! Every command writes through the [`SessionStore`] first and commits to
//! the in-memory record only after the store acknowledges, so a failed write
//! leaves the tracker exactly where it was.

use serde::Serialize;
use tracing::{info, warn};

use super::elapsed::{active_millis_at, elapsed_seconds_at, floor_seconds, round_seconds};
use super::model::{
    Activity, ActivityKind, Command, NewSession, SessionUpdate, Side, TimedSession, TrackerState,
};
use super::port::SessionStore;
use crate::core::{Clock, SystemClock};
use crate::error::TrackError;

/// Point-in-time view of a tracker for renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerSnapshot {
    /// Activity kind.
    pub kind: ActivityKind,
    /// Lifecycle state.
    pub state: TrackerState,
    /// Current or pending nursing side.
    pub side: Option<Side>,
    /// Elapsed active seconds.
    pub elapsed_seconds: i64,
    /// The held record.
    pub session: Option<TimedSession>,
}

/// State machine for one resumable timed activity.
pub struct Tracker<S, C = SystemClock> {
    store: S,
    clock: C,
    user_id: String,
    kind: ActivityKind,
    /// Side used by the next nursing `start()`.
    side: Side,
    session: Option<TimedSession>,
}

impl<S: SessionStore, C: Clock> Tracker<S, C> {
    /// Create an idle tracker.
    pub fn new(store: S, clock: C, user_id: impl Into<String>, kind: ActivityKind) -> Self {
        Self {
            store,
            clock,
            user_id: user_id.into(),
            kind,
            side: Side::default(),
            session: None,
        }
    }

    /// Create a tracker and adopt the user's open session, if the store has one.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried or the open record is
    /// inconsistent.
    pub fn load(
        store: S,
        clock: C,
        user_id: impl Into<String>,
        kind: ActivityKind,
    ) -> Result<Self, TrackError> {
        let mut tracker = Self::new(store, clock, user_id, kind);
        if let Some(record) = tracker.store.find_open_session(&tracker.user_id, kind)? {
            tracker.reattach(record)?;
        }
        Ok(tracker)
    }

    /// Choose the side for the next nursing session.
    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TrackerState {
        self.session
            .as_ref()
            .map_or(TrackerState::Idle, TimedSession::state)
    }

    /// Activity kind this tracker owns.
    pub const fn kind(&self) -> ActivityKind {
        self.kind
    }

    /// User the sessions belong to.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The held session record: open, or the last one closed here.
    pub const fn session(&self) -> Option<&TimedSession> {
        self.session.as_ref()
    }

    /// Nursing side shown to the user; `None` for sleep.
    ///
    /// While a session is open this is its side, otherwise the side the next
    /// `start()` will use.
    pub fn current_side(&self) -> Option<Side> {
        match self.kind {
            ActivityKind::Sleep => None,
            ActivityKind::Nursing => Some(
                self.session
                    .as_ref()
                    .filter(|s| s.is_open())
                    .and_then(|s| s.activity.side())
                    .unwrap_or(self.side),
            ),
        }
    }

    /// Elapsed active seconds, re-derived from timestamps on every call.
    pub fn elapsed_seconds(&self) -> i64 {
        self.session
            .as_ref()
            .map_or(0, |s| elapsed_seconds_at(s, self.clock.now()))
    }

    /// Capture everything a renderer needs in one read of the clock.
    pub fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            kind: self.kind,
            state: self.state(),
            side: self.current_side(),
            elapsed_seconds: self.elapsed_seconds(),
            session: self.session.clone(),
        }
    }

    /// Open a new session.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::Conflict`] if this tracker or the store already
    /// holds an open session of this kind, or a storage error.
    pub fn start(&mut self) -> Result<&TimedSession, TrackError> {
        if let Some(open) = self.session.as_ref().filter(|s| s.is_open()) {
            return Err(TrackError::Conflict {
                kind: self.kind,
                id: open.id,
            });
        }

        // Query-then-insert: two devices racing can both pass this check.
        if let Some(open) = self.store.find_open_session(&self.user_id, self.kind)? {
            warn!(kind = %self.kind, id = %open.id, "start refused, session already open");
            return Err(TrackError::Conflict {
                kind: self.kind,
                id: open.id,
            });
        }

        let new = NewSession {
            user_id: self.user_id.clone(),
            activity: Activity::new(self.kind, self.side),
            started_at: self.clock.now(),
        };
        let id = self.store.create_session(&new).map_err(|err| {
            warn!(kind = %self.kind, error = %err, "start failed");
            err
        })?;

        info!(kind = %self.kind, %id, side = ?new.activity.side(), "session started");
        Ok(self.session.insert(TimedSession::opened(id, new)))
    }

    /// Freeze the running session at a checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::InvalidTransition`] unless running, or a storage
    /// error.
    pub fn pause(&mut self) -> Result<&TimedSession, TrackError> {
        let session = self.expect_state(Command::Pause, &[TrackerState::Running])?;
        let now = self.clock.now();

        let update = SessionUpdate {
            is_paused: Some(true),
            pause_started_at: Some(Some(now)),
            duration_seconds: Some(floor_seconds(active_millis_at(session, now))),
            ..SessionUpdate::default()
        };
        self.commit(Command::Pause, &update)
    }

    /// Continue a paused session, adding the pause to the accumulated total.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::InvalidTransition`] unless paused, or a storage
    /// error.
    pub fn resume(&mut self) -> Result<&TimedSession, TrackError> {
        let session = self.expect_state(Command::Resume, &[TrackerState::Paused])?;
        let now = self.clock.now();

        let paused_for = session
            .pause_started_at
            .map_or(0, |paused_at| (now - paused_at).num_milliseconds().max(0));

        let update = SessionUpdate {
            is_paused: Some(false),
            pause_started_at: Some(None),
            accumulated_pause_ms: Some(session.accumulated_pause_ms + paused_for),
            ..SessionUpdate::default()
        };
        self.commit(Command::Resume, &update)
    }

    /// Close the session and fix its final duration.
    ///
    /// Stopping while paused keeps the duration frozen at the pause
    /// checkpoint; the unfinished pause is not added to the accumulated total.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::InvalidTransition`] unless running or paused, or
    /// a storage error.
    pub fn stop(&mut self) -> Result<TimedSession, TrackError> {
        let session = self.expect_state(
            Command::Stop,
            &[TrackerState::Running, TrackerState::Paused],
        )?;
        let now = self.clock.now();

        let mut update = SessionUpdate {
            ended_at: Some(Some(now)),
            duration_seconds: Some(round_seconds(active_millis_at(session, now))),
            ..SessionUpdate::default()
        };
        if session.is_paused {
            update.is_paused = Some(false);
            update.pause_started_at = Some(None);
        }

        self.commit(Command::Stop, &update).cloned()
    }

    /// Change nursing side.
    ///
    /// While running, closes the current side's session and opens one on the
    /// opposite side, returning the closed record. Otherwise flips the side
    /// the next `start()` will use.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::InvalidArgument`] for sleep trackers, or any
    /// error from the implied `stop()`/`start()`. When the new side cannot be
    /// opened, the closed session is reopened and the tracker keeps running on
    /// the old side. If that reopen fails too, the tracker holds the closed
    /// record, available through [`Tracker::session`].
    pub fn switch_side(&mut self) -> Result<Option<TimedSession>, TrackError> {
        if self.kind != ActivityKind::Nursing {
            return Err(TrackError::InvalidArgument(format!(
                "{} sessions have no side",
                self.kind
            )));
        }

        if self.state() == TrackerState::Running {
            let before = self.session.clone();
            let before_side = self.side;

            let closed = self.stop()?;
            self.side = closed.activity.side().unwrap_or(self.side).opposite();
            match self.start().map(|_| ()) {
                Ok(()) => Ok(Some(closed)),
                Err(err) => {
                    if let Some(before) = before {
                        self.undo_switch(before, before_side, &err);
                    }
                    Err(err)
                }
            }
        } else {
            self.side = self.side.opposite();
            info!(side = %self.side, "next side switched");
            Ok(None)
        }
    }

    /// Adopt an open persisted session, e.g. after a restart.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::InvalidTransition`] if a session is already open
    /// here, or [`TrackError::InvalidArgument`] if the record is closed,
    /// belongs elsewhere, or has inconsistent pause fields.
    pub fn reattach(&mut self, record: TimedSession) -> Result<(), TrackError> {
        let state = self.state();
        if matches!(state, TrackerState::Running | TrackerState::Paused) {
            return Err(TrackError::InvalidTransition {
                command: Command::Reattach,
                state,
            });
        }
        if !record.is_open() {
            return Err(TrackError::InvalidArgument(format!(
                "session {} is already closed",
                record.id
            )));
        }
        if record.activity.kind() != self.kind {
            return Err(TrackError::InvalidArgument(format!(
                "session {} is a {} session, not {}",
                record.id,
                record.activity.kind(),
                self.kind
            )));
        }
        if record.user_id != self.user_id {
            return Err(TrackError::InvalidArgument(format!(
                "session {} belongs to another user",
                record.id
            )));
        }
        if record.is_paused != record.pause_started_at.is_some() {
            return Err(TrackError::InvalidArgument(format!(
                "session {} has inconsistent pause fields",
                record.id
            )));
        }

        if let Some(side) = record.activity.side() {
            self.side = side;
        }
        info!(kind = %self.kind, id = %record.id, state = %record.state(), "session reattached");
        self.session = Some(record);
        Ok(())
    }

    /// Delete the open session and return to idle.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::InvalidTransition`] unless running or paused, or
    /// a storage error.
    pub fn discard(&mut self) -> Result<TimedSession, TrackError> {
        let discarded = self
            .expect_state(
                Command::Discard,
                &[TrackerState::Running, TrackerState::Paused],
            )?
            .clone();

        self.store.delete_session(discarded.id).map_err(|err| {
            warn!(kind = %self.kind, id = %discarded.id, error = %err, "discard failed");
            err
        })?;

        info!(kind = %self.kind, id = %discarded.id, "session discarded");
        self.session = None;
        Ok(discarded)
    }

    fn expect_state(
        &self,
        command: Command,
        allowed: &[TrackerState],
    ) -> Result<&TimedSession, TrackError> {
        let state = self.state();
        match self.session.as_ref() {
            Some(session) if allowed.contains(&state) => Ok(session),
            _ => Err(TrackError::InvalidTransition { command, state }),
        }
    }

    /// Reopen the session a failed switch closed.
    fn undo_switch(&mut self, before: TimedSession, before_side: Side, cause: &TrackError) {
        // Another device opened a session meanwhile; reopening ours would make two.
        if matches!(cause, TrackError::Conflict { .. }) {
            warn!(id = %before.id, "switch interrupted by another open session");
            return;
        }

        let reopen = SessionUpdate {
            ended_at: Some(None),
            duration_seconds: Some(before.duration_seconds),
            ..SessionUpdate::default()
        };
        match self.store.update_session(before.id, &reopen) {
            Ok(()) => {
                warn!(id = %before.id, error = %cause, "switch failed, previous side reopened");
                self.side = before_side;
                self.session = Some(before);
            }
            Err(err) => {
                warn!(id = %before.id, error = %err, "switch failed, previous side left closed");
            }
        }
    }

    fn commit(
        &mut self,
        command: Command,
        update: &SessionUpdate,
    ) -> Result<&TimedSession, TrackError> {
        let Some(current) = self.session.as_ref() else {
            return Err(TrackError::InvalidTransition {
                command,
                state: TrackerState::Idle,
            });
        };

        let mut next = current.clone();
        update.apply_to(&mut next);

        if let Err(err) = self.store.update_session(next.id, update) {
            warn!(
                kind = %self.kind,
                id = %next.id,
                %command,
                error = %err,
                "write failed, state kept"
            );
            return Err(match err {
                TrackError::SessionClosed(_) => TrackError::InvalidTransition {
                    command,
                    state: TrackerState::Closed,
                },
                other => other,
            });
        }

        info!(kind = %self.kind, id = %next.id, state = %next.state(), "session {command}");
        Ok(self.session.insert(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;
    use crate::features::session::port::MockSessionStore;
    use crate::features::session::storage::SqliteSessionStore;
    use crate::features::session::SessionId;
    use crate::storage::Database;
    use chrono::{Duration, TimeZone, Utc};

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2024, 7, 14, 3, 0, 0).unwrap())
    }

    fn offline() -> TrackError {
        TrackError::StorageUnavailable("offline".to_string())
    }

    #[test]
    fn test_idle_defaults() {
        let db = Database::open_in_memory().unwrap();
        let tracker =
            Tracker::new(SqliteSessionStore::new(&db), clock(), "local", ActivityKind::Nursing);

        assert_eq!(tracker.state(), TrackerState::Idle);
        assert_eq!(tracker.elapsed_seconds(), 0);
        assert_eq!(tracker.current_side(), Some(Side::Left));
        assert!(tracker.session().is_none());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let db = Database::open_in_memory().unwrap();
        let clock = clock();
        let mut tracker = Tracker::new(
            SqliteSessionStore::new(&db),
            clock.clone(),
            "local",
            ActivityKind::Nursing,
        )
        .with_side(Side::Right);

        tracker.start().unwrap();
        clock.advance_secs(75);
        let snapshot = tracker.snapshot();

        assert_eq!(snapshot.kind, ActivityKind::Nursing);
        assert_eq!(snapshot.state, TrackerState::Running);
        assert_eq!(snapshot.side, Some(Side::Right));
        assert_eq!(snapshot.elapsed_seconds, 75);
        assert!(snapshot.session.is_some());
    }

    #[test]
    fn test_pause_resume_stop_scenario() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteSessionStore::new(&db);
        let clock = clock();
        let mut tracker = Tracker::new(store, clock.clone(), "local", ActivityKind::Sleep);

        tracker.start().unwrap();
        clock.advance_secs(10);
        tracker.pause().unwrap();
        assert_eq!(tracker.elapsed_seconds(), 10);

        clock.advance_secs(100);
        assert_eq!(tracker.elapsed_seconds(), 10);
        tracker.resume().unwrap();

        clock.advance_secs(5);
        let closed = tracker.stop().unwrap();

        assert_eq!(closed.duration_seconds, 15);
        assert_eq!(closed.accumulated_pause_ms, 100_000);
        assert_eq!(tracker.state(), TrackerState::Closed);
        assert_eq!(tracker.elapsed_seconds(), 15);

        let persisted = store.get(closed.id).unwrap().unwrap();
        assert_eq!(persisted, closed);
    }

    #[test]
    fn test_resume_continues_from_pause_value() {
        let db = Database::open_in_memory().unwrap();
        let clock = clock();
        let mut tracker =
            Tracker::new(SqliteSessionStore::new(&db), clock.clone(), "local", ActivityKind::Sleep);

        tracker.start().unwrap();
        for (run, rest) in [(7, 30), (3, 600), (12, 1)] {
            clock.advance_secs(run);
            let before_pause = tracker.elapsed_seconds();
            tracker.pause().unwrap();
            clock.advance_secs(rest);
            tracker.resume().unwrap();
            assert_eq!(tracker.elapsed_seconds(), before_pause);
        }
        assert_eq!(tracker.elapsed_seconds(), 22);
    }

    #[test]
    fn test_pause_twice_is_rejected_and_keeps_accumulated_pause() {
        let db = Database::open_in_memory().unwrap();
        let clock = clock();
        let mut tracker =
            Tracker::new(SqliteSessionStore::new(&db), clock.clone(), "local", ActivityKind::Sleep);

        tracker.start().unwrap();
        clock.advance_secs(4);
        tracker.pause().unwrap();
        let first = tracker.session().unwrap().clone();

        clock.advance_secs(20);
        let err = tracker.pause().unwrap_err();

        assert!(matches!(
            err,
            TrackError::InvalidTransition {
                command: Command::Pause,
                state: TrackerState::Paused
            }
        ));
        assert_eq!(tracker.session().unwrap(), &first);
        assert_eq!(tracker.session().unwrap().accumulated_pause_ms, 0);
    }

    #[test]
    fn test_invalid_transitions_from_idle() {
        let db = Database::open_in_memory().unwrap();
        let mut tracker =
            Tracker::new(SqliteSessionStore::new(&db), clock(), "local", ActivityKind::Sleep);

        assert!(matches!(tracker.pause(), Err(TrackError::InvalidTransition { .. })));
        assert!(matches!(tracker.resume(), Err(TrackError::InvalidTransition { .. })));
        assert!(matches!(tracker.stop(), Err(TrackError::InvalidTransition { .. })));
        assert!(matches!(tracker.discard(), Err(TrackError::InvalidTransition { .. })));
        assert_eq!(tracker.state(), TrackerState::Idle);
    }

    #[test]
    fn test_resume_while_running_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let mut tracker =
            Tracker::new(SqliteSessionStore::new(&db), clock(), "local", ActivityKind::Sleep);
        tracker.start().unwrap();

        let err = tracker.resume().unwrap_err();
        assert_eq!(err.to_string(), "cannot resume while running");
    }

    #[test]
    fn test_stop_while_paused_keeps_checkpoint() {
        let db = Database::open_in_memory().unwrap();
        let clock = clock();
        let mut tracker =
            Tracker::new(SqliteSessionStore::new(&db), clock.clone(), "local", ActivityKind::Sleep);

        tracker.start().unwrap();
        clock.advance_secs(10);
        tracker.pause().unwrap();
        clock.advance_secs(50);
        let closed = tracker.stop().unwrap();

        assert_eq!(closed.duration_seconds, 10);
        assert_eq!(closed.accumulated_pause_ms, 0);
        assert!(!closed.is_paused);
        assert!(closed.pause_started_at.is_none());
        assert_eq!(closed.ended_at, Some(clock.now()));
    }

    #[test]
    fn test_final_duration_rounds_to_nearest_second() {
        let db = Database::open_in_memory().unwrap();
        let clock = clock();
        let mut tracker =
            Tracker::new(SqliteSessionStore::new(&db), clock.clone(), "local", ActivityKind::Sleep);

        tracker.start().unwrap();
        clock.advance(Duration::milliseconds(59_600));
        assert_eq!(tracker.elapsed_seconds(), 59);

        let closed = tracker.stop().unwrap();
        assert_eq!(closed.duration_seconds, 60);
    }

    #[test]
    fn test_start_conflicts_with_open_session_of_same_kind() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteSessionStore::new(&db);
        let clock = clock();

        let mut first = Tracker::new(store, clock.clone(), "local", ActivityKind::Nursing);
        let open_id = first.start().unwrap().id;

        let err = first.start().unwrap_err();
        assert!(matches!(err, TrackError::Conflict { id, .. } if id == open_id));

        let mut other_device = Tracker::new(store, clock.clone(), "local", ActivityKind::Nursing);
        let err = other_device.start().unwrap_err();
        assert!(matches!(
            err,
            TrackError::Conflict { kind: ActivityKind::Nursing, id } if id == open_id
        ));
        assert_eq!(other_device.state(), TrackerState::Idle);

        let mut sleep = Tracker::new(store, clock, "local", ActivityKind::Sleep);
        sleep.start().unwrap();
        assert_eq!(sleep.state(), TrackerState::Running);
    }

    #[test]
    fn test_start_again_after_stop() {
        let db = Database::open_in_memory().unwrap();
        let clock = clock();
        let mut tracker =
            Tracker::new(SqliteSessionStore::new(&db), clock.clone(), "local", ActivityKind::Sleep);

        let first = tracker.start().unwrap().id;
        clock.advance_secs(30);
        tracker.stop().unwrap();

        clock.advance_secs(30);
        let second = tracker.start().unwrap().id;
        assert_ne!(first, second);
        assert_eq!(tracker.state(), TrackerState::Running);
        assert_eq!(tracker.elapsed_seconds(), 0);
    }

    #[test]
    fn test_switch_side_while_running() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteSessionStore::new(&db);
        let clock = clock();
        let mut tracker = Tracker::new(store, clock.clone(), "local", ActivityKind::Nursing);

        tracker.start().unwrap();
        clock.advance_secs(30);
        let closed = tracker.switch_side().unwrap().unwrap();

        assert_eq!(closed.activity, Activity::Nursing { side: Side::Left });
        assert_eq!(closed.duration_seconds, 30);
        assert!(!closed.is_open());

        assert_eq!(tracker.state(), TrackerState::Running);
        assert_eq!(tracker.current_side(), Some(Side::Right));
        assert_eq!(tracker.elapsed_seconds(), 0);

        let open = store
            .find_open_session("local", ActivityKind::Nursing)
            .unwrap()
            .unwrap();
        assert_eq!(open.activity, Activity::Nursing { side: Side::Right });
    }

    #[test]
    fn test_switch_side_while_idle_only_flips() {
        let db = Database::open_in_memory().unwrap();
        let mut tracker =
            Tracker::new(SqliteSessionStore::new(&db), clock(), "local", ActivityKind::Nursing);

        assert!(tracker.switch_side().unwrap().is_none());
        assert_eq!(tracker.current_side(), Some(Side::Right));
        assert_eq!(tracker.state(), TrackerState::Idle);

        tracker.start().unwrap();
        assert_eq!(
            tracker.session().unwrap().activity,
            Activity::Nursing { side: Side::Right }
        );
    }

    #[test]
    fn test_switch_side_while_paused_keeps_open_session_side() {
        let db = Database::open_in_memory().unwrap();
        let clock = clock();
        let mut tracker = Tracker::new(
            SqliteSessionStore::new(&db),
            clock.clone(),
            "local",
            ActivityKind::Nursing,
        );

        tracker.start().unwrap();
        clock.advance_secs(12);
        tracker.pause().unwrap();

        assert!(tracker.switch_side().unwrap().is_none());
        assert_eq!(tracker.state(), TrackerState::Paused);
        assert_eq!(tracker.current_side(), Some(Side::Left));

        tracker.stop().unwrap();
        assert_eq!(tracker.current_side(), Some(Side::Right));
    }

    #[test]
    fn test_switch_side_rejected_for_sleep() {
        let db = Database::open_in_memory().unwrap();
        let mut tracker =
            Tracker::new(SqliteSessionStore::new(&db), clock(), "local", ActivityKind::Sleep);

        assert!(matches!(
            tracker.switch_side(),
            Err(TrackError::InvalidArgument(_))
        ));
        assert_eq!(tracker.current_side(), None);
    }

    #[test]
    fn test_reattach_running_matches_uninterrupted_tracker() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteSessionStore::new(&db);
        let clock = clock();

        let mut original = Tracker::new(store, clock.clone(), "local", ActivityKind::Sleep);
        original.start().unwrap();
        clock.advance_secs(8);
        original.pause().unwrap();
        clock.advance_secs(40);
        original.resume().unwrap();
        clock.advance(Duration::milliseconds(33_700));

        let reloaded = Tracker::load(store, clock.clone(), "local", ActivityKind::Sleep).unwrap();

        assert_eq!(reloaded.state(), TrackerState::Running);
        assert!((reloaded.elapsed_seconds() - original.elapsed_seconds()).abs() <= 1);
        assert_eq!(reloaded.elapsed_seconds(), 41);
    }

    #[test]
    fn test_reattach_paused_reports_frozen_checkpoint() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteSessionStore::new(&db);
        let clock = clock();

        let mut original = Tracker::new(store, clock.clone(), "local", ActivityKind::Nursing)
            .with_side(Side::Right);
        original.start().unwrap();
        clock.advance_secs(20);
        original.pause().unwrap();
        drop(original);

        clock.advance(Duration::hours(6));
        let mut reloaded =
            Tracker::load(store, clock.clone(), "local", ActivityKind::Nursing).unwrap();

        assert_eq!(reloaded.state(), TrackerState::Paused);
        assert_eq!(reloaded.elapsed_seconds(), 20);
        assert_eq!(reloaded.current_side(), Some(Side::Right));

        reloaded.resume().unwrap();
        clock.advance_secs(5);
        assert_eq!(reloaded.elapsed_seconds(), 25);
        assert_eq!(
            reloaded.session().unwrap().accumulated_pause_ms,
            Duration::hours(6).num_milliseconds()
        );
    }

    #[test]
    fn test_load_without_open_session_is_idle() {
        let db = Database::open_in_memory().unwrap();
        let tracker = Tracker::load(
            SqliteSessionStore::new(&db),
            clock(),
            "local",
            ActivityKind::Sleep,
        )
        .unwrap();
        assert_eq!(tracker.state(), TrackerState::Idle);
    }

    #[test]
    fn test_reattach_rejects_bad_records() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteSessionStore::new(&db);
        let clock = clock();

        let mut source = Tracker::new(store, clock.clone(), "local", ActivityKind::Sleep);
        let mut record = source.start().unwrap().clone();

        let mut nursing = Tracker::new(store, clock.clone(), "local", ActivityKind::Nursing);
        assert!(matches!(
            nursing.reattach(record.clone()),
            Err(TrackError::InvalidArgument(_))
        ));

        let mut stranger = Tracker::new(store, clock.clone(), "other", ActivityKind::Sleep);
        assert!(matches!(
            stranger.reattach(record.clone()),
            Err(TrackError::InvalidArgument(_))
        ));

        let mut fresh = Tracker::new(store, clock.clone(), "local", ActivityKind::Sleep);
        record.is_paused = true;
        assert!(matches!(
            fresh.reattach(record.clone()),
            Err(TrackError::InvalidArgument(_))
        ));

        record.is_paused = false;
        record.ended_at = Some(clock.now());
        assert!(matches!(
            fresh.reattach(record),
            Err(TrackError::InvalidArgument(_))
        ));
        assert_eq!(fresh.state(), TrackerState::Idle);

        let open = source.session().unwrap().clone();
        assert!(matches!(
            source.reattach(open),
            Err(TrackError::InvalidTransition {
                command: Command::Reattach,
                ..
            })
        ));
    }

    #[test]
    fn test_discard_deletes_open_session() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteSessionStore::new(&db);
        let mut tracker = Tracker::new(store, clock(), "local", ActivityKind::Sleep);

        let id = tracker.start().unwrap().id;
        let discarded = tracker.discard().unwrap();

        assert_eq!(discarded.id, id);
        assert_eq!(tracker.state(), TrackerState::Idle);
        assert!(store.get(id).unwrap().is_none());
    }

    #[test]
    fn test_start_failure_leaves_tracker_idle() {
        let mut store = MockSessionStore::new();
        store.expect_find_open_session().returning(|_, _| Ok(None));
        store
            .expect_create_session()
            .times(1)
            .returning(|_| Err(offline()));

        let mut tracker = Tracker::new(store, clock(), "local", ActivityKind::Sleep);
        let err = tracker.start().unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(tracker.state(), TrackerState::Idle);
        assert!(tracker.session().is_none());
    }

    #[test]
    fn test_open_query_failure_is_reported() {
        let mut store = MockSessionStore::new();
        store
            .expect_find_open_session()
            .returning(|_, _| Err(offline()));
        store.expect_create_session().never();

        let mut tracker = Tracker::new(store, clock(), "local", ActivityKind::Sleep);
        assert!(matches!(
            tracker.start(),
            Err(TrackError::StorageUnavailable(_))
        ));
    }

    #[test]
    fn test_failed_pause_keeps_running_state() {
        let mut store = MockSessionStore::new();
        store.expect_find_open_session().returning(|_, _| Ok(None));
        store
            .expect_create_session()
            .returning(|_| Ok(SessionId(1)));
        store
            .expect_update_session()
            .times(1)
            .returning(|_, _| Err(offline()));

        let clock = clock();
        let mut tracker = Tracker::new(store, clock.clone(), "local", ActivityKind::Sleep);
        tracker.start().unwrap();
        clock.advance_secs(10);

        assert!(tracker.pause().is_err());
        assert_eq!(tracker.state(), TrackerState::Running);
        assert!(!tracker.session().unwrap().is_paused);

        clock.advance_secs(5);
        assert_eq!(tracker.elapsed_seconds(), 15);
    }

    #[test]
    fn test_failed_resume_keeps_paused_state() {
        let mut store = MockSessionStore::new();
        store.expect_find_open_session().returning(|_, _| Ok(None));
        store
            .expect_create_session()
            .returning(|_| Ok(SessionId(2)));
        store
            .expect_update_session()
            .withf(|_, update| update.is_paused == Some(true))
            .times(1)
            .returning(|_, _| Ok(()));
        store
            .expect_update_session()
            .withf(|_, update| update.is_paused == Some(false))
            .times(1)
            .returning(|_, _| Err(offline()));

        let clock = clock();
        let mut tracker = Tracker::new(store, clock.clone(), "local", ActivityKind::Sleep);
        tracker.start().unwrap();
        clock.advance_secs(20);
        tracker.pause().unwrap();
        clock.advance_secs(100);

        assert!(matches!(tracker.resume(), Err(TrackError::StorageUnavailable(_))));
        assert_eq!(tracker.state(), TrackerState::Paused);
        assert_eq!(tracker.session().unwrap().accumulated_pause_ms, 0);
        assert_eq!(tracker.elapsed_seconds(), 20);
    }

    fn switching_store(reopen: Result<(), TrackError>) -> MockSessionStore {
        let mut store = MockSessionStore::new();
        store.expect_find_open_session().returning(|_, _| Ok(None));
        let mut created = 0;
        store.expect_create_session().times(2).returning(move |_| {
            created += 1;
            if created == 1 {
                Ok(SessionId(1))
            } else {
                Err(offline())
            }
        });
        store
            .expect_update_session()
            .withf(|id, update| *id == SessionId(1) && matches!(update.ended_at, Some(Some(_))))
            .times(1)
            .returning(|_, _| Ok(()));
        let mut reopen = Some(reopen);
        store
            .expect_update_session()
            .withf(|id, update| *id == SessionId(1) && update.reopens())
            .times(1)
            .returning(move |_, _| reopen.take().unwrap_or(Ok(())));
        store
    }

    #[test]
    fn test_switch_side_failure_reopens_previous_side() {
        let clock = clock();
        let store = switching_store(Ok(()));
        let mut tracker = Tracker::new(store, clock.clone(), "local", ActivityKind::Nursing);
        tracker.start().unwrap();
        clock.advance_secs(30);

        let err = tracker.switch_side().unwrap_err();
        assert!(matches!(err, TrackError::StorageUnavailable(_)));

        assert_eq!(tracker.state(), TrackerState::Running);
        assert_eq!(tracker.current_side(), Some(Side::Left));
        let session = tracker.session().unwrap();
        assert_eq!(session.id, SessionId(1));
        assert!(session.is_open());
        assert_eq!(tracker.elapsed_seconds(), 30);
    }

    #[test]
    fn test_switch_side_failed_reopen_holds_closed_record() {
        let clock = clock();
        let store = switching_store(Err(offline()));
        let mut tracker = Tracker::new(store, clock.clone(), "local", ActivityKind::Nursing);
        tracker.start().unwrap();
        clock.advance_secs(30);

        assert!(tracker.switch_side().is_err());

        assert_eq!(tracker.state(), TrackerState::Closed);
        let closed = tracker.session().unwrap();
        assert_eq!(closed.id, SessionId(1));
        assert_eq!(closed.duration_seconds, 30);
        assert_eq!(closed.activity, Activity::Nursing { side: Side::Left });
    }

    #[test]
    fn test_stale_tracker_cannot_rewrite_closed_session() {
        let db = Database::open_in_memory().unwrap();
        let store = SqliteSessionStore::new(&db);
        let clock = clock();

        let mut dashboard = Tracker::new(store, clock.clone(), "local", ActivityKind::Sleep);
        let id = dashboard.start().unwrap().id;
        clock.advance_secs(60);

        let mut command =
            Tracker::load(store, clock.clone(), "local", ActivityKind::Sleep).unwrap();
        command.stop().unwrap();
        clock.advance_secs(600);

        assert!(matches!(
            dashboard.pause(),
            Err(TrackError::InvalidTransition {
                command: Command::Pause,
                state: TrackerState::Closed,
            })
        ));
        assert!(matches!(
            dashboard.stop(),
            Err(TrackError::InvalidTransition {
                command: Command::Stop,
                state: TrackerState::Closed,
            })
        ));
        assert_eq!(dashboard.state(), TrackerState::Running);

        let stored = store.get(id).unwrap().unwrap();
        assert_eq!(stored.ended_at, Some(clock.now() - Duration::seconds(600)));
        assert_eq!(stored.duration_seconds, 60);
        assert!(!stored.is_paused);
    }

    #[test]
    fn test_failed_stop_keeps_session_open() {
        let mut store = MockSessionStore::new();
        store.expect_find_open_session().returning(|_, _| Ok(None));
        store
            .expect_create_session()
            .returning(|_| Ok(SessionId(3)));
        store
            .expect_update_session()
            .withf(|id, update| *id == SessionId(3) && update.ended_at.is_some())
            .times(1)
            .returning(|_, _| Err(offline()));

        let clock = clock();
        let mut tracker = Tracker::new(store, clock.clone(), "local", ActivityKind::Nursing);
        tracker.start().unwrap();
        clock.advance_secs(90);

        assert!(tracker.stop().is_err());
        assert_eq!(tracker.state(), TrackerState::Running);
        assert!(tracker.session().unwrap().ended_at.is_none());
        assert_eq!(tracker.elapsed_seconds(), 90);
    }

    #[test]
    fn test_failed_discard_keeps_session() {
        let mut store = MockSessionStore::new();
        store.expect_find_open_session().returning(|_, _| Ok(None));
        store
            .expect_create_session()
            .returning(|_| Ok(SessionId(5)));
        store
            .expect_delete_session()
            .times(1)
            .returning(|_| Err(offline()));

        let mut tracker = Tracker::new(store, clock(), "local", ActivityKind::Sleep);
        tracker.start().unwrap();

        assert!(tracker.discard().is_err());
        assert_eq!(tracker.state(), TrackerState::Running);
    }

    #[test]
    fn test_pause_writes_checkpoint_fields() {
        let mut store = MockSessionStore::new();
        store.expect_find_open_session().returning(|_, _| Ok(None));
        store
            .expect_create_session()
            .returning(|_| Ok(SessionId(8)));

        let clock = clock();
        let paused_at = clock.now() + Duration::seconds(42);
        store
            .expect_update_session()
            .withf(move |id, update| {
                *id == SessionId(8)
                    && *update
                        == SessionUpdate {
                            is_paused: Some(true),
                            pause_started_at: Some(Some(paused_at)),
                            duration_seconds: Some(42),
                            ..SessionUpdate::default()
                        }
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let mut tracker = Tracker::new(store, clock.clone(), "local", ActivityKind::Sleep);
        tracker.start().unwrap();
        clock.advance_secs(42);
        tracker.pause().unwrap();

        assert_eq!(tracker.state(), TrackerState::Paused);
    }
}
