//! Application state for the TUI.

use std::time::{Duration, Instant};

use chrono::Local;

use crate::cli::commands::Context;
use crate::core::{Clock, SystemClock};
use crate::error::TrackError;
use crate::features::records::DiaperKind;
use crate::features::report::DailySummary;
use crate::features::session::{
    ActivityKind, SqliteSessionStore, TimedSession, Tracker, TrackerSnapshot, TrackerState,
};

/// One activity panel: its tracker and the last finished session.
pub struct Panel<'a> {
    tracker: Tracker<SqliteSessionStore<'a>>,
    /// Most recent closed session of this kind.
    pub last: Option<TimedSession>,
}

impl<'a> Panel<'a> {
    fn load(ctx: &'a Context, kind: ActivityKind) -> Result<Self, TrackError> {
        let tracker = ctx.tracker(kind)?;
        let last = ctx.sessions().last_closed(ctx.user_id(), kind)?;
        Ok(Self { tracker, last })
    }

    /// Current tracker view.
    pub fn snapshot(&self) -> TrackerSnapshot {
        self.tracker.snapshot()
    }
}

/// Application state.
pub struct App<'a> {
    ctx: &'a Context,
    /// Nursing panel.
    pub nursing: Panel<'a>,
    /// Sleep panel.
    pub sleep: Panel<'a>,
    /// Panel that receives commands.
    pub focus: ActivityKind,
    /// Today's totals as of the last refresh.
    pub summary: Option<DailySummary>,
    /// Status message to display.
    pub status: Option<String>,
    summary_interval: Duration,
    summary_due: Instant,
}

impl<'a> App<'a> {
    /// Create a new app instance, reattaching any open sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn new(ctx: &'a Context) -> Result<Self, TrackError> {
        let summary_interval = Duration::from_secs(ctx.config.dashboard.summary_refresh_secs);
        let mut app = Self {
            ctx,
            nursing: Panel::load(ctx, ActivityKind::Nursing)?,
            sleep: Panel::load(ctx, ActivityKind::Sleep)?,
            focus: ActivityKind::Nursing,
            summary: None,
            status: Some("Press ? for help".to_string()),
            summary_interval,
            summary_due: Instant::now() + summary_interval,
        };
        app.refresh_summary()?;
        Ok(app)
    }

    /// The panel for `kind`.
    pub const fn panel(&self, kind: ActivityKind) -> &Panel<'a> {
        match kind {
            ActivityKind::Nursing => &self.nursing,
            ActivityKind::Sleep => &self.sleep,
        }
    }

    fn focused(&mut self) -> &mut Panel<'a> {
        match self.focus {
            ActivityKind::Nursing => &mut self.nursing,
            ActivityKind::Sleep => &mut self.sleep,
        }
    }

    /// Move focus to the other panel.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            ActivityKind::Nursing => ActivityKind::Sleep,
            ActivityKind::Sleep => ActivityKind::Nursing,
        };
    }

    /// Start a session on the focused panel.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracker rejects the start.
    pub fn start(&mut self) -> Result<(), TrackError> {
        let kind = self.focus;
        self.focused().tracker.start()?;
        self.settle(Some(format!("{} started", kind.display_name())));
        Ok(())
    }

    /// Pause a running session or resume a paused one.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracker rejects the command.
    pub fn toggle_pause(&mut self) -> Result<(), TrackError> {
        let kind = self.focus;
        let panel = self.focused();
        let verb = if panel.tracker.state() == TrackerState::Paused {
            panel.tracker.resume()?;
            "resumed"
        } else {
            panel.tracker.pause()?;
            "paused"
        };
        self.status = Some(format!("{} {verb}", kind.display_name()));
        Ok(())
    }

    /// Stop the focused session.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracker rejects the stop.
    pub fn stop(&mut self) -> Result<(), TrackError> {
        let kind = self.focus;
        let panel = self.focused();
        let closed = panel.tracker.stop()?;
        let minutes = closed.duration_seconds / 60;
        panel.last = Some(closed);
        self.settle(Some(format!("{} stopped after {minutes}m", kind.display_name())));
        Ok(())
    }

    /// Switch the nursing side on the focused panel.
    ///
    /// # Errors
    ///
    /// Returns an error for sleep or if the store write fails.
    pub fn switch_side(&mut self) -> Result<(), TrackError> {
        let panel = self.focused();
        if let Some(closed) = panel.tracker.switch_side()? {
            panel.last = Some(closed);
        }
        let side = panel.tracker.current_side();
        let status = side.map(|s| format!("Side: {s}"));
        self.settle(status);
        Ok(())
    }

    /// Drop the focused open session without recording it.
    ///
    /// # Errors
    ///
    /// Returns an error if there is nothing to discard or the delete fails.
    pub fn discard(&mut self) -> Result<(), TrackError> {
        let kind = self.focus;
        self.focused().tracker.discard()?;
        self.settle(Some(format!("{} discarded", kind.display_name())));
        Ok(())
    }

    /// Log a diaper change.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be stored.
    pub fn log_diaper(&mut self, kind: DiaperKind) -> Result<(), TrackError> {
        self.ctx
            .records()
            .add_diaper(self.ctx.user_id(), kind, SystemClock.now())?;
        self.settle(Some(format!("Logged diaper ({})", kind.display_name())));
        Ok(())
    }

    /// Log a bottle feeding.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be stored.
    pub fn log_feeding(&mut self) -> Result<(), TrackError> {
        self.ctx
            .records()
            .add_feeding(self.ctx.user_id(), SystemClock.now())?;
        self.settle(Some("Logged feeding".to_string()));
        Ok(())
    }

    /// Show a committed command's result and refresh the summary.
    ///
    /// A failed refresh is reported on the status line without turning the
    /// command itself into a failure.
    fn settle(&mut self, status: Option<String>) {
        match self.refresh_summary() {
            Ok(()) => self.status = status,
            Err(e) => {
                let done = status.unwrap_or_else(|| "Done".to_string());
                self.status = Some(format!("{done}; summary not refreshed: {e}"));
            }
        }
    }

    /// Recompute today's summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be read.
    pub fn refresh_summary(&mut self) -> Result<(), TrackError> {
        self.summary = Some(DailySummary::today(
            &self.ctx.sessions(),
            &self.ctx.records(),
            self.ctx.user_id(),
            &Local::now(),
        )?);
        self.summary_due = Instant::now() + self.summary_interval;
        Ok(())
    }

    /// Recompute the summary if its refresh interval has passed.
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be read.
    pub fn refresh_if_due(&mut self, now: Instant) -> Result<(), TrackError> {
        if now >= self.summary_due {
            self.refresh_summary()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Paths};
    use crate::features::session::Side;
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> Context {
        Context::open(Paths::with_root(dir.path().to_path_buf()), Config::default()).unwrap()
    }

    #[test]
    fn test_new_app_is_idle() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let app = App::new(&ctx).unwrap();

        assert_eq!(app.focus, ActivityKind::Nursing);
        assert_eq!(app.nursing.snapshot().state, TrackerState::Idle);
        assert_eq!(app.sleep.snapshot().state, TrackerState::Idle);
        assert_eq!(app.summary.as_ref().map(|s| s.diapers), Some(0));
    }

    #[test]
    fn test_commands_follow_focus() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let mut app = App::new(&ctx).unwrap();

        app.toggle_focus();
        app.start().unwrap();

        assert_eq!(app.sleep.snapshot().state, TrackerState::Running);
        assert_eq!(app.nursing.snapshot().state, TrackerState::Idle);
        assert_eq!(app.summary.as_ref().map(|s| s.sleep_sessions), Some(1));
    }

    #[test]
    fn test_pause_toggle_and_stop() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let mut app = App::new(&ctx).unwrap();

        app.start().unwrap();
        app.toggle_pause().unwrap();
        assert_eq!(app.nursing.snapshot().state, TrackerState::Paused);
        app.toggle_pause().unwrap();
        assert_eq!(app.nursing.snapshot().state, TrackerState::Running);

        app.stop().unwrap();
        assert_eq!(app.nursing.snapshot().state, TrackerState::Closed);
        assert!(app.nursing.last.is_some());
    }

    #[test]
    fn test_stop_succeeds_when_summary_refresh_fails() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let mut app = App::new(&ctx).unwrap();
        app.start().unwrap();

        ctx.database()
            .connection()
            .execute_batch("DROP TABLE feeding_records")
            .unwrap();

        app.stop().unwrap();
        assert_eq!(app.nursing.snapshot().state, TrackerState::Closed);
        assert!(app.nursing.last.is_some());
        let status = app.status.as_deref().unwrap();
        assert!(status.starts_with("Nursing stopped"));
        assert!(status.contains("summary not refreshed"));
    }

    #[test]
    fn test_rejected_command_keeps_state() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let mut app = App::new(&ctx).unwrap();

        assert!(matches!(
            app.stop(),
            Err(TrackError::InvalidTransition { .. })
        ));
        assert_eq!(app.nursing.snapshot().state, TrackerState::Idle);
    }

    #[test]
    fn test_switch_side_while_idle() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let mut app = App::new(&ctx).unwrap();

        app.switch_side().unwrap();
        assert_eq!(app.nursing.snapshot().side, Some(Side::Right));

        app.toggle_focus();
        assert!(matches!(
            app.switch_side(),
            Err(TrackError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_reopening_reattaches() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        {
            let mut app = App::new(&ctx).unwrap();
            app.start().unwrap();
        }

        let app = App::new(&ctx).unwrap();
        assert_eq!(app.nursing.snapshot().state, TrackerState::Running);
    }

    #[test]
    fn test_quick_records_update_summary() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let mut app = App::new(&ctx).unwrap();

        app.log_diaper(DiaperKind::Poop).unwrap();
        app.log_feeding().unwrap();

        let summary = app.summary.as_ref().unwrap();
        assert_eq!(summary.poop, 1);
        assert_eq!(summary.feedings, 1);
    }
}
