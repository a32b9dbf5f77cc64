//! Nursing and sleep session commands.

use colored::Colorize;
use serde_json::json;

use super::Context;
use crate::cli::args::{NursingCommands, OutputFormat, SleepCommands};
use crate::error::TrackError;
use crate::features::session::{ActivityKind, Side, SqliteSessionStore, Tracker, TrackerState};
use crate::output::{format_session_event_pretty, format_status, to_json};

/// A tracker command, shared by nursing and sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Open a session, optionally on a given side.
    Start {
        /// Side override for nursing.
        side: Option<Side>,
    },
    /// Pause the running session.
    Pause,
    /// Resume the paused session.
    Resume,
    /// Close the session.
    Stop,
    /// Switch nursing side.
    Switch,
    /// Delete the open session.
    Discard,
    /// Report state.
    Status,
}

impl From<NursingCommands> for SessionAction {
    fn from(cmd: NursingCommands) -> Self {
        match cmd {
            NursingCommands::Start { side } => Self::Start { side },
            NursingCommands::Pause => Self::Pause,
            NursingCommands::Resume => Self::Resume,
            NursingCommands::Stop => Self::Stop,
            NursingCommands::Switch => Self::Switch,
            NursingCommands::Discard => Self::Discard,
            NursingCommands::Status => Self::Status,
        }
    }
}

impl From<SleepCommands> for SessionAction {
    fn from(cmd: SleepCommands) -> Self {
        match cmd {
            SleepCommands::Start => Self::Start { side: None },
            SleepCommands::Pause => Self::Pause,
            SleepCommands::Resume => Self::Resume,
            SleepCommands::Stop => Self::Stop,
            SleepCommands::Discard => Self::Discard,
            SleepCommands::Status => Self::Status,
        }
    }
}

/// Execute nursing subcommands.
///
/// # Errors
///
/// Returns an error if the command is not valid in the current state or
/// storage fails.
pub fn nursing(
    ctx: &Context,
    cmd: NursingCommands,
    format: OutputFormat,
) -> Result<String, TrackError> {
    run(ctx, ActivityKind::Nursing, cmd.into(), format)
}

/// Execute sleep subcommands.
///
/// # Errors
///
/// Returns an error if the command is not valid in the current state or
/// storage fails.
pub fn sleep(
    ctx: &Context,
    cmd: SleepCommands,
    format: OutputFormat,
) -> Result<String, TrackError> {
    run(ctx, ActivityKind::Sleep, cmd.into(), format)
}

fn run(
    ctx: &Context,
    kind: ActivityKind,
    action: SessionAction,
    format: OutputFormat,
) -> Result<String, TrackError> {
    let mut tracker = ctx.tracker(kind)?;

    match action {
        SessionAction::Start { side } => {
            if let Some(side) = side {
                tracker = tracker.with_side(side);
            }
            tracker.start()?;
            event(&tracker, "started", format)
        }

        SessionAction::Pause => {
            tracker.pause()?;
            event(&tracker, "paused", format)
        }

        SessionAction::Resume => {
            tracker.resume()?;
            event(&tracker, "resumed", format)
        }

        SessionAction::Stop => {
            let closed = tracker.stop()?;
            match format {
                OutputFormat::Json => to_json(&closed),
                OutputFormat::Pretty => Ok(format_session_event_pretty(
                    "stopped",
                    &closed,
                    closed.duration_seconds,
                )),
            }
        }

        SessionAction::Switch => switch(&mut tracker, format),

        SessionAction::Discard => {
            let discarded = tracker.discard()?;
            match format {
                OutputFormat::Json => to_json(&discarded),
                OutputFormat::Pretty => Ok(format!(
                    "{} {} session {} discarded",
                    "✗".red(),
                    kind.display_name(),
                    discarded.id
                )),
            }
        }

        SessionAction::Status => format_status(&tracker.snapshot(), format),
    }
}

fn switch(
    tracker: &mut Tracker<SqliteSessionStore<'_>>,
    format: OutputFormat,
) -> Result<String, TrackError> {
    let closed = tracker.switch_side()?;
    let snapshot = tracker.snapshot();

    match (format, closed) {
        (OutputFormat::Json, closed) => to_json(&json!({
            "closed": closed,
            "current": snapshot,
        })),
        (OutputFormat::Pretty, Some(closed)) => {
            let mut lines = vec![format_session_event_pretty(
                "stopped",
                &closed,
                closed.duration_seconds,
            )];
            if let Some(open) = tracker.session() {
                lines.push(format_session_event_pretty("started", open, snapshot.elapsed_seconds));
            }
            Ok(lines.join("\n"))
        }
        (OutputFormat::Pretty, None) if snapshot.state == TrackerState::Paused => Ok(format!(
            "{}\n{}",
            "Session is paused; nothing switched".yellow(),
            "  Resume it first, then switch".dimmed()
        )),
        (OutputFormat::Pretty, None) => {
            let side = snapshot.side.unwrap_or_default();
            Ok(format!(
                "Next side: {}\n{}",
                side.to_string().green().bold(),
                format!("  Start it with 'babytrack nursing start --side {side}'").dimmed()
            ))
        }
    }
}

fn event(
    tracker: &Tracker<SqliteSessionStore<'_>>,
    verb: &str,
    format: OutputFormat,
) -> Result<String, TrackError> {
    let snapshot = tracker.snapshot();
    match (format, tracker.session()) {
        (OutputFormat::Pretty, Some(session)) => Ok(format_session_event_pretty(
            verb,
            session,
            snapshot.elapsed_seconds,
        )),
        _ => to_json(&snapshot),
    }
}
