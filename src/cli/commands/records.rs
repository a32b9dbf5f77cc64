//! Quick record, history and delete commands.

use chrono::{DateTime, Utc};
use colored::Colorize;

use super::Context;
use crate::cli::args::{DeleteArgs, DeleteTarget, HistoryArgs, LogCommands, OutputFormat};
use crate::core::{Clock, SystemClock};
use crate::error::TrackError;
use crate::features::records::DiaperKind;
use crate::features::report::recent_history;
use crate::features::session::{SessionId, SessionStore};
use crate::output::{format_history, to_json};

/// Execute log subcommands.
///
/// # Errors
///
/// Returns an error if the record cannot be stored.
pub fn log(ctx: &Context, cmd: LogCommands, format: OutputFormat) -> Result<String, TrackError> {
    let records = ctx.records();
    let now = SystemClock.now();

    let (value, label) = match cmd {
        LogCommands::Pee => log_diaper(ctx, DiaperKind::Pee, now)?,
        LogCommands::Poop => log_diaper(ctx, DiaperKind::Poop, now)?,
        LogCommands::Feeding => {
            let feeding = records.add_feeding(ctx.user_id(), now)?;
            let label = format!("Feeding logged, id {}", feeding.id);
            (serde_json::to_value(&feeding)?, label)
        }
    };

    match format {
        OutputFormat::Json => to_json(&value),
        OutputFormat::Pretty => Ok(format!("{} {label}", "✓".green())),
    }
}

fn log_diaper(
    ctx: &Context,
    kind: DiaperKind,
    now: DateTime<Utc>,
) -> Result<(serde_json::Value, String), TrackError> {
    let change = ctx.records().add_diaper(ctx.user_id(), kind, now)?;
    let label = format!("Diaper ({}) logged, id {}", kind.display_name(), change.id);
    Ok((serde_json::to_value(&change)?, label))
}

/// Execute the history command.
///
/// # Errors
///
/// Returns an error if the records cannot be read.
pub fn history(
    ctx: &Context,
    args: &HistoryArgs,
    format: OutputFormat,
) -> Result<String, TrackError> {
    let entries = recent_history(
        &ctx.sessions(),
        &ctx.records(),
        ctx.user_id(),
        args.kind,
        args.limit,
    )?;
    format_history(&entries, format)
}

/// Execute the delete command.
///
/// # Errors
///
/// Returns [`TrackError::NotFound`] if the record does not exist.
pub fn delete(
    ctx: &Context,
    args: &DeleteArgs,
    format: OutputFormat,
) -> Result<String, TrackError> {
    let label = match args.target {
        DeleteTarget::Diaper => {
            ctx.records().delete_diaper(args.id)?;
            "diaper change"
        }
        DeleteTarget::Feeding => {
            ctx.records().delete_feeding(args.id)?;
            "feeding"
        }
        DeleteTarget::Session => {
            ctx.sessions().delete_session(SessionId(args.id))?;
            "session"
        }
    };

    match format {
        OutputFormat::Json => to_json(&serde_json::json!({
            "deleted": label,
            "id": args.id,
        })),
        OutputFormat::Pretty => Ok(format!("{} Deleted {label} {}", "✗".red(), args.id)),
    }
}
