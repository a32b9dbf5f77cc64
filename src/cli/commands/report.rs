//! Summary and report commands.

use chrono::Local;

use super::Context;
use crate::cli::args::{OutputFormat, ReportArgs};
use crate::error::TrackError;
use crate::features::report::{DailySummary, PeriodReport};
use crate::output::{format_report, format_summary};

/// Execute the summary command.
///
/// # Errors
///
/// Returns an error if the records cannot be read.
pub fn summary(ctx: &Context, format: OutputFormat) -> Result<String, TrackError> {
    let summary =
        DailySummary::today(&ctx.sessions(), &ctx.records(), ctx.user_id(), &Local::now())?;
    format_summary(&summary, format)
}

/// Execute the report command.
///
/// # Errors
///
/// Returns an error if the records cannot be read.
pub fn report(
    ctx: &Context,
    args: &ReportArgs,
    format: OutputFormat,
) -> Result<String, TrackError> {
    let period = args.period.unwrap_or(ctx.config.reports.default_period);
    let report = PeriodReport::generate(
        &ctx.sessions(),
        &ctx.records(),
        ctx.user_id(),
        period,
        &Local::now(),
    )?;
    format_report(&report, format)
}
