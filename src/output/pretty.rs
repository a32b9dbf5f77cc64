use chrono::{DateTime, Local, Utc};
use colored::{ColoredString, Colorize};

use super::duration::{format_clock, format_duration, format_minutes};
use crate::features::records::DiaperKind;
use crate::features::report::{DailySummary, HistoryEntry, PeriodReport};
use crate::features::session::{ActivityKind, TimedSession, TrackerSnapshot, TrackerState};

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn state_label(state: TrackerState) -> ColoredString {
    match state {
        TrackerState::Idle => "idle".dimmed(),
        TrackerState::Running => "running".green().bold(),
        TrackerState::Paused => "paused".yellow().bold(),
        TrackerState::Closed => "stopped".cyan(),
    }
}

fn session_title(session: &TimedSession) -> String {
    match session.activity.side() {
        Some(side) => format!("{} ({side})", session.activity.kind().display_name()),
        None => session.activity.kind().display_name().to_string(),
    }
}

/// Format a tracker's live status.
pub fn format_status_pretty(snapshot: &TrackerSnapshot) -> String {
    let mut output = format!(
        "{} {}\n",
        snapshot.kind.display_name().bold(),
        state_label(snapshot.state)
    );

    if let Some(side) = snapshot.side {
        let label = if matches!(snapshot.state, TrackerState::Running | TrackerState::Paused) {
            "Side"
        } else {
            "Next side"
        };
        output.push_str(&format!("  {}: {side}\n", label.dimmed()));
    }

    if let Some(session) = &snapshot.session {
        output.push_str(&format!(
            "  {}: {}\n",
            "Elapsed".dimmed(),
            format_clock(snapshot.elapsed_seconds)
        ));
        output.push_str(&format!(
            "  {}: {}\n",
            "Started".dimmed(),
            local_time(session.started_at)
        ));
        output.push_str(&format!("  {}: {}\n", "ID".dimmed(), session.id));
    }

    output
}

/// Format the result of a tracker command.
pub fn format_session_event_pretty(
    verb: &str,
    session: &TimedSession,
    elapsed_seconds: i64,
) -> String {
    format!(
        "{} {} {}  {}",
        "✓".green(),
        session_title(session).bold(),
        verb,
        format_clock(elapsed_seconds).cyan()
    )
}

/// Format a history listing as a table.
pub fn format_history_pretty(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "History (0 items)\n  No records".to_string();
    }

    let mut output = format!("History ({} items)\n", entries.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for entry in entries {
        let line = match entry {
            HistoryEntry::Diaper(d) => {
                let icon = match d.kind {
                    DiaperKind::Pee => "💧",
                    DiaperKind::Poop => "💩",
                };
                format!(
                    "{}  {icon} {:<22} {}",
                    local_time(d.created_at).dimmed(),
                    format!("Diaper: {}", d.kind.display_name()),
                    format!("diaper {}", d.id).dimmed()
                )
            }
            HistoryEntry::Feeding(f) => format!(
                "{}  🍼 {:<22} {}",
                local_time(f.created_at).dimmed(),
                "Feeding",
                format!("feeding {}", f.id).dimmed()
            ),
            HistoryEntry::Session(s) => {
                let icon = match s.activity.kind() {
                    ActivityKind::Nursing => "🤱",
                    ActivityKind::Sleep => "😴",
                };
                let length = if s.is_open() {
                    state_label(s.state()).to_string()
                } else {
                    format_duration(s.duration_seconds)
                };
                format!(
                    "{}  {icon} {:<22} {length}  {}",
                    local_time(s.started_at).dimmed(),
                    session_title(s),
                    format!("session {}", s.id).dimmed()
                )
            }
        };
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format today's summary.
pub fn format_summary_pretty(summary: &DailySummary) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Today ({})", summary.date).bold().to_string());
    lines.push("─".repeat(40));
    lines.push(format!(
        "  Diapers:   {:>3}  ({} pee, {} poop)",
        summary.diapers, summary.pee, summary.poop
    ));
    lines.push(format!("  Feedings:  {:>3}", summary.feedings));
    lines.push(format!(
        "  Nursing:   {:>3}  ({})",
        summary.nursing_sessions,
        format_minutes(summary.nursing_minutes)
    ));
    lines.push(format!(
        "  Sleep:     {:>3}  ({})",
        summary.sleep_sessions,
        format_minutes(summary.sleep_minutes)
    ));

    match &summary.last_nursing {
        Some(last) => {
            lines.push(String::new());
            lines.push(format!(
                "  Last nursing: {} side, {} at {}",
                last.side,
                format_duration(last.duration_seconds),
                local_time(last.started_at)
            ));
            lines.push(format!(
                "  Next side:    {}",
                last.suggested_side.to_string().green().bold()
            ));
        }
        None => {
            lines.push(String::new());
            lines.push("  No nursing sessions yet".dimmed().to_string());
        }
    }

    lines.join("\n")
}

/// Format a period report.
pub fn format_report_pretty(report: &PeriodReport) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Report: {} ({} to {})", report.period, report.from, report.to));
    lines.push("═".repeat(50));
    lines.push(String::new());

    lines.push("Summary".to_string());
    lines.push("─".repeat(40));
    lines.push(format!(
        "  Diapers:          {:>4}  ({:.1}/day)",
        report.total_diapers, report.avg_diapers_per_day
    ));
    lines.push(format!(
        "  Feedings:         {:>4}  ({:.1}/day)",
        report.total_feedings, report.avg_feedings_per_day
    ));
    lines.push(format!(
        "  Nursing sessions: {:>4}  ({:.1}/day)",
        report.total_nursing_sessions, report.avg_nursing_per_day
    ));
    lines.push(format!(
        "  Nursing time:     {}",
        format_minutes(report.total_nursing_minutes)
    ));
    lines.push(format!(
        "  Sleep:            {:>4}  ({})",
        report.total_sleep_sessions,
        format_minutes(report.total_sleep_minutes)
    ));

    if !report.daily.is_empty() {
        lines.push(String::new());
        lines.push("Daily Activity".to_string());
        lines.push("─".repeat(40));
        lines.push(format!(
            "  {:<10}  {:>7} {:>8} {:>7} {:>8} {:>8}",
            "Date", "Diapers", "Feedings", "Nursing", "Nursed", "Slept"
        ));

        for day in &report.daily {
            lines.push(format!(
                "  {:<10}  {:>7} {:>8} {:>7} {:>8} {:>8}",
                day.date.to_string(),
                day.diapers,
                day.feedings,
                day.nursing_sessions,
                format_minutes(day.nursing_minutes),
                format_minutes(day.sleep_minutes)
            ));
        }
    }

    lines.join("\n")
}
