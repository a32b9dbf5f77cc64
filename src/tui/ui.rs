//! UI rendering for the TUI.

use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::features::report::DailySummary;
use crate::features::session::{ActivityKind, TimedSession, TrackerState};
use crate::output::{format_clock, format_duration, format_minutes};
use crate::tui::app::{App, Panel};

const HINT: &str = "Tab:panel | s:start | p:pause | x:stop | w:side | ?:help | q:quit";

/// Render the application UI.
pub fn render(frame: &mut Frame<'_>, app: &App<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(7), // Trackers
            Constraint::Min(0),    // Summary
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0]);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    for (kind, area) in [ActivityKind::Nursing, ActivityKind::Sleep]
        .into_iter()
        .zip(panels.iter())
    {
        render_panel(frame, app.panel(kind), kind, app.focus == kind, *area);
    }

    render_summary(frame, app.summary.as_ref(), chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

fn render_header(frame: &mut Frame<'_>, area: Rect) {
    let title = format!(" babytrack  {} ", Local::now().format("%a %d %b %H:%M"));

    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    frame.render_widget(header, area);
}

const fn state_color(state: TrackerState) -> Color {
    match state {
        TrackerState::Running => Color::Green,
        TrackerState::Paused => Color::Yellow,
        TrackerState::Idle | TrackerState::Closed => Color::DarkGray,
    }
}

fn last_line(last: Option<&TimedSession>) -> Line<'static> {
    let text = last.map_or_else(
        || "Last: none".to_string(),
        |s| {
            let side = s
                .activity
                .side()
                .map(|side| format!(" {side}"))
                .unwrap_or_default();
            format!(
                "Last:{side} {} at {}",
                format_duration(s.duration_seconds),
                s.started_at.with_timezone(&Local).format("%H:%M")
            )
        },
    );
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

fn render_panel(
    frame: &mut Frame<'_>,
    panel: &Panel<'_>,
    kind: ActivityKind,
    focused: bool,
    area: Rect,
) {
    let snapshot = panel.snapshot();

    let mut lines = vec![
        Line::from(Span::styled(
            format_clock(snapshot.elapsed_seconds),
            Style::default()
                .fg(state_color(snapshot.state))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(snapshot.state.to_string()),
    ];
    if let Some(side) = snapshot.side {
        lines.push(Line::from(format!("Side: {side}")));
    }
    lines.push(last_line(panel.last.as_ref()));

    let border = if focused { Color::Cyan } else { Color::White };
    let block = Block::default()
        .title(format!(" {} ", kind.display_name()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_summary(frame: &mut Frame<'_>, summary: Option<&DailySummary>, area: Rect) {
    let lines = summary.map_or_else(
        || vec![Line::from("No data")],
        |s| {
            let mut lines = vec![
                Line::from(format!(
                    "Diapers:  {} ({} pee, {} poop)",
                    s.diapers, s.pee, s.poop
                )),
                Line::from(format!("Feedings: {}", s.feedings)),
                Line::from(format!(
                    "Nursing:  {} sessions, {}",
                    s.nursing_sessions,
                    format_minutes(s.nursing_minutes)
                )),
                Line::from(format!(
                    "Sleep:    {} sessions, {}",
                    s.sleep_sessions,
                    format_minutes(s.sleep_minutes)
                )),
            ];
            if let Some(last) = &s.last_nursing {
                lines.push(Line::from(Span::styled(
                    format!("Next side: {}", last.suggested_side),
                    Style::default().fg(Color::Magenta),
                )));
            }
            lines
        },
    );

    let block = Block::default()
        .title(" Today ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status_bar(frame: &mut Frame<'_>, app: &App<'_>, area: Rect) {
    let status_text = app.status.as_deref().unwrap_or(HINT);

    let status = Paragraph::new(status_text).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(status, area);
}
