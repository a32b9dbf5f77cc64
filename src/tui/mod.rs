//! Live dashboard for babytrack.
//!
//! Shows the nursing and sleep trackers side by side with today's summary.
//! Built with ratatui and crossterm.

mod app;
mod event;
mod ui;

pub use app::{App, Panel};

use std::io;
use std::time::Instant;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::warn;

use crate::cli::commands::Context;
use crate::error::TrackError;
use crate::features::session::Ticker;

/// Run the dashboard until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal fails to initialize or the store cannot
/// be read at startup.
pub fn run(ctx: &Context) -> Result<(), TrackError> {
    // Load before touching the terminal so startup errors print normally
    let mut app = App::new(ctx)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let ticker = Ticker::from_millis(ctx.config.timer.tick_interval_ms);
    let result = run_app(&mut terminal, &mut app, ticker);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Run the main application loop.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<'_>,
    mut ticker: Ticker,
) -> Result<(), TrackError> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if let Some(action) = event::handle_events(app, ticker.timeout(Instant::now()))? {
            if action == event::Action::Quit {
                break;
            }
            if let Err(e) = apply(app, action) {
                warn!(error = %e, "dashboard command failed");
                app.status = Some(e.to_string());
            }
        }

        let now = Instant::now();
        if ticker.poll(now) {
            if let Err(e) = app.refresh_if_due(now) {
                app.status = Some(e.to_string());
            }
        }
    }

    Ok(())
}

fn apply(app: &mut App<'_>, action: event::Action) -> Result<(), TrackError> {
    match action {
        event::Action::Quit => Ok(()),
        event::Action::Start => app.start(),
        event::Action::TogglePause => app.toggle_pause(),
        event::Action::Stop => app.stop(),
        event::Action::SwitchSide => app.switch_side(),
        event::Action::Discard => app.discard(),
        event::Action::Diaper(kind) => app.log_diaper(kind),
        event::Action::Feeding => app.log_feeding(),
    }
}
