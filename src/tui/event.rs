//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::error::TrackError;
use crate::features::records::DiaperKind;
use crate::tui::app::App;

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Start a session on the focused panel.
    Start,
    /// Pause or resume the focused session.
    TogglePause,
    /// Stop the focused session.
    Stop,
    /// Switch the nursing side.
    SwitchSide,
    /// Discard the focused open session.
    Discard,
    /// Log a diaper change.
    Diaper(DiaperKind),
    /// Log a bottle feeding.
    Feeding,
}

const HELP: &str =
    "Tab:panel | s:start | p:pause | x:stop | w:side | d:discard | 1/2/3:pee/poop/feed | q:quit";

/// Handle terminal events, waiting at most `timeout` for one to arrive.
///
/// Returns an action to take, or None if no action is needed.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn handle_events(app: &mut App<'_>, timeout: Duration) -> Result<Option<Action>, TrackError> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    let Event::Key(key) = event::read()? else {
        return Ok(None);
    };
    if key.kind != KeyEventKind::Press {
        return Ok(None);
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(Some(Action::Quit));
    }

    let action = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Tab | KeyCode::BackTab => {
            app.toggle_focus();
            None
        }
        KeyCode::Char('s') => Some(Action::Start),
        KeyCode::Char('p') | KeyCode::Char(' ') => Some(Action::TogglePause),
        KeyCode::Char('x') => Some(Action::Stop),
        KeyCode::Char('w') => Some(Action::SwitchSide),
        KeyCode::Char('d') => Some(Action::Discard),
        KeyCode::Char('1') => Some(Action::Diaper(DiaperKind::Pee)),
        KeyCode::Char('2') => Some(Action::Diaper(DiaperKind::Poop)),
        KeyCode::Char('3') => Some(Action::Feeding),
        KeyCode::Char('?') => {
            app.status = Some(HELP.to_string());
            None
        }
        _ => None,
    };

    Ok(action)
}
