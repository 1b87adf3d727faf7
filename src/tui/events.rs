//! TUI event handling with crossterm.
//!
//! Keys mean different things on the two kinds of screens:
//!
//! - **Forms** (sign-in, sign-up): printable keys type into the focused
//!   field; Tab moves focus; Enter submits; Ctrl+R switches forms.
//! - **Shell** (protected screens): Tab/arrows or h/l move through the
//!   navigation; d/f/w/a open a screen directly; o signs out; q quits.
//!
//! Esc and Ctrl+C quit everywhere.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use thiserror::Error;

use super::app::Action;
use crate::access::Route;

/// Error raised while reading terminal events.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("failed to read terminal event: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads terminal events and translates them into [`Action`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct EventHandler;

impl EventHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Wait up to `timeout` for a key and translate it.
    ///
    /// `form_active` selects the form key map.
    pub fn poll(&self, timeout: Duration, form_active: bool) -> Result<Option<Action>, EventError> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(map_key(&key, form_active)),
            _ => Ok(None),
        }
    }
}

/// Translate a key press into an action.
#[must_use]
pub fn map_key(key: &KeyEvent, form_active: bool) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') if form_active => Some(Action::SwitchForm),
            _ => None,
        };
    }

    if form_active {
        return match key.code {
            KeyCode::Esc => Some(Action::Quit),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                Some(Action::NextField)
            }
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => Some(Action::NextTab),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => Some(Action::PreviousTab),
        KeyCode::Char('d') => Some(Action::Open(Route::Dashboard)),
        KeyCode::Char('f') => Some(Action::Open(Route::Feed)),
        KeyCode::Char('w') => Some(Action::Open(Route::Create)),
        KeyCode::Char('a') => Some(Action::Open(Route::Admin)),
        KeyCode::Char('o') => Some(Action::SignOut),
        KeyCode::Char('x') => Some(Action::Dismiss),
        _ => None,
    }
}
