//! TUI main loop.
//!
//! # Terminal Management
//!
//! The TUI takes over the terminal by:
//! - Enabling raw mode (unbuffered input, no echo)
//! - Entering the alternate screen buffer
//! - Hiding the cursor
//!
//! All these changes are reverted on exit, including on panic.
//!
//! # Event Loop
//!
//! 1. Settle the location against the current session
//! 2. Render the current state
//! 3. Poll for a key with a timeout and apply it
//! 4. Limit frame rate to ~60 FPS
//!
//! # Example
//!
//! ```no_run
//! use storydeck::api::{ApiConfig, HttpApi};
//! use storydeck::session::{FileStorage, SessionStore};
//! use storydeck::tui::{run_tui, App};
//!
//! let storage = FileStorage::new("session.json");
//! let mut app = App::new(SessionStore::initialize(Box::new(storage)));
//! let api = HttpApi::new(ApiConfig::default()).unwrap();
//!
//! run_tui(&mut app, &api).unwrap();
//! ```

use std::io::{self, Stdout};
use std::panic;
use std::time::{Duration, Instant};

use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use thiserror::Error;

use super::app::{Action, App};
use super::events::EventHandler;
use super::ui::render;
use crate::api::Authenticator;

/// Frame rate limit: 60 FPS = ~16.67ms per frame.
const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Event poll timeout.
const POLL_TIMEOUT: Duration = Duration::from_millis(16);

/// Error type for TUI operations.
#[derive(Debug, Error)]
pub enum TuiError {
    /// I/O error from terminal operations.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// Event handling error.
    #[error("event error: {0}")]
    Event(#[from] super::events::EventError),
}

/// Result type for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;

type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Run the interactive TUI until the user quits.
///
/// Form submissions go through `auth`. The terminal is always restored,
/// even on error or panic.
///
/// # Errors
///
/// Returns `TuiError::Io` for terminal I/O errors and `TuiError::Event`
/// when reading keys fails.
pub fn run_tui(app: &mut App, auth: &dyn Authenticator) -> TuiResult<()> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let result = run_tui_inner(app, auth);

    let _ = panic::take_hook();
    let restored = restore_terminal();

    result.and(restored)
}

fn run_tui_inner(app: &mut App, auth: &dyn Authenticator) -> TuiResult<()> {
    let mut terminal = setup_terminal()?;
    let event_handler = EventHandler::new();
    let mut last_render = Instant::now();

    loop {
        if app.should_quit() {
            log::debug!("App requested quit");
            break;
        }

        let nav = app.settle();
        if nav.was_redirected() {
            log::debug!(
                "Redirected {} -> {}",
                nav.requested,
                nav.redirects.join(" -> ")
            );
        }

        terminal.draw(|frame| render(frame, app))?;

        if let Some(action) = event_handler.poll(POLL_TIMEOUT, app.is_form_screen())? {
            handle_action(app, action, auth);
        }

        let elapsed = last_render.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
        last_render = Instant::now();
    }

    log::info!("TUI exited normally");
    Ok(())
}

/// Apply an action; submissions need the authenticator.
fn handle_action(app: &mut App, action: Action, auth: &dyn Authenticator) {
    if app.handle_action(action) {
        return;
    }
    match action {
        Action::Submit => app.submit(auth),
        _ => log::trace!("Action not handled: {:?}", action),
    }
}

fn setup_terminal() -> TuiResult<Terminal> {
    log::debug!("Setting up terminal for TUI");

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    log::debug!("Terminal setup complete");
    Ok(terminal)
}

fn restore_terminal() -> TuiResult<()> {
    log::debug!("Restoring terminal");

    let _ = terminal::disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen, cursor::Show);

    Ok(())
}
