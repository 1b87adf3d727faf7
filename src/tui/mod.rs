//! Terminal User Interface module.
//!
//! The interactive client for the story platform, built on ratatui with the
//! crossterm backend.
//!
//! - [`app`]: Application state (session, location, form, notices)
//! - [`events`]: Keyboard event handling
//! - [`ui`]: Ratatui rendering
//! - [`run`]: Terminal setup and the main loop
//!
//! # Architecture
//!
//! The TUI follows a unidirectional data flow:
//! 1. Events are captured from the terminal (crossterm)
//! 2. Events are translated to Actions
//! 3. Actions modify the App state
//! 4. The location is settled against the session
//! 5. The UI renders based on the current App state

pub mod app;
pub mod events;
pub mod run;
pub mod ui;

pub use app::{Action, App, CredentialsForm, Field, Notice};
pub use events::{map_key, EventError, EventHandler};
pub use run::{run_tui, TuiError, TuiResult};
pub use ui::render;
