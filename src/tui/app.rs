//! TUI application state.
//!
//! # Overview
//!
//! [`App`] owns the [`SessionStore`] and the current location (a path). It
//! never caches an access decision: [`App::settle`] re-resolves the location
//! against `store.current()` and follows redirects, and the run loop calls it
//! before every frame. Signing out, or a role change, therefore takes effect
//! on the very next render.
//!
//! # Example
//!
//! ```
//! use storydeck::access::Route;
//! use storydeck::session::{MemoryStorage, SessionStore};
//! use storydeck::tui::app::{Action, App};
//!
//! let store = SessionStore::initialize(Box::new(MemoryStorage::new()));
//! let mut app = App::new(store);
//!
//! // Nobody is signed in: the dashboard bounces to the sign-in form.
//! app.settle();
//! assert_eq!(app.screen(), Some(Route::Login));
//!
//! app.handle_action(Action::Input('x'));
//! assert_eq!(app.form().email(), "x");
//! ```

use crate::access::{navigate, resolve, Chrome, Navigation, Resolution, Route, DEFAULT_PATH, ENTRY_PATH};
use crate::api::{ApiError, Authenticator, Credentials};
use crate::session::SessionStore;

/// User action triggered by keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move to the next navigation entry
    NextTab,
    /// Move to the previous navigation entry
    PreviousTab,
    /// Go to a screen by path
    Open(Route),
    /// End the session and return to the sign-in form
    SignOut,
    /// Switch between the sign-in and sign-up forms
    SwitchForm,
    /// Move focus to the other form field
    NextField,
    /// Type a character into the focused field
    Input(char),
    /// Delete the last character of the focused field
    Backspace,
    /// Submit the form
    Submit,
    /// Dismiss the current notice
    Dismiss,
    /// Quit the application
    Quit,
}

/// Form field with input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Email,
    Password,
}

/// Email and password being typed on the sign-in or sign-up screen.
#[derive(Debug, Clone, Default)]
pub struct CredentialsForm {
    email: String,
    password: String,
    focus: Field,
}

impl CredentialsForm {
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn focus(&self) -> Field {
        self.focus
    }

    /// Whether both fields have content.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.is_empty()
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
        }
    }

    fn next_field(&mut self) {
        self.focus = match self.focus {
            Field::Email => Field::Password,
            Field::Password => Field::Email,
        };
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A message shown in the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Info(text) | Self::Error(text) => text,
        }
    }
}

/// TUI application state.
///
/// Only accessed from the main thread.
#[derive(Debug)]
pub struct App {
    /// The session, shared with every screen through this struct.
    store: SessionStore,
    /// Current location.
    path: String,
    /// Sign-in / sign-up form contents.
    form: CredentialsForm,
    /// Footer message, if any.
    notice: Option<Notice>,
    /// Set once the user asked to quit.
    quitting: bool,
}

impl App {
    /// Create the app at the default screen.
    #[must_use]
    pub fn new(store: SessionStore) -> Self {
        Self::at(store, DEFAULT_PATH)
    }

    /// Create the app at a given path.
    #[must_use]
    pub fn at(store: SessionStore, path: &str) -> Self {
        Self {
            store,
            path: path.to_string(),
            form: CredentialsForm::default(),
            notice: None,
            quitting: false,
        }
    }

    // ==================== Session ====================

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Mutable access for callers that change the session directly.
    pub fn store_mut(&mut self) -> &mut SessionStore {
        &mut self.store
    }

    /// Give the store back, ending the app.
    #[must_use]
    pub fn into_store(self) -> SessionStore {
        self.store
    }

    // ==================== Location ====================

    /// Current location.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Move to a path. Access is checked on the next [`App::settle`].
    pub fn go_to(&mut self, path: &str) {
        if self.path != path {
            log::debug!("Navigating {} -> {}", self.path, path);
            self.path = path.to_string();
        }
    }

    /// Resolve the current location against the committed session.
    #[must_use]
    pub fn view(&self) -> Resolution {
        resolve(&self.path, &self.store.current())
    }

    /// Re-run access checks for the current location and follow redirects.
    pub fn settle(&mut self) -> Navigation {
        let nav = navigate(&self.path, &self.store.current());
        if nav.was_redirected() {
            let target = nav.final_path().to_string();
            self.go_to(&target);
        }
        nav
    }

    /// The screen the current location renders, if any.
    #[must_use]
    pub fn screen(&self) -> Option<Route> {
        match self.view() {
            Resolution::Render { route, .. } => Some(route),
            _ => None,
        }
    }

    /// Chrome of the current screen, if it is a protected screen.
    #[must_use]
    pub fn chrome(&self) -> Option<Chrome> {
        match self.view() {
            Resolution::Render { chrome, .. } => chrome,
            _ => None,
        }
    }

    /// Whether the sign-in or sign-up form is on screen.
    #[must_use]
    pub fn is_form_screen(&self) -> bool {
        matches!(self.screen(), Some(Route::Login | Route::Register))
    }

    // ==================== Form & notices ====================

    #[must_use]
    pub fn form(&self) -> &CredentialsForm {
        &self.form
    }

    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_info(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice::Info(text.into()));
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::debug!("TUI error notice: {}", text);
        self.notice = Some(Notice::Error(text));
    }

    /// Check if the application should quit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.quitting
    }

    // ==================== Actions ====================

    /// Apply an action that only changes local state.
    ///
    /// Returns `false` for actions this method does not handle
    /// ([`Action::Submit`] needs a network round-trip, see [`App::submit`]).
    pub fn handle_action(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => {
                self.quitting = true;
            }
            Action::Dismiss => {
                self.notice = None;
            }
            Action::Open(route) => {
                self.go_to(route.path());
            }
            Action::NextTab => self.cycle_tab(1),
            Action::PreviousTab => self.cycle_tab(-1),
            Action::SignOut => self.sign_out(),
            Action::SwitchForm => {
                let next = match self.screen() {
                    Some(Route::Login) => Route::Register,
                    Some(Route::Register) => Route::Login,
                    _ => return false,
                };
                self.form.clear();
                self.go_to(next.path());
            }
            Action::NextField => {
                if !self.is_form_screen() {
                    return false;
                }
                self.form.next_field();
            }
            Action::Input(c) => {
                if !self.is_form_screen() {
                    return false;
                }
                self.form.focused_mut().push(c);
            }
            Action::Backspace => {
                if !self.is_form_screen() {
                    return false;
                }
                self.form.focused_mut().pop();
            }
            Action::Submit => return false,
        }
        true
    }

    /// End the session and go to the sign-in form.
    pub fn sign_out(&mut self) {
        self.store.logout();
        self.form.clear();
        self.go_to(ENTRY_PATH);
    }

    /// Submit the form on screen through the given authenticator.
    pub fn submit(&mut self, auth: &dyn Authenticator) {
        let Some(route) = self.screen() else {
            return;
        };
        if !matches!(route, Route::Login | Route::Register) {
            return;
        }
        if !self.form.is_complete() {
            self.set_error("Enter an email and a password");
            return;
        }

        let email = self.form.email.trim().to_string();
        let password = self.form.password.clone();
        match route {
            Route::Login => match auth.login(&email, &password) {
                Ok(credentials) => self.complete_login(credentials),
                Err(e) => self.set_error(failure_message(&e, "Login failed. Please try again.")),
            },
            _ => match auth.signup(&email, &password) {
                Ok(_) => {
                    self.form.clear();
                    self.go_to(ENTRY_PATH);
                    self.set_info("Account created! Sign in to continue.");
                }
                Err(e) => self.set_error(failure_message(&e, "Registration failed")),
            },
        }
    }

    /// Store credentials from a successful sign-in and open the default screen.
    pub fn complete_login(&mut self, credentials: Credentials) {
        match self.store.login(credentials.token, credentials.role) {
            Ok(()) => {
                self.form.clear();
                self.go_to(DEFAULT_PATH);
                self.set_info("Welcome back!");
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    fn cycle_tab(&mut self, step: isize) {
        let Some(chrome) = self.chrome() else {
            return;
        };
        let len = chrome.nav.len() as isize;
        if len == 0 {
            return;
        }
        let next = match chrome.nav.iter().position(|item| item.active) {
            Some(current) => (current as isize + step).rem_euclid(len),
            None => 0,
        };
        let route = chrome.nav[next as usize].route;
        self.go_to(route.path());
    }
}

/// The service's own message for a rejection, a fallback otherwise.
fn failure_message(err: &ApiError, fallback: &str) -> String {
    match err {
        ApiError::Rejected { message, .. } if !message.is_empty() => message.clone(),
        _ => fallback.to_string(),
    }
}
