//! The Role-Conditioned View Composer.
//!
//! Two independent role checks live here:
//!
//! - [`compose_chrome`] leaves the admin entry out of the navigation unless
//!   the session is an admin. This only changes what is shown.
//! - [`mount_screen`] runs when a screen becomes active and sends non-admins
//!   away from the admin screen. This is the check that actually keeps them
//!   out, since a hidden link does not stop a typed path.

use serde::Serialize;

use super::router::{Route, DEFAULT_PATH};
use crate::session::SessionView;

/// One entry of the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub route: Route,
    pub label: &'static str,
    /// Whether this is the screen being shown.
    pub active: bool,
}

/// Actions offered next to the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChromeAction {
    /// Open the story editor.
    WriteStory,
    /// End the session and return to the entry screen.
    SignOut,
}

impl ChromeAction {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::WriteStory => "Write Story",
            Self::SignOut => "Sign Out",
        }
    }
}

/// The shared frame around every protected screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chrome {
    pub nav: Vec<NavItem>,
    pub actions: Vec<ChromeAction>,
}

impl Chrome {
    /// Whether the navigation links to `route`.
    #[must_use]
    pub fn contains(&self, route: Route) -> bool {
        self.nav.iter().any(|item| item.route == route)
    }

    /// The active navigation entry, if the current screen has one.
    #[must_use]
    pub fn active(&self) -> Option<&NavItem> {
        self.nav.iter().find(|item| item.active)
    }
}

/// Build the chrome for a protected screen.
#[must_use]
pub fn compose_chrome(session: &SessionView, active: Route) -> Chrome {
    let mut entries = vec![(Route::Dashboard, "Dashboard"), (Route::Feed, "Global Feed")];
    if session.is_admin {
        entries.push((Route::Admin, "Admin"));
    }

    let nav = entries
        .into_iter()
        .map(|(route, label)| NavItem {
            route,
            label,
            active: route == active,
        })
        .collect();

    Chrome {
        nav,
        actions: vec![ChromeAction::WriteStory, ChromeAction::SignOut],
    }
}

/// Outcome of a screen becoming active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScreenOutcome {
    /// The screen's content commits.
    Commit,
    /// The screen sends the client elsewhere before committing.
    RedirectTo(&'static str),
}

/// Run the screen's own role check as it becomes active.
#[must_use]
pub fn mount_screen(route: Route, session: &SessionView) -> ScreenOutcome {
    if route.requires_admin() && !session.is_admin {
        log::debug!("{} requires the admin role, redirecting", route);
        return ScreenOutcome::RedirectTo(DEFAULT_PATH);
    }
    ScreenOutcome::Commit
}
