//! Route table and path resolution.
//!
//! [`resolve`] answers one question for one path: does a screen render, and
//! with which chrome, or where does the client go instead? [`navigate`]
//! repeats that until a screen renders, recording every redirect on the way.

use serde::Serialize;
use std::fmt;

use super::composer::{compose_chrome, mount_screen, Chrome, ScreenOutcome};
use super::gate::{decide, GateDecision};
use crate::session::SessionView;

/// Path of the unauthenticated entry screen.
pub const ENTRY_PATH: &str = "/login";

/// Path of the default authenticated screen.
pub const DEFAULT_PATH: &str = "/";

/// Upper bound on redirects followed by [`navigate`].
const MAX_REDIRECTS: usize = 4;

/// A screen of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Route {
    /// Sign-in form (entry screen).
    Login,
    /// Sign-up form.
    Register,
    /// The signed-in user's own stories (default screen).
    Dashboard,
    /// Public stories from every author.
    Feed,
    /// Story editor.
    Create,
    /// Login history, restricted to admins.
    Admin,
}

impl Route {
    /// Every route, in navigation order.
    pub const ALL: [Route; 6] = [
        Route::Login,
        Route::Register,
        Route::Dashboard,
        Route::Feed,
        Route::Create,
        Route::Admin,
    ];

    /// Parse a path. A single trailing slash is ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.strip_suffix('/').unwrap_or(trimmed)
        } else {
            trimmed
        };
        Self::ALL.into_iter().find(|r| r.path() == normalized)
    }

    /// The route's path.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/",
            Self::Feed => "/feed",
            Self::Create => "/create",
            Self::Admin => "/admin",
        }
    }

    /// Screen title.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Sign In",
            Self::Register => "Create Account",
            Self::Dashboard => "Your Stories",
            Self::Feed => "Global Feed",
            Self::Create => "Write Story",
            Self::Admin => "Admin Console",
        }
    }

    /// Whether the Access Gate guards this route.
    #[must_use]
    pub fn is_protected(self) -> bool {
        !matches!(self, Self::Login | Self::Register)
    }

    /// Whether the route additionally requires the admin role.
    #[must_use]
    pub fn requires_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Result of resolving one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Resolution {
    /// The screen renders. Protected screens carry the shared chrome.
    Render { route: Route, chrome: Option<Chrome> },
    /// The screen does not render; go to `to` instead.
    Redirect { from: Route, to: &'static str },
    /// No screen exists at this path. Nothing renders.
    NotFound { path: String },
}

/// Resolve a path against the session.
///
/// The gate runs first, then the screen's own mount check. The chrome is
/// composed only for screens that actually render.
#[must_use]
pub fn resolve(path: &str, session: &SessionView) -> Resolution {
    let Some(route) = Route::from_path(path) else {
        return Resolution::NotFound {
            path: path.to_string(),
        };
    };

    if !route.is_protected() {
        return Resolution::Render {
            route,
            chrome: None,
        };
    }

    if let GateDecision::RedirectTo(to) = decide(session) {
        return Resolution::Redirect { from: route, to };
    }

    match mount_screen(route, session) {
        ScreenOutcome::Commit => Resolution::Render {
            route,
            chrome: Some(compose_chrome(session, route)),
        },
        ScreenOutcome::RedirectTo(to) => Resolution::Redirect { from: route, to },
    }
}

/// Outcome of following redirects from a requested path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    /// The path that was asked for.
    pub requested: String,
    /// Paths redirected to, in order.
    pub redirects: Vec<&'static str>,
    /// The final resolution. Never a redirect unless the hop limit was hit.
    pub resolution: Resolution,
}

impl Navigation {
    /// The route that finally rendered, if any.
    #[must_use]
    pub fn route(&self) -> Option<Route> {
        match self.resolution {
            Resolution::Render { route, .. } => Some(route),
            _ => None,
        }
    }

    /// Whether at least one redirect happened.
    #[must_use]
    pub fn was_redirected(&self) -> bool {
        !self.redirects.is_empty()
    }

    /// The path the client ends up on.
    #[must_use]
    pub fn final_path(&self) -> &str {
        match self.redirects.last() {
            Some(path) => *path,
            None => self.requested.as_str(),
        }
    }
}

/// Resolve a path and follow redirects until a screen renders.
#[must_use]
pub fn navigate(path: &str, session: &SessionView) -> Navigation {
    let mut redirects = Vec::new();
    let mut resolution = resolve(path, session);

    while let Resolution::Redirect { from, to } = resolution {
        if redirects.len() == MAX_REDIRECTS {
            log::warn!("Redirect limit reached while navigating to {}", path);
            break;
        }
        log::debug!("Redirecting {} -> {}", from, to);
        redirects.push(to);
        resolution = resolve(to, session);
    }

    Navigation {
        requested: path.to_string(),
        redirects,
        resolution,
    }
}
