//! The Access Gate: render-or-redirect decision for protected screens.

use serde::Serialize;

use super::router::ENTRY_PATH;
use crate::session::SessionView;

/// Outcome of the gate for a protected screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GateDecision {
    /// Render the protected content inside the shared chrome.
    RenderProtected,
    /// Leave the screen for the given path.
    RedirectTo(&'static str),
}

impl GateDecision {
    /// Whether the protected content may render.
    #[must_use]
    pub fn renders(self) -> bool {
        matches!(self, Self::RenderProtected)
    }
}

/// Decide whether protected content renders for this session.
///
/// Pure over the view: callers re-run it on every render so that a sign-out
/// takes effect on the next frame.
#[must_use]
pub fn decide(session: &SessionView) -> GateDecision {
    if session.is_authenticated {
        GateDecision::RenderProtected
    } else {
        GateDecision::RedirectTo(ENTRY_PATH)
    }
}
