//! Data structures for the client session.

use serde::{Deserialize, Serialize};

/// Durable storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Durable storage key holding the role tag.
pub const ROLE_KEY: &str = "role";

/// The only role value that grants admin affordances.
pub const ADMIN_ROLE: &str = "admin";

/// The authenticated identity of this client.
///
/// `role` is not tied to `token`: either may be present without the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer credential issued by the story service.
    pub token: Option<String>,
    /// Coarse authorization tag (`"admin"` or a standard user role).
    pub role: Option<String>,
}

impl Session {
    /// Create a session from optional token and role values.
    pub fn new(token: Option<String>, role: Option<String>) -> Self {
        Self { token, role }
    }

    /// Whether a token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Whether the role is exactly [`ADMIN_ROLE`].
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }

    /// Whether a role is present without a token.
    #[must_use]
    pub fn has_orphan_role(&self) -> bool {
        self.token.is_none() && self.role.is_some()
    }
}

/// Read view returned by [`crate::session::SessionStore::current`].
///
/// The booleans are computed from the fields when the view is taken and are
/// never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub token: Option<String>,
    pub role: Option<String>,
    pub is_authenticated: bool,
    pub is_admin: bool,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            token: session.token.clone(),
            role: session.role.clone(),
            is_authenticated: session.is_authenticated(),
            is_admin: session.is_admin(),
        }
    }
}

impl SessionView {
    /// The view of a client with no session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }
}
