//! Client for the remote story service.
//!
//! The service exchanges credentials for a bearer token and a role
//! (`POST /login`), creates accounts (`POST /signup`), and expects every
//! other request to carry `Authorization: Bearer <token>`.
//!
//! The token is never cached here. Each request asks its [`TokenSource`]
//! (in practice the [`SessionStore`](crate::session::SessionStore)) for the
//! current token while the request is being built.
//!
//! A `401`/`403` answer is returned to the caller like any other rejection.
//! Whether it should also end the session is an explicit policy
//! ([`UnauthorizedPolicy`]), applied by [`apply_unauthorized_policy`].

pub mod client;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::{ApiConfig, Authenticator, Credentials, HttpApi};

use crate::session::SessionStore;

/// Errors returned by the story service client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or its response could not be read.
    #[error("request to the story service failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("story service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("unexpected response from the story service: {0}")]
    InvalidResponse(String),

    /// The configured base URL or request path is not a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The stored session token cannot be sent as an HTTP header.
    #[error("stored session token is not a valid header value")]
    InvalidToken,
}

impl ApiError {
    /// Whether the service refused the credentials or the token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Rejected { status: 401 | 403, .. })
    }
}

/// Provides the bearer token for outgoing requests.
pub trait TokenSource {
    /// The token to attach right now, if any.
    fn bearer_token(&self) -> Option<String>;
}

/// What to do with the session when the service rejects its token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnauthorizedPolicy {
    /// Report the failure at the call site only; the session is kept.
    #[default]
    Ignore,
    /// End the session.
    Logout,
}

/// Apply the policy to a failed request. Returns whether the session ended.
pub fn apply_unauthorized_policy(
    store: &mut SessionStore,
    err: &ApiError,
    policy: UnauthorizedPolicy,
) -> bool {
    if !err.is_unauthorized() {
        return false;
    }
    match policy {
        UnauthorizedPolicy::Ignore => {
            log::debug!("Token rejected by the story service; keeping the session");
            false
        }
        UnauthorizedPolicy::Logout => {
            log::info!("Token rejected by the story service; signing out");
            store.logout();
            true
        }
    }
}
