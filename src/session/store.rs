//! The session store: single owner of the session and of its durable mirror.
//!
//! # Overview
//!
//! [`SessionStore`] is constructed once per process by [`SessionStore::initialize`],
//! which rehydrates the session from durable storage. After that, the session
//! changes only through [`SessionStore::login`] and [`SessionStore::logout`].
//! Each transition commits the in-memory state first and then flushes it to
//! storage in one write, before control returns to the caller. The next read
//! through [`SessionStore::current`] therefore always sees the committed state.
//!
//! The storage handle is private: nothing else can write the `token` and
//! `role` entries while the store is alive. [`SessionStore::into_storage`]
//! gives the handle back by consuming the store, which is how a reload is
//! modelled.
//!
//! # Failure handling
//!
//! Storage failures never escape the store. A failed read during rehydration
//! is treated as a missing entry; a failed flush is logged and the in-memory
//! session stays authoritative for the rest of the process.
//!
//! # Example
//!
//! ```
//! use storydeck::session::{MemoryStorage, SessionStore};
//!
//! let mut store = SessionStore::initialize(Box::new(MemoryStorage::new()));
//! store.login("tok-123", "user").unwrap();
//!
//! let view = store.current();
//! assert!(view.is_authenticated);
//! assert!(!view.is_admin);
//!
//! store.logout();
//! assert!(!store.current().is_authenticated);
//! ```

use thiserror::Error;

use super::data::{Session, SessionView, ROLE_KEY, TOKEN_KEY};
use super::storage::DurableStorage;

/// Errors returned by session transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// `login` was called without a token.
    #[error("login requires a non-empty token")]
    EmptyToken,
}

/// Rehydration options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Drop a rehydrated role that has no token next to it.
    ///
    /// Off by default: the role is kept as stored.
    pub clear_orphan_role: bool,
}

/// Owner of the client session.
///
/// All reads and transitions happen on the UI thread.
#[derive(Debug)]
pub struct SessionStore {
    /// The committed session.
    session: Session,
    /// Durable mirror. Only this store writes to it.
    storage: Box<dyn DurableStorage>,
    /// Outcome of the most recent flush.
    last_flush: Result<(), String>,
    /// Number of completed transitions.
    revision: u64,
}

impl SessionStore {
    /// Rehydrate the session from storage with default options.
    pub fn initialize(storage: Box<dyn DurableStorage>) -> Self {
        Self::initialize_with(storage, StoreOptions::default())
    }

    /// Rehydrate the session from storage.
    ///
    /// Missing or unreadable entries yield `None`. The token is not validated.
    pub fn initialize_with(storage: Box<dyn DurableStorage>, options: StoreOptions) -> Self {
        let token = read_entry(storage.as_ref(), TOKEN_KEY);
        let role = read_entry(storage.as_ref(), ROLE_KEY);

        let mut store = Self {
            session: Session::new(token, role),
            storage,
            last_flush: Ok(()),
            revision: 0,
        };

        log::debug!(
            "Session rehydrated: authenticated={}, role={:?}",
            store.session.is_authenticated(),
            store.session.role
        );

        if store.session.has_orphan_role() {
            if options.clear_orphan_role {
                log::info!("Clearing stored role that has no token");
                store.session.role = None;
                store.flush();
            } else {
                log::debug!("Stored role has no token; keeping it as stored");
            }
        }

        store
    }

    /// Start an authenticated session.
    ///
    /// An empty `role` is stored as no role. Rejects an empty `token`
    /// without changing state.
    pub fn login(
        &mut self,
        token: impl Into<String>,
        role: impl Into<String>,
    ) -> Result<(), SessionError> {
        let token = token.into();
        if token.is_empty() {
            log::warn!("Rejected login without a token");
            return Err(SessionError::EmptyToken);
        }
        let role = role.into();
        let role = if role.is_empty() { None } else { Some(role) };

        self.session = Session::new(Some(token), role);
        self.revision += 1;
        log::info!("Signed in (role: {})", self.role_label());
        self.flush();
        Ok(())
    }

    /// End the session. Calling it again leaves the same state.
    pub fn logout(&mut self) {
        let was_authenticated = self.session.is_authenticated();
        self.session = Session::default();
        self.revision += 1;
        if was_authenticated {
            log::info!("Signed out");
        } else {
            log::debug!("Sign-out requested with no active session");
        }
        self.flush();
    }

    /// Snapshot of the committed session and its derived flags.
    #[must_use]
    pub fn current(&self) -> SessionView {
        SessionView::from(&self.session)
    }

    /// The committed bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.session.token.as_deref()
    }

    /// Number of transitions since rehydration.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the last flush reached durable storage.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.last_flush.is_ok()
    }

    /// Error message of the last failed flush, if the last flush failed.
    #[must_use]
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_flush.as_ref().err().map(String::as_str)
    }

    /// Give back the storage handle, ending this store.
    #[must_use]
    pub fn into_storage(self) -> Box<dyn DurableStorage> {
        self.storage
    }

    fn role_label(&self) -> &str {
        self.session.role.as_deref().unwrap_or("none")
    }

    /// Mirror the committed session to storage in one write.
    fn flush(&mut self) {
        let token = self.session.token.as_deref();
        let role = self.session.role.as_deref();
        let result = self
            .storage
            .write_entries(&[(TOKEN_KEY, token), (ROLE_KEY, role)]);

        self.last_flush = match result {
            Ok(()) => Ok(()),
            Err(e) => {
                log::warn!("Failed to persist session, keeping it in memory: {}", e);
                Err(e.to_string())
            }
        };
    }
}

impl crate::api::TokenSource for SessionStore {
    fn bearer_token(&self) -> Option<String> {
        self.session.token.clone()
    }
}

fn read_entry(storage: &dyn DurableStorage, key: &str) -> Option<String> {
    storage.get(key).unwrap_or_else(|e| {
        log::warn!("Could not read stored {}, treating it as absent: {}", key, e);
        None
    })
}
