//! Session module: the client's authenticated identity and its durable mirror.
//!
//! The session is the pairing of a bearer token and a role. It is rehydrated
//! once at startup, changed only through [`SessionStore::login`] and
//! [`SessionStore::logout`], and mirrored to durable storage after every
//! transition so that it survives restarts.
//!
//! # Architecture
//!
//! * [`data`]: The session model and its derived read view.
//! * [`storage`]: Durable key-value backends (file-backed and in-memory).
//! * [`store`]: The single owner of the session and the only storage writer.
//!
//! # Example
//!
//! ```
//! use storydeck::session::{MemoryStorage, SessionStore};
//!
//! let mut store = SessionStore::initialize(Box::new(MemoryStorage::new()));
//! assert!(!store.current().is_authenticated);
//!
//! store.login("tok-456", "admin").unwrap();
//! assert!(store.current().is_admin);
//!
//! // Simulate a reload: hand the storage to a fresh store.
//! let store = SessionStore::initialize(store.into_storage());
//! assert_eq!(store.current().token.as_deref(), Some("tok-456"));
//! ```

pub mod data;
pub mod storage;
pub mod store;

pub use data::{Session, SessionView, ADMIN_ROLE, ROLE_KEY, TOKEN_KEY};
pub use storage::{DurableStorage, FileStorage, MemoryStorage, StorageError, STORAGE_VERSION};
pub use store::{SessionError, SessionStore, StoreOptions};
