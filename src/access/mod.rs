//! Access control for the client's screens.
//!
//! # Overview
//!
//! Every screen is a [`Route`]. Deciding whether a route may render is split
//! into two pure checks over a [`SessionView`](crate::session::SessionView):
//!
//! - [`gate`]: the Access Gate. Protected routes render only with a session;
//!   otherwise the client is sent to the entry screen.
//! - [`composer`]: the Role-Conditioned View Composer. It builds the
//!   navigation chrome (admin entry only for admins) and bounces non-admins
//!   off the admin screen when it mounts.
//! - [`router`]: combines both checks into a [`Resolution`] for a path and
//!   follows redirects until a screen renders.
//!
//! None of these checks are a security boundary. The story service must
//! re-validate the token and role on every privileged request.
//!
//! # Example
//!
//! ```
//! use storydeck::access::{navigate, Route};
//! use storydeck::session::{MemoryStorage, SessionStore};
//!
//! let mut store = SessionStore::initialize(Box::new(MemoryStorage::new()));
//! assert_eq!(navigate("/feed", &store.current()).route(), Some(Route::Login));
//!
//! store.login("tok-123", "user").unwrap();
//! assert_eq!(navigate("/admin", &store.current()).route(), Some(Route::Dashboard));
//! ```

pub mod composer;
pub mod gate;
pub mod router;

pub use composer::{compose_chrome, mount_screen, Chrome, ChromeAction, NavItem, ScreenOutcome};
pub use gate::{decide, GateDecision};
pub use router::{navigate, resolve, Navigation, Resolution, Route, DEFAULT_PATH, ENTRY_PATH};
