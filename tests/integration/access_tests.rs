use storydeck::access::{navigate, resolve, ChromeAction, Resolution, Route};
use storydeck::session::{MemoryStorage, SessionStore};

fn store_with(token: Option<&str>, role: Option<&str>) -> SessionStore {
    let mut entries = Vec::new();
    if let Some(token) = token {
        entries.push(("token", token));
    }
    if let Some(role) = role {
        entries.push(("role", role));
    }
    SessionStore::initialize(Box::new(MemoryStorage::with_entries(entries)))
}

#[test]
fn test_anonymous_is_sent_to_login_from_every_protected_screen() {
    let store = store_with(None, None);
    for route in Route::ALL.iter().filter(|r| r.is_protected()) {
        let nav = navigate(route.path(), &store.current());
        assert_eq!(nav.route(), Some(Route::Login), "from {}", route);
        assert_eq!(nav.redirects, vec!["/login"]);
    }
}

#[test]
fn test_public_screens_render_without_chrome() {
    let store = store_with(Some("tok"), Some("admin"));
    for path in ["/login", "/register"] {
        match resolve(path, &store.current()) {
            Resolution::Render { chrome, .. } => assert!(chrome.is_none()),
            other => panic!("unexpected resolution for {}: {:?}", path, other),
        }
    }
}

#[test]
fn test_user_chrome_hides_admin() {
    let store = store_with(Some("tok-123"), Some("user"));
    let nav = navigate("/feed", &store.current());

    let Resolution::Render { route, chrome } = nav.resolution else {
        panic!("feed should render");
    };
    let chrome = chrome.unwrap();
    assert_eq!(route, Route::Feed);
    assert!(!chrome.contains(Route::Admin));
    assert_eq!(chrome.active().unwrap().route, Route::Feed);
    assert_eq!(
        chrome.actions,
        vec![ChromeAction::WriteStory, ChromeAction::SignOut]
    );
}

#[test]
fn test_admin_sees_admin_screen() {
    let store = store_with(Some("tok-456"), Some("admin"));
    let nav = navigate("/admin", &store.current());
    assert!(!nav.was_redirected());
    assert_eq!(nav.route(), Some(Route::Admin));
}

#[test]
fn test_direct_admin_navigation_by_user_lands_on_dashboard() {
    let store = store_with(Some("tok-123"), Some("user"));
    let nav = navigate("/admin", &store.current());
    assert_eq!(nav.redirects, vec!["/"]);
    assert_eq!(nav.route(), Some(Route::Dashboard));
    assert_eq!(nav.final_path(), "/");
}

#[test]
fn test_role_case_matters() {
    let store = store_with(Some("tok"), Some("Admin"));
    let nav = navigate("/admin", &store.current());
    assert_eq!(nav.route(), Some(Route::Dashboard));
}

#[test]
fn test_orphan_admin_role_is_still_anonymous() {
    let store = store_with(None, Some("admin"));
    let view = store.current();
    assert!(view.is_admin);
    assert!(!view.is_authenticated);
    let nav = navigate("/admin", &view);
    assert_eq!(nav.route(), Some(Route::Login));
}

#[test]
fn test_decision_follows_store_changes() {
    let mut store = store_with(None, None);
    assert_eq!(navigate("/", &store.current()).route(), Some(Route::Login));

    store.login("tok", "admin").unwrap();
    assert_eq!(navigate("/admin", &store.current()).route(), Some(Route::Admin));

    store.logout();
    assert_eq!(navigate("/admin", &store.current()).route(), Some(Route::Login));
}

#[test]
fn test_unknown_path() {
    let store = store_with(Some("tok"), Some("user"));
    let nav = navigate("/nowhere", &store.current());
    assert_eq!(nav.route(), None);
    assert!(matches!(nav.resolution, Resolution::NotFound { .. }));
}
