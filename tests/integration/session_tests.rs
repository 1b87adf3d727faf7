use std::fs;
use storydeck::session::{
    DurableStorage, FileStorage, MemoryStorage, SessionStore, StoreOptions, ROLE_KEY, TOKEN_KEY,
};
use tempfile::tempdir;

fn open(path: &std::path::Path) -> SessionStore {
    SessionStore::initialize(Box::new(FileStorage::new(path)))
}

#[test]
fn test_login_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");

    let mut store = open(&path);
    store.login("tok-456", "admin").unwrap();
    assert!(store.is_persisted());
    drop(store);

    let view = open(&path).current();
    assert_eq!(view.token.as_deref(), Some("tok-456"));
    assert_eq!(view.role.as_deref(), Some("admin"));
    assert!(view.is_authenticated);
    assert!(view.is_admin);
}

#[test]
fn test_logout_clears_both_keys_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");

    let mut store = open(&path);
    store.login("tok", "user").unwrap();
    store.logout();
    drop(store);

    let storage = FileStorage::new(&path);
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(storage.get(ROLE_KEY).unwrap(), None);

    let view = open(&path).current();
    assert!(!view.is_authenticated);
    assert_eq!(view.role, None);
}

#[test]
fn test_user_session_lifecycle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");

    // Cold start.
    let mut store = open(&path);
    assert!(!path.exists());
    assert!(!store.current().is_authenticated);

    // Sign in as a regular user.
    store.login("tok-123", "user").unwrap();
    let view = store.current();
    assert!(view.is_authenticated);
    assert!(!view.is_admin);

    // Switch account to an admin without logging out first.
    store.login("tok-456", "admin").unwrap();
    assert!(store.current().is_admin);
    assert_eq!(store.revision(), 2);

    // Reload keeps the latest session.
    drop(store);
    let mut store = open(&path);
    assert_eq!(store.token(), Some("tok-456"));

    store.logout();
    store.logout();
    assert!(!store.current().is_authenticated);
}

#[test]
fn test_session_file_is_created_in_missing_directory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("session.json");

    let mut store = open(&path);
    store.login("tok", "user").unwrap();

    assert!(path.exists());
    assert!(store.is_persisted());
}

#[test]
fn test_unrelated_entries_are_preserved() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");

    let mut storage = FileStorage::new(&path);
    storage.set("theme", "dark").unwrap();

    let mut store = SessionStore::initialize(Box::new(storage));
    store.login("tok", "user").unwrap();
    store.logout();
    drop(store);

    let storage = FileStorage::new(&path);
    assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
}

#[test]
fn test_unwritable_location_keeps_memory_state() {
    let dir = tempdir().unwrap();
    // A directory where the file should be makes every write fail.
    let path = dir.path().join("session.json");
    fs::create_dir_all(&path).unwrap();

    let mut store = open(&path);
    store.login("tok", "admin").unwrap();

    assert!(store.current().is_admin);
    assert!(!store.is_persisted());
    assert!(store.last_persist_error().is_some());
}

#[test]
fn test_quota_failure_then_recovery() {
    // Room for the role entry but not for a long token.
    let storage = MemoryStorage::with_quota(24);
    let mut store = SessionStore::initialize(Box::new(storage));

    store.login("a-token-that-is-far-too-long", "user").unwrap();
    assert!(store.current().is_authenticated);
    assert!(!store.is_persisted());

    store.logout();
    assert!(store.is_persisted());
    assert!(!store.current().is_authenticated);
}

#[test]
fn test_failed_switch_keeps_previous_pair_in_storage() {
    // Fits the admin session but not the moderator one.
    let mut store = SessionStore::initialize(Box::new(MemoryStorage::with_quota(22)));
    store.login("tok-a", "admin").unwrap();
    assert!(store.is_persisted());

    store.login("tok-b", "moderator").unwrap();
    assert!(!store.is_persisted());
    assert_eq!(store.token(), Some("tok-b"));

    let reloaded = SessionStore::initialize(store.into_storage()).current();
    assert_eq!(reloaded.token.as_deref(), Some("tok-a"));
    assert_eq!(reloaded.role.as_deref(), Some("admin"));
}

#[test]
fn test_orphan_role_policy() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");
    FileStorage::new(&path).set(ROLE_KEY, "admin").unwrap();

    let kept = open(&path).current();
    assert!(!kept.is_authenticated);
    assert_eq!(kept.role.as_deref(), Some("admin"));

    let options = StoreOptions {
        clear_orphan_role: true,
    };
    let cleared = SessionStore::initialize_with(Box::new(FileStorage::new(&path)), options);
    assert_eq!(cleared.current().role, None);
    assert_eq!(FileStorage::new(&path).get(ROLE_KEY).unwrap(), None);
}
