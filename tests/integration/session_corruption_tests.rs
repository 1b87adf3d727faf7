use std::fs::{self, File};
use storydeck::session::{DurableStorage, FileStorage, SessionStore, StorageError, TOKEN_KEY};
use tempfile::tempdir;

fn write_valid_session(path: &std::path::Path) {
    let mut store = SessionStore::initialize(Box::new(FileStorage::new(path)));
    store.login("tok-456", "admin").unwrap();
}

#[test]
fn test_load_invalid_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, "not a json").unwrap();

    let err = FileStorage::new(&path).get(TOKEN_KEY).unwrap_err();
    assert!(matches!(err, StorageError::Corrupted(_)));
    assert!(err.to_string().contains("failed to parse storage envelope"));
}

#[test]
fn test_load_empty_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");
    File::create(&path).unwrap();

    assert!(FileStorage::new(&path).get(TOKEN_KEY).is_err());
}

#[test]
fn test_load_unknown_version() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");
    write_valid_session(&path);

    let content = fs::read_to_string(&path).unwrap();
    let mut envelope: serde_json::Value = serde_json::from_str(&content).unwrap();
    envelope["version"] = serde_json::json!(999);
    fs::write(&path, serde_json::to_string(&envelope).unwrap()).unwrap();

    let err = FileStorage::new(&path).get(TOKEN_KEY).unwrap_err().to_string();
    assert!(err.contains("unsupported storage version"));
    assert!(err.contains("999"));
}

#[test]
fn test_load_tampered_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");
    write_valid_session(&path);

    // Promote the role by hand without updating the checksum.
    let content = fs::read_to_string(&path).unwrap();
    let mut envelope: serde_json::Value = serde_json::from_str(&content).unwrap();
    envelope["entries"]["token"] = serde_json::json!("forged");
    fs::write(&path, serde_json::to_string(&envelope).unwrap()).unwrap();

    let err = FileStorage::new(&path).get(TOKEN_KEY).unwrap_err().to_string();
    assert!(err.contains("checksum mismatch"));
}

#[test]
fn test_corrupted_file_starts_anonymous() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, "{ \"version\": 1, ").unwrap();

    let store = SessionStore::initialize(Box::new(FileStorage::new(&path)));
    let view = store.current();
    assert!(!view.is_authenticated);
    assert!(!view.is_admin);
}

#[test]
fn test_login_replaces_corrupted_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, "garbage").unwrap();

    let mut store = SessionStore::initialize(Box::new(FileStorage::new(&path)));
    store.login("tok", "user").unwrap();
    assert!(store.is_persisted());
    drop(store);

    let storage = FileStorage::new(&path);
    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok"));
}

#[test]
fn test_no_temp_file_left_behind() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");
    write_valid_session(&path);

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["session.json".to_string()]);
}
