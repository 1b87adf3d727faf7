use std::fs;
use storydeck::api::UnauthorizedPolicy;
use storydeck::config::Config;
use tempfile::tempdir;

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
    assert_eq!(config.api.base_url, "http://localhost:8080");
    assert_eq!(config.session.storage_path, None);
    assert!(!config.session.clear_orphan_role);
    assert_eq!(config.session.on_unauthorized, UnauthorizedPolicy::Ignore);
}

#[test]
fn test_load_from_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[api]
base_url = "https://stories.example.com"

[session]
storage_path = "/var/lib/storydeck/session.json"
clear_orphan_role = true
on_unauthorized = "logout"
"#,
    )
    .unwrap();

    let config = Config::load_from_path(&path).unwrap();
    assert_eq!(config.api.base_url, "https://stories.example.com");
    assert_eq!(
        config.session.storage_path.as_deref(),
        Some(std::path::Path::new("/var/lib/storydeck/session.json"))
    );
    assert!(config.session.clear_orphan_role);
    assert_eq!(config.session.on_unauthorized, UnauthorizedPolicy::Logout);
    assert!(config.session.store_options().clear_orphan_role);
}

#[test]
fn test_invalid_policy_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[session]\non_unauthorized = \"shrug\"\n").unwrap();

    assert!(Config::load_from_path(&path).is_err());
}

#[test]
fn test_env_overrides_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[api]\ntimeout_secs = 10\n").unwrap();

    // Use double underscore for nesting
    std::env::set_var("STORYDECK_API__TIMEOUT_SECS", "7");
    let config = Config::load_from_path(&path);
    std::env::remove_var("STORYDECK_API__TIMEOUT_SECS");

    assert_eq!(config.unwrap().api.timeout_secs, 7);
}

#[test]
fn test_save_then_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.api.base_url = "http://127.0.0.1:9000".to_string();
    config.session.on_unauthorized = UnauthorizedPolicy::Logout;
    config.save_to_path(&path).unwrap();

    let loaded = Config::load_from_path(&path).unwrap();
    assert_eq!(loaded.api.base_url, "http://127.0.0.1:9000");
    assert_eq!(loaded.session.on_unauthorized, UnauthorizedPolicy::Logout);
}
