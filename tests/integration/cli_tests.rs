use clap::Parser;
use std::path::Path;
use storydeck::cli::Cli;
use storydeck::error::ExitCode;
use storydeck::run_app;
use storydeck::session::{FileStorage, SessionStore};
use tempfile::{tempdir, TempDir};

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempdir().unwrap(),
        }
    }

    fn session_path(&self) -> std::path::PathBuf {
        self.dir.path().join("session.json")
    }

    fn sign_in(&self, token: &str, role: &str) {
        let mut store = SessionStore::initialize(Box::new(FileStorage::new(self.session_path())));
        store.login(token, role).unwrap();
    }

    fn run(&self, args: &[&str]) -> anyhow::Result<ExitCode> {
        let config = self.dir.path().join("config.toml");
        let session = self.session_path();
        let mut argv = vec![
            "storydeck",
            "--no-color",
            "--config",
            path_str(&config),
            "--storage",
            path_str(&session),
        ];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv.iter().map(|s| s.to_string())).unwrap();
        run_app(cli)
    }

    fn stored(&self) -> SessionStore {
        SessionStore::initialize(Box::new(FileStorage::new(self.session_path())))
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_open_as_anonymous_redirects() {
    let ws = Workspace::new();
    let code = ws.run(&["open", "/feed"]).unwrap();
    assert_eq!(code, ExitCode::Redirected);
}

#[test]
fn test_open_public_screen() {
    let ws = Workspace::new();
    let code = ws.run(&["open", "/register", "--json"]).unwrap();
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_open_admin_as_admin() {
    let ws = Workspace::new();
    ws.sign_in("tok-456", "admin");
    assert_eq!(ws.run(&["open", "/admin"]).unwrap(), ExitCode::Success);
}

#[test]
fn test_open_admin_as_user() {
    let ws = Workspace::new();
    ws.sign_in("tok-123", "user");
    assert_eq!(ws.run(&["open", "/admin"]).unwrap(), ExitCode::Redirected);
}

#[test]
fn test_open_unknown_path_fails() {
    let ws = Workspace::new();
    ws.sign_in("tok-123", "user");
    let err = ws.run(&["open", "/nowhere"]).unwrap_err();
    assert!(err.to_string().contains("/nowhere"));
    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
}

#[test]
fn test_status_and_logout() {
    let ws = Workspace::new();
    ws.sign_in("tok-123", "user");

    assert_eq!(ws.run(&["status", "--json"]).unwrap(), ExitCode::Success);
    assert!(ws.stored().current().is_authenticated);

    assert_eq!(ws.run(&["logout"]).unwrap(), ExitCode::Success);
    let view = ws.stored().current();
    assert!(!view.is_authenticated);
    assert_eq!(view.role, None);

    // Logging out again is harmless.
    assert_eq!(ws.run(&["logout"]).unwrap(), ExitCode::Success);
}

#[test]
fn test_get_with_unreachable_service_keeps_session() {
    let ws = Workspace::new();
    ws.sign_in("tok-123", "user");

    let err = ws
        .run(&["--api-url", "http://127.0.0.1:9", "get", "/stories/my"])
        .unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
    assert!(ws.stored().current().is_authenticated);
}

#[test]
fn test_config_init_writes_defaults_once() {
    let ws = Workspace::new();
    let config_path = ws.dir.path().join("config.toml");

    assert_eq!(ws.run(&["config", "init"]).unwrap(), ExitCode::Success);
    let written = storydeck::config::Config::load_from_path(&config_path).unwrap();
    assert_eq!(written.api.base_url, "http://localhost:8080");

    let err = ws.run(&["config", "init"]).unwrap_err();
    assert!(err.to_string().contains("already exists"));

    std::fs::write(&config_path, "[api]\nbase_url = \"http://edited:1\"\n").unwrap();
    assert_eq!(ws.run(&["config", "init", "--force"]).unwrap(), ExitCode::Success);
    let reset = std::fs::read_to_string(&config_path).unwrap();
    assert!(!reset.contains("edited"));

    assert_eq!(ws.run(&["config", "show"]).unwrap(), ExitCode::Success);
}
