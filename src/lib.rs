//! StoryDeck - terminal client for the story platform
//!
//! Keeps the authenticated session (bearer token and role) in durable
//! storage, decides which screens the session may see, and talks to the
//! story service over HTTP.
//!
//! - [`session`]: the session store and its durable backends
//! - [`access`]: route gate, admin check and navigation chrome
//! - [`api`]: HTTP client with bearer authorization
//! - [`tui`]: the interactive client

pub mod access;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod tui;

use anyhow::Context;
use serde::Serialize;
use yansi::Paint;

use crate::access::{navigate, Navigation, Resolution};
use crate::api::{apply_unauthorized_policy, ApiConfig, Authenticator, HttpApi};
use crate::cli::{
    Cli, Commands, ConfigAction, ConfigArgs, CredentialArgs, GetArgs, OpenArgs, StatusArgs,
};
use crate::config::Config;
use crate::error::ExitCode;
use crate::session::{FileStorage, SessionStore, SessionView};

/// Main application logic.
///
/// Loads configuration, opens the session store and runs one command.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    if cli.no_color {
        yansi::disable();
    }
    log::debug!("Log level: {}", logging::current_level_name());

    if let Commands::Config(ConfigArgs {
        action: ConfigAction::Init { force },
    }) = &cli.command
    {
        return init_config(cli.config.as_deref(), *force);
    }

    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if let Some(path) = cli.storage {
        config.session.storage_path = Some(path);
    }

    let storage = match &config.session.storage_path {
        Some(path) => FileStorage::new(path),
        None => FileStorage::default_location()?,
    };
    log::debug!("Session storage: {}", storage.path().display());
    let mut store =
        SessionStore::initialize_with(Box::new(storage), config.session.store_options());

    match cli.command {
        Commands::Login(args) => login(&mut store, &config.api, &args),
        Commands::Register(args) => register(&config.api, &args),
        Commands::Logout => {
            store.logout();
            report_persistence(&store);
            println!("Signed out");
            Ok(ExitCode::Success)
        }
        Commands::Status(args) => status(&store, &args),
        Commands::Open(args) => open(&store, &args),
        Commands::Get(args) => get(&mut store, &config, &args),
        Commands::Config(_) => {
            print!("{}", config.to_toml()?);
            Ok(ExitCode::Success)
        }
        Commands::Tui => {
            let api = HttpApi::new(config.api.clone())?;
            let mut app = tui::App::new(store);
            tui::run_tui(&mut app, &api)?;
            Ok(ExitCode::Success)
        }
    }
}

/// Write the default configuration to `path`, or to the platform path.
fn init_config(path: Option<&std::path::Path>, force: bool) -> anyhow::Result<ExitCode> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::config_path()?,
    };
    if path.exists() && !force {
        anyhow::bail!(
            "configuration file {} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Config::default().save_to_path(&path)?;
    log::info!("Wrote default configuration to {}", path.display());
    println!("Wrote {}", path.display());
    Ok(ExitCode::Success)
}

fn login(store: &mut SessionStore, api: &ApiConfig, args: &CredentialArgs) -> anyhow::Result<ExitCode> {
    let api = HttpApi::new(api.clone())?;
    let credentials = api
        .login(&args.email, &args.password)
        .context("login failed")?;
    store.login(credentials.token, credentials.role)?;
    report_persistence(store);

    let view = store.current();
    println!(
        "Signed in as {} ({})",
        args.email.as_str().bold(),
        role_label(&view)
    );
    Ok(ExitCode::Success)
}

fn register(api: &ApiConfig, args: &CredentialArgs) -> anyhow::Result<ExitCode> {
    let api = HttpApi::new(api.clone())?;
    let message = api
        .signup(&args.email, &args.password)
        .context("registration failed")?;
    println!("{}", message.as_str().green());
    println!("Sign in with `storydeck login --email {}`", args.email);
    Ok(ExitCode::Success)
}

/// `status --json` output. The token is left out unless asked for.
#[derive(Debug, Serialize)]
struct StatusReport {
    #[serde(flatten)]
    session: SessionView,
    persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    persist_error: Option<String>,
}

fn status(store: &SessionStore, args: &StatusArgs) -> anyhow::Result<ExitCode> {
    let mut view = store.current();
    if !args.show_token {
        view.token = view.token.map(|_| "<hidden>".to_string());
    }

    if args.json {
        let report = StatusReport {
            session: view,
            persisted: store.is_persisted(),
            persist_error: store.last_persist_error().map(str::to_string),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(ExitCode::Success);
    }

    if view.is_authenticated {
        println!("{} ({})", "Signed in".green().bold(), role_label(&view));
        if let Some(token) = &view.token {
            println!("Token: {}", token);
        }
    } else {
        println!("{}", "Not signed in".yellow());
        if let Some(role) = &view.role {
            println!("Stored role without a token: {}", role);
        }
    }
    Ok(ExitCode::Success)
}

fn open(store: &SessionStore, args: &OpenArgs) -> anyhow::Result<ExitCode> {
    let nav = navigate(&args.path, &store.current());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&nav)?);
    } else {
        print_navigation(&nav);
    }

    match &nav.resolution {
        Resolution::NotFound { path } => anyhow::bail!("no screen at {}", path),
        _ if nav.was_redirected() => Ok(ExitCode::Redirected),
        _ => Ok(ExitCode::Success),
    }
}

fn print_navigation(nav: &Navigation) {
    let mut from = nav.requested.as_str();
    for to in &nav.redirects {
        println!("{} {} -> {}", "redirect".yellow(), from, to);
        from = *to;
    }

    match &nav.resolution {
        Resolution::Render { route, chrome } => {
            println!("{} {} ({})", "render".green(), route.title().bold(), route.path());
            if let Some(chrome) = chrome {
                let nav_line: Vec<String> = chrome
                    .nav
                    .iter()
                    .map(|item| {
                        if item.active {
                            format!("[{}]", item.label)
                        } else {
                            item.label.to_string()
                        }
                    })
                    .collect();
                let actions: Vec<&str> = chrome.actions.iter().map(|a| a.label()).collect();
                println!("  nav:     {}", nav_line.join(" | "));
                println!("  actions: {}", actions.join(" | "));
            }
        }
        Resolution::Redirect { to, .. } => {
            println!("{} redirect limit reached at {}", "stopped".red(), to);
        }
        Resolution::NotFound { path } => {
            println!("{} {}", "not found".red(), path);
        }
    }
}

fn get(store: &mut SessionStore, config: &Config, args: &GetArgs) -> anyhow::Result<ExitCode> {
    let api = HttpApi::new(config.api.clone())?;
    match api.get(&*store, &args.path) {
        Ok(body) => {
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(ExitCode::Success)
        }
        Err(err) => {
            if apply_unauthorized_policy(store, &err, config.session.on_unauthorized) {
                report_persistence(store);
                eprintln!("{}", "Session ended: the service rejected the token".yellow());
            }
            Err(err.into())
        }
    }
}

fn role_label(view: &SessionView) -> &str {
    view.role.as_deref().unwrap_or("no role")
}

/// Warn when the last session change only lives in memory.
fn report_persistence(store: &SessionStore) {
    if let Some(err) = store.last_persist_error() {
        eprintln!(
            "{} session change was not saved: {}",
            "warning:".yellow().bold(),
            err
        );
    }
}
