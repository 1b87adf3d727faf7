//! Command-line interface definitions for StoryDeck.
//!
//! # Example
//!
//! ```bash
//! # Sign in (password from the environment)
//! STORYDECK_PASSWORD=secret storydeck login --email me@example.com
//!
//! # Show the current session
//! storydeck status --json
//!
//! # Check where a path lands for the current session
//! storydeck open /admin
//!
//! # Interactive client
//! storydeck tui
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Terminal client for the story platform.
#[derive(Debug, Parser)]
#[command(name = "storydeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (defaults to the platform config dir)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Session file (overrides `session.storage_path`)
    #[arg(long, value_name = "PATH", global = true)]
    pub storage: Option<PathBuf>,

    /// Story service base URL (overrides `api.base_url`)
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login(CredentialArgs),
    /// Create an account (sign in afterwards)
    Register(CredentialArgs),
    /// End the stored session
    Logout,
    /// Show the current session
    Status(StatusArgs),
    /// Resolve a screen path for the current session
    Open(OpenArgs),
    /// Send an authorized GET request and print the JSON response
    Get(GetArgs),
    /// Run the interactive terminal client
    Tui,
    /// Write or inspect the configuration file
    Config(ConfigArgs),
}

/// Arguments for the config subcommand.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Write a configuration file holding the defaults
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration as TOML
    Show,
}

/// Email and password for sign-in and sign-up.
#[derive(Debug, Args)]
pub struct CredentialArgs {
    /// Account email
    #[arg(long, value_name = "EMAIL")]
    pub email: String,

    /// Account password
    #[arg(long, value_name = "PASSWORD", env = "STORYDECK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for the status subcommand.
#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Print the session as JSON
    #[arg(long)]
    pub json: bool,

    /// Include the bearer token in the output
    #[arg(long)]
    pub show_token: bool,
}

/// Arguments for the open subcommand.
#[derive(Debug, Args)]
pub struct OpenArgs {
    /// Screen path, e.g. `/feed`
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Print the navigation as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the get subcommand.
#[derive(Debug, Args)]
pub struct GetArgs {
    /// Endpoint path, e.g. `/stories/my`
    #[arg(value_name = "PATH")]
    pub path: String,
}
