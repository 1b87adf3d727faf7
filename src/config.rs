//! Application configuration management.
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config PATH`, or `config.toml` in the platform config dir)
//! 3. `STORYDECK_*` environment variables (`__` separates nested keys,
//!    e.g. `STORYDECK_API__BASE_URL`)
//! 4. CLI flags, applied by the caller after loading
//!
//! # Example
//!
//! ```toml
//! [api]
//! base_url = "https://stories.example.com"
//! timeout_secs = 10
//!
//! [session]
//! clear_orphan_role = false
//! on_unauthorized = "ignore"
//! ```

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::api::{ApiConfig, UnauthorizedPolicy};
use crate::session::StoreOptions;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "STORYDECK_";

/// Errors raised while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The layered sources could not be merged into a [`Config`].
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// The platform configuration directory could not be determined.
    #[error("failed to determine project directories")]
    NoProjectDirs,

    /// The configuration file could not be written.
    #[error("failed to write configuration to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be serialized.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Session persistence settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session file location. Defaults to the platform data dir.
    pub storage_path: Option<PathBuf>,
    /// Drop a stored role that has no token at startup.
    pub clear_orphan_role: bool,
    /// Whether a rejected token ends the session.
    pub on_unauthorized: UnauthorizedPolicy,
}

impl SessionConfig {
    /// Rehydration options for the session store.
    #[must_use]
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            clear_orphan_role: self.clear_orphan_role,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Story service connection.
    pub api: ApiConfig,
    /// Session persistence.
    pub session: SessionConfig,
}

impl Config {
    /// Load from the given file, or from the default path when `None`.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::config_path() {
                Ok(path) => path,
                Err(e) => {
                    log::debug!("No config directory, using defaults: {}", e);
                    return Self::figment(None).extract().map_err(|e| Box::new(e).into());
                }
            },
        };
        Self::load_from_path(&path)
    }

    /// Load from a specific file, layered over defaults and under the
    /// environment.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            log::debug!("Loading configuration from {}", path.display());
        } else {
            log::debug!("No configuration file at {}", path.display());
        }
        let config = Self::figment(Some(path))
            .extract()
            .map_err(Box::new)?;
        Ok(config)
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Render as TOML, the format read back by [`Config::load`].
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save as TOML to the given path, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        fs::write(path, content).map_err(write_err)?;
        Ok(())
    }

    /// Get the default platform-specific configuration path.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let project_dirs =
            ProjectDirs::from("com", "storydeck", "storydeck").ok_or(ConfigError::NoProjectDirs)?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }
}
