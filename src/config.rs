//! Application configuration management.
//!
//! Settings are layered with figment, later layers overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config PATH`, else the platform config directory)
//! 3. Environment variables prefixed `DUPEMERGE_`
//! 4. Command-line flags
//!
//! An explicit file that is missing, or any layer that fails to parse, is an
//! error; only an absent platform file falls back to the defaults.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::AppError;
use crate::scanner::WalkerConfig;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "DUPEMERGE_";

/// Files below this size are ignored unless configured otherwise.
pub const DEFAULT_MIN_SIZE: u64 = 512;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory names never descended into.
    pub ignored_dir_names: Vec<String>,
    /// Minimum file size in bytes. 0 disables the filter.
    pub min_size: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignored_dir_names: vec![".git".to_string()],
            min_size: DEFAULT_MIN_SIZE,
        }
    }
}

impl Config {
    /// Load the configuration.
    ///
    /// Uses `explicit` when given, otherwise the default platform path if a
    /// file exists there.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidArgument`] if the explicit file does not
    /// exist, or if the file or a `DUPEMERGE_` variable does not parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        let path = match explicit {
            Some(path) if !path.is_file() => {
                return Err(AppError::InvalidArgument(format!(
                    "Config file '{}' not found.",
                    path.display()
                )));
            }
            Some(path) => Some(path.to_path_buf()),
            None => Self::config_path().filter(|path| path.is_file()),
        };

        let config: Self = Self::figment(path.as_deref())
            .extract()
            .map_err(|e| AppError::InvalidArgument(format!("Invalid configuration: {e}")))?;
        log::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Load from a specific TOML file plus the environment.
    ///
    /// # Errors
    ///
    /// Returns the figment error if the file or an environment value does
    /// not parse.
    pub fn load_from_path(path: &Path) -> Result<Self, figment::Error> {
        Self::figment(Some(path)).extract()
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dupemerge", "dupemerge")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if cli.no_min_size {
            self.min_size = 0;
        } else if let Some(min_size) = cli.min_size {
            self.min_size = min_size;
        }

        for name in &cli.ignore_dirs {
            if !self.ignored_dir_names.contains(name) {
                self.ignored_dir_names.push(name.clone());
            }
        }
        self
    }

    /// Build the walker configuration shared by both scans.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        let min_size = (self.min_size > 0).then_some(self.min_size);
        WalkerConfig::new(self.ignored_dir_names.iter().cloned(), min_size)
    }
}
