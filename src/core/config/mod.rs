//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! The publisher has two configuration scopes:
//! - **Global**: User-level settings
//! - **Repo**: Repository-level overrides
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$REPO_PUBLISHER_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/repo-publisher/config.toml`
//! 3. `~/.repo-publisher/config.toml`
//!
//! # Repo Config Location
//!
//! `.git/repo-publisher/config.toml`, only read when the repository
//! already exists.
//!
//! # Example
//!
//! ```no_run
//! use repo_publisher::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/path/to/project"))).unwrap();
//! println!("Remote: {}", config.remote());
//! println!("Branch: {}", config.branch());
//! ```

pub mod schema;

pub use schema::FileConfig;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::types::{BranchName, Identity, RemoteName};

/// Environment variable naming an explicit global config file.
pub const CONFIG_ENV: &str = "REPO_PUBLISHER_CONFIG";

/// Default commit message for the publish commit.
pub const DEFAULT_MESSAGE: &str = "Publish working tree";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence automatically: repo config overrides global
/// config, and both override built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: FileConfig,
    /// Repository configuration (if the repository exists and has one)
    pub repo: Option<FileConfig>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the repo config file (if loaded)
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `work_dir` is provided, also loads repo-specific config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or hold
    /// invalid values. Missing config files are not an error.
    pub fn load(work_dir: Option<&Path>) -> Result<Config, ConfigError> {
        let global_path = Self::find_global();
        Self::load_from(global_path.as_deref(), work_dir)
    }

    /// Load configuration from an explicit global file and work dir.
    ///
    /// A `global_path` that does not exist is treated as absent.
    pub fn load_from(
        global_path: Option<&Path>,
        work_dir: Option<&Path>,
    ) -> Result<Config, ConfigError> {
        let (global, global_path) = match global_path {
            Some(path) if path.exists() => (Self::read_file(path)?, Some(path.to_path_buf())),
            _ => (FileConfig::default(), None),
        };
        global.validate()?;

        let (repo, repo_path) = match work_dir.map(Self::repo_config_path) {
            Some(path) if path.exists() => {
                let config = Self::read_file(&path)?;
                config.validate()?;
                (Some(config), Some(path))
            }
            _ => (None, None),
        };

        Ok(Config {
            global,
            repo,
            global_path,
            repo_path,
        })
    }

    /// Find the global config file, if any exists.
    fn find_global() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("repo-publisher/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        dirs::home_dir()
            .map(|home| home.join(".repo-publisher/config.toml"))
            .filter(|path| path.exists())
    }

    /// Read and parse a config file.
    fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the canonical path for repo config.
    ///
    /// Returns `.git/repo-publisher/config.toml` relative to the work dir.
    pub fn repo_config_path(work_dir: &Path) -> PathBuf {
        work_dir.join(".git/repo-publisher/config.toml")
    }

    /// Pick a value from the repo file, then the global file.
    fn pick<T>(&self, field: impl Fn(&FileConfig) -> Option<T>) -> Option<T> {
        self.repo
            .as_ref()
            .and_then(&field)
            .or_else(|| field(&self.global))
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Get the remote name.
    ///
    /// Defaults to "origin" if not configured.
    pub fn remote(&self) -> RemoteName {
        self.pick(|c| c.remote.clone())
            .and_then(|r| RemoteName::new(r).ok())
            .unwrap_or_default()
    }

    /// Get the primary branch name.
    ///
    /// Defaults to "main" if not configured.
    pub fn branch(&self) -> BranchName {
        self.pick(|c| c.branch.clone())
            .and_then(|b| BranchName::new(b).ok())
            .unwrap_or_default()
    }

    /// Get the commit message.
    pub fn message(&self) -> String {
        self.pick(|c| c.message.clone())
            .unwrap_or_else(|| DEFAULT_MESSAGE.to_string())
    }

    /// Get the explicit commit identity, if configured.
    pub fn identity(&self) -> Option<Identity> {
        self.pick(|c| c.identity.clone())
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}
