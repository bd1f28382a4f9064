//! core::config::schema
//!
//! Configuration schema types.
//!
//! The global and repo files share one schema. Every field is optional so
//! a repo file can override a single value from the global file.
//!
//! # Validation
//!
//! Config values are validated after parsing to ensure they conform to
//! expected formats (e.g., branch must be a valid branch name).

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::{BranchName, Identity, RemoteName};

/// Contents of a publisher config file.
///
/// # Example
///
/// ```toml
/// remote = "origin"
/// branch = "main"
/// message = "Publish working tree"
///
/// [identity]
/// name = "Jane Doe"
/// email = "jane@example.com"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Remote name (default: "origin")
    pub remote: Option<String>,

    /// Primary branch name (default: "main")
    pub branch: Option<String>,

    /// Commit message for the publish commit
    pub message: Option<String>,

    /// Commit identity; falls back to git config when absent
    pub identity: Option<Identity>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(remote) = &self.remote {
            RemoteName::new(remote.as_str())
                .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        }

        if let Some(branch) = &self.branch {
            BranchName::new(branch.as_str())
                .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        }

        if let Some(message) = &self.message {
            if message.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "message cannot be empty".to_string(),
                ));
            }
        }

        if let Some(identity) = &self.identity {
            identity
                .validate()
                .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        }

        Ok(())
    }
}
