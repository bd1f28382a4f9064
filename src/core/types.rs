//! core::types
//!
//! Strong types for publishing inputs.
//!
//! # Types
//!
//! - [`BranchName`] - Validated Git branch name
//! - [`RemoteName`] - Validated Git remote name
//! - [`RemoteUrl`] - Non-empty remote repository address
//! - [`Identity`] - Explicit commit author/committer identity
//! - [`Oid`] - Git object identifier (SHA)
//!
//! # Validation
//!
//! These types enforce validity at construction time. A publish run can
//! only be built from values that already passed validation, so invalid
//! input is rejected before any repository is touched.
//!
//! # Examples
//!
//! ```
//! use repo_publisher::core::types::{BranchName, RemoteName, RemoteUrl};
//!
//! let branch = BranchName::new("main").unwrap();
//! let remote = RemoteName::new("origin").unwrap();
//! let url = RemoteUrl::new("https://example.com/repo.git").unwrap();
//!
//! assert!(BranchName::new("invalid..name").is_err());
//! assert!(RemoteUrl::new("   ").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid remote name: {0}")]
    InvalidRemoteName(String),

    #[error("invalid remote url: {0}")]
    InvalidRemoteUrl(String),

    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("invalid object id: {0}")]
    InvalidOid(String),
}

/// Check a name against Git's refname component rules.
///
/// Returns a description of the first violated rule.
fn check_refname(name: &str, what: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err(format!("{what} cannot be empty"));
    }
    if name == "@" {
        return Err(format!("{what} cannot be '@' (reserved)"));
    }
    if name.starts_with('.') {
        return Err(format!("{what} cannot start with '.'"));
    }
    if name.starts_with('-') {
        return Err(format!("{what} cannot start with '-'"));
    }
    if name.ends_with(".lock") {
        return Err(format!("{what} cannot end with '.lock'"));
    }
    if name.starts_with('/') || name.ends_with('/') {
        return Err(format!("{what} cannot start or end with '/'"));
    }
    if name.ends_with('.') {
        return Err(format!("{what} cannot end with '.'"));
    }

    for seq in ["..", "@{", "//"] {
        if name.contains(seq) {
            return Err(format!("{what} cannot contain '{seq}'"));
        }
    }

    const INVALID_CHARS: [char; 8] = [' ', '~', '^', ':', '\\', '?', '*', '['];
    for c in INVALID_CHARS {
        if name.contains(c) {
            return Err(format!("{what} cannot contain '{c}'"));
        }
    }

    if name.chars().any(|c| c.is_ascii_control()) {
        return Err(format!("{what} cannot contain control characters"));
    }

    for component in name.split('/') {
        if component.starts_with('.') {
            return Err("path component cannot start with '.'".into());
        }
        if component.ends_with(".lock") {
            return Err("path component cannot end with '.lock'".into());
        }
    }

    Ok(())
}

/// A validated Git branch name.
///
/// Branch names must conform to Git's refname rules (see `git check-ref-format`):
/// - Cannot be empty
/// - Cannot start with `.` or `-`
/// - Cannot start with `/` or end with `.lock`, `.` or `/`
/// - Cannot contain `..`, `@{`, `//`, or ASCII control characters
/// - Cannot contain spaces, `~`, `^`, `:`, `\`, `?`, `*`, `[`
/// - Cannot be exactly `@`
///
/// # Example
///
/// ```
/// use repo_publisher::core::types::BranchName;
///
/// let name = BranchName::new("release/v1").unwrap();
/// assert_eq!(name.as_str(), "release/v1");
/// assert_eq!(name.refname(), "refs/heads/release/v1");
///
/// assert!(BranchName::new("").is_err());
/// assert!(BranchName::new(".hidden").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// The conventional primary branch name.
    pub const DEFAULT: &'static str = "main";

    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates Git's refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        check_refname(&name, "branch name").map_err(TypeError::InvalidBranchName)?;
        Ok(Self(name))
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full ref name (`refs/heads/<name>`).
    pub fn refname(&self) -> String {
        format!("refs/heads/{}", self.0)
    }
}

impl Default for BranchName {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated Git remote name.
///
/// Remote names follow the same refname rules as branches, since git
/// stores remote-tracking refs under `refs/remotes/<name>/`.
///
/// # Example
///
/// ```
/// use repo_publisher::core::types::RemoteName;
///
/// assert_eq!(RemoteName::default().as_str(), "origin");
/// assert!(RemoteName::new("up stream").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteName(String);

impl RemoteName {
    /// The conventional remote name.
    pub const DEFAULT: &'static str = "origin";

    /// Create a new validated remote name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRemoteName` if the name is not usable as a remote.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        check_refname(&name, "remote name").map_err(TypeError::InvalidRemoteName)?;
        Ok(Self(name))
    }

    /// Get the remote name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RemoteName {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl TryFrom<String> for RemoteName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RemoteName> for String {
    fn from(name: RemoteName) -> Self {
        name.0
    }
}

impl AsRef<str> for RemoteName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RemoteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A remote repository address.
///
/// Any non-empty string without whitespace is accepted: git supports
/// HTTPS, SSH, scp-like and local path remotes, and the publisher does not
/// second-guess which one the caller intends. Surrounding whitespace is
/// trimmed.
///
/// # Example
///
/// ```
/// use repo_publisher::core::types::RemoteUrl;
///
/// let url = RemoteUrl::new("  git@example.com:owner/repo.git \n").unwrap();
/// assert_eq!(url.as_str(), "git@example.com:owner/repo.git");
/// assert!(RemoteUrl::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteUrl(String);

impl RemoteUrl {
    /// Create a new remote url.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRemoteUrl` if the url is empty or contains whitespace.
    pub fn new(url: impl AsRef<str>) -> Result<Self, TypeError> {
        let url = url.as_ref().trim();
        if url.is_empty() {
            return Err(TypeError::InvalidRemoteUrl(
                "remote url cannot be empty".into(),
            ));
        }
        if url.chars().any(|c| c.is_whitespace() || c.is_ascii_control()) {
            return Err(TypeError::InvalidRemoteUrl(format!(
                "remote url cannot contain whitespace: '{url}'"
            )));
        }
        Ok(Self(url.to_string()))
    }

    /// Get the url as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RemoteUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RemoteUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Author and committer identity for the publish commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Identity {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
}

impl Identity {
    /// Create a validated identity.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidIdentity` if either field is blank or
    /// contains angle brackets (git would reject the signature).
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Result<Self, TypeError> {
        let identity = Self {
            name: name.into(),
            email: email.into(),
        };
        identity.validate()?;
        Ok(identity)
    }

    /// Validate the identity fields.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.name.trim().is_empty() {
            return Err(TypeError::InvalidIdentity("name cannot be empty".into()));
        }
        if self.email.trim().is_empty() {
            return Err(TypeError::InvalidIdentity("email cannot be empty".into()));
        }
        for field in [&self.name, &self.email] {
            if field.contains('<') || field.contains('>') {
                return Err(TypeError::InvalidIdentity(format!(
                    "'{field}' cannot contain '<' or '>'"
                )));
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// A Git object identifier (SHA-1 or SHA-256).
///
/// OIDs are normalized to lowercase for consistency.
///
/// # Example
///
/// ```
/// use repo_publisher::core::types::Oid;
///
/// let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
/// assert_eq!(oid.short(7), "abc123d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Oid(String);

impl Oid {
    /// Create a new validated object id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the string is not a valid hex OID.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        // SHA-1 is 40 hex chars, SHA-256 is 64
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid(
                "object id must be hexadecimal".into(),
            ));
        }
        Ok(Self(oid))
    }

    /// Get an abbreviated form of the OID.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    /// Get the object id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
