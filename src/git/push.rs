//! git::push
//!
//! Pushing the primary branch to its remote.
//!
//! # Design
//!
//! Local repository operations go through git2, but the push shells out to
//! the `git` CLI so the user's credential helpers, SSH agent and transport
//! configuration apply exactly as they would on the command line.
//!
//! The push sits behind the [`Pusher`] trait so the publish workflow can be
//! driven with a scripted transport in tests.
//!
//! # Failure Classification
//!
//! Git reports push failures as free text on stderr. [`classify_push_failure`]
//! maps the stable phrases git and common hosts emit onto a
//! [`PushFailureKind`], so callers can tell a rejected credential from an
//! unreachable host or a diverged history. The raw message is always kept.

use std::path::Path;
use std::process::Command;

use thiserror::Error;

use crate::core::types::{BranchName, RemoteName};

/// Category of a failed push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushFailureKind {
    /// Credentials were missing or refused.
    Authentication,
    /// The remote could not be reached or does not exist.
    Unreachable,
    /// The remote refused a non-fast-forward update.
    NonFastForward,
    /// Anything else, including failure to run git at all.
    Other,
}

impl PushFailureKind {
    /// Short human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            PushFailureKind::Authentication => "authentication rejected",
            PushFailureKind::Unreachable => "remote unreachable",
            PushFailureKind::NonFastForward => "non-fast-forward update rejected",
            PushFailureKind::Other => "push failed",
        }
    }
}

impl std::fmt::Display for PushFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A failed push, with git's diagnostic kept verbatim.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct PushFailure {
    /// Classified failure category
    pub kind: PushFailureKind,
    /// Diagnostic output from git
    pub message: String,
}

/// Transport that pushes a branch and records upstream tracking.
pub trait Pusher {
    /// Push `branch` to `remote` and set `<remote>/<branch>` as its upstream.
    fn push(
        &self,
        work_dir: &Path,
        remote: &RemoteName,
        branch: &BranchName,
    ) -> Result<(), PushFailure>;
}

/// Pushes by running `git push --set-upstream`.
#[derive(Debug, Clone)]
pub struct GitCliPusher {
    program: String,
}

impl GitCliPusher {
    /// Use the `git` found on `PATH`.
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
        }
    }

    /// Use a specific git executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GitCliPusher {
    fn default() -> Self {
        Self::new()
    }
}

impl Pusher for GitCliPusher {
    fn push(
        &self,
        work_dir: &Path,
        remote: &RemoteName,
        branch: &BranchName,
    ) -> Result<(), PushFailure> {
        let output = Command::new(&self.program)
            .current_dir(work_dir)
            .args(["push", "--set-upstream", remote.as_str(), branch.as_str()])
            .output()
            .map_err(|e| PushFailure {
                kind: PushFailureKind::Other,
                message: format!("failed to run {}: {}", self.program, e),
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            format!("git push exited with {}", output.status)
        } else {
            stderr
        };

        Err(PushFailure {
            kind: classify_push_failure(&message),
            message,
        })
    }
}

const AUTH_MARKERS: &[&str] = &[
    "authentication failed",
    "could not read username",
    "could not read password",
    "permission denied",
    "invalid username or password",
    "access denied",
    "returned error: 401",
    "returned error: 403",
    "terminal prompts disabled",
];

const UNREACHABLE_MARKERS: &[&str] = &[
    "could not resolve host",
    "could not resolve hostname",
    "connection refused",
    "connection timed out",
    "network is unreachable",
    "no route to host",
    "operation timed out",
    "does not appear to be a git repository",
    "repository not found",
    "unable to access",
    "could not read from remote repository",
];

const NON_FAST_FORWARD_MARKERS: &[&str] = &[
    "non-fast-forward",
    "fetch first",
    "updates were rejected",
];

/// Classify git's push diagnostic into a [`PushFailureKind`].
///
/// Checked in order: non-fast-forward, authentication, connectivity. An
/// SSH auth failure is usually followed by "Could not read from remote
/// repository", so authentication must be tested before connectivity.
///
/// # Example
///
/// ```
/// use repo_publisher::git::{classify_push_failure, PushFailureKind};
///
/// assert_eq!(
///     classify_push_failure("fatal: Authentication failed for 'https://example.com/r.git/'"),
///     PushFailureKind::Authentication
/// );
/// assert_eq!(
///     classify_push_failure(" ! [rejected]        main -> main (fetch first)"),
///     PushFailureKind::NonFastForward
/// );
/// ```
pub fn classify_push_failure(stderr: &str) -> PushFailureKind {
    let text = stderr.to_ascii_lowercase();
    let has = |markers: &[&str]| markers.iter().any(|m| text.contains(m));

    if has(NON_FAST_FORWARD_MARKERS) {
        PushFailureKind::NonFastForward
    } else if has(AUTH_MARKERS) {
        PushFailureKind::Authentication
    } else if has(UNREACHABLE_MARKERS) {
        PushFailureKind::Unreachable
    } else {
        PushFailureKind::Other
    }
}
