//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. No other module imports
//! `git2` or spawns the `git` executable.
//!
//! - [`Git`] wraps `git2` for every local operation: init, staging,
//!   committing, branch renaming and remote configuration.
//! - [`Pusher`] performs the network push. The production implementation,
//!   [`GitCliPusher`], runs `git push` so ambient credentials apply.
//!
//! # Invariants
//!
//! - Repositories are opened at the exact work dir, never discovered upward
//! - "Nothing to commit" is decided by tree comparison, never by parsing output
//! - Replacing a remote tolerates only "remote not found"

mod interface;
mod push;

pub use interface::{BranchChange, CommitResult, Git, GitError, HeadState, RepoInfo, Staged};
pub use push::{classify_push_failure, GitCliPusher, PushFailure, PushFailureKind, Pusher};
