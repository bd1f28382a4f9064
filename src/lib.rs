//! repo-publisher - Publish a working directory to a remote git repository
//!
//! Given a remote URL, the publisher makes the working directory a git
//! repository, stages and commits everything, names the primary branch,
//! points a single remote at the URL and pushes with upstream tracking.
//! Running it again with nothing new is a successful no-op commit followed
//! by a push.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Runs the ordered publish steps and records their outcomes
//! - [`core`] - Domain types and configuration
//! - [`git`] - Single interface for all Git operations
//! - [`ui`] - User-facing output
//!
//! # Correctness Invariants
//!
//! 1. Invalid input is rejected before any repository is touched
//! 2. Only "nothing to commit" and "no such remote" are tolerated
//! 3. Completed steps are never rolled back
//! 4. After a successful run the primary branch tracks `<remote>/<branch>`

pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod ui;
