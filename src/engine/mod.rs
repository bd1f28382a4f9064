//! engine
//!
//! Orchestrates the publish lifecycle.
//!
//! # Architecture
//!
//! The engine owns the ordered publish steps and their outcomes. It talks
//! to the repository only through [`crate::git`], and reports progress only
//! through [`crate::ui::output`].
//!
//! - [`steps`] - Step identities, tri-state outcomes, the run report
//! - [`publisher`] - The workflow itself and the dry-run planner
//!
//! # Invariants
//!
//! - Every step either changes state, is a recorded no-op, or aborts the run
//! - Nothing is retried and nothing is rolled back

pub mod publisher;
pub mod steps;

pub use publisher::{plan, PublishError, PublishOptions, Publisher};
pub use steps::{status_line, PublishReport, Step, StepOutcome};

use std::path::PathBuf;

use crate::ui::output::Verbosity;

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags that affect command behavior.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
}

impl Context {
    /// Output verbosity implied by the flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// Directory to publish: `--cwd` if given, else the process directory.
    pub fn work_dir(&self) -> std::io::Result<PathBuf> {
        match &self.cwd {
            Some(path) => Ok(path.clone()),
            None => std::env::current_dir(),
        }
    }
}
