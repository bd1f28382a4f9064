//! engine::steps
//!
//! The six publish steps and their per-step outcomes.
//!
//! Every step returns `Result<StepOutcome, PublishError>`, which gives the
//! tri-state result the workflow needs: changed, no-op, or failed. The
//! no-op arm is a first-class value, so "nothing to commit" and "remote
//! already pointed there" never travel through the error path.

use std::fmt;

/// A step of the publish workflow, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Initialize the repository if the work dir is not one.
    EnsureRepository,
    /// Stage every path in the working tree.
    StageAll,
    /// Commit the staged tree.
    Commit,
    /// Rename or point HEAD at the primary branch.
    NormalizeBranch,
    /// Re-create the named remote with the requested URL.
    ConfigureRemote,
    /// Push the primary branch and set its upstream.
    Push,
}

impl Step {
    /// All steps in execution order.
    pub const ALL: [Step; 6] = [
        Step::EnsureRepository,
        Step::StageAll,
        Step::Commit,
        Step::NormalizeBranch,
        Step::ConfigureRemote,
        Step::Push,
    ];

    /// Short name used in status lines.
    pub fn name(&self) -> &'static str {
        match self {
            Step::EnsureRepository => "repository",
            Step::StageAll => "stage",
            Step::Commit => "commit",
            Step::NormalizeBranch => "branch",
            Step::ConfigureRemote => "remote",
            Step::Push => "push",
        }
    }

    /// 1-based position in the workflow.
    pub fn number(&self) -> usize {
        Step::ALL
            .iter()
            .position(|s| s == self)
            .map(|i| i + 1)
            .unwrap_or_default()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Successful result of a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step changed repository or remote state.
    Changed(String),
    /// The step found nothing to do.
    NoOp(String),
}

impl StepOutcome {
    /// Check whether this step changed anything.
    pub fn is_changed(&self) -> bool {
        matches!(self, StepOutcome::Changed(_))
    }

    /// Human-readable detail for the status line.
    pub fn detail(&self) -> &str {
        match self {
            StepOutcome::Changed(d) | StepOutcome::NoOp(d) => d,
        }
    }
}

/// Record of a completed publish run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Outcomes in execution order.
    pub steps: Vec<(Step, StepOutcome)>,
}

impl PublishReport {
    /// Get the outcome of a step, if it ran.
    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|(s, _)| *s == step)
            .map(|(_, outcome)| outcome)
    }

    /// Whether the commit step recorded nothing.
    pub fn nothing_to_commit(&self) -> bool {
        matches!(self.outcome(Step::Commit), Some(StepOutcome::NoOp(_)))
    }

    /// Number of steps that changed state.
    pub fn changed_count(&self) -> usize {
        self.steps.iter().filter(|(_, o)| o.is_changed()).count()
    }
}

/// Format the status line printed after a step completes.
pub fn status_line(step: Step, outcome: &StepOutcome) -> String {
    format!(
        "[{}/{}] {}: {}",
        step.number(),
        Step::ALL.len(),
        step,
        outcome.detail()
    )
}
