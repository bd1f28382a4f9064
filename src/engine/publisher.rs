//! engine::publisher
//!
//! The repository publishing workflow.
//!
//! # Lifecycle
//!
//! ```text
//! EnsureRepository -> StageAll -> Commit -> NormalizeBranch -> ConfigureRemote -> Push
//! ```
//!
//! # Invariants
//!
//! - Steps run strictly in order; the first failure aborts the run
//! - Completed steps are never rolled back (a local commit survives a failed push)
//! - Only two conditions are tolerated as no-ops: an unchanged tree at commit
//!   time and a missing remote before re-creating it
//! - After a successful run the primary branch tracks `<remote>/<branch>`
//!
//! # Example
//!
//! ```ignore
//! use repo_publisher::engine::{Publisher, PublishOptions};
//! use repo_publisher::git::GitCliPusher;
//! use repo_publisher::ui::output::Verbosity;
//!
//! let publisher = Publisher::new(GitCliPusher::new(), Verbosity::Normal);
//! let report = publisher.run(&options)?;
//! ```

use std::path::PathBuf;

use thiserror::Error;

use super::steps::{status_line, PublishReport, Step, StepOutcome};
use crate::core::types::{BranchName, Identity, RemoteName, RemoteUrl};
use crate::git::{
    BranchChange, CommitResult, Git, GitError, HeadState, PushFailure, PushFailureKind, Pusher,
};
use crate::ui::output::{self, Verbosity};

/// Fully resolved inputs for one publish run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOptions {
    /// Directory to publish; becomes the repository root.
    pub work_dir: PathBuf,
    /// Where to push.
    pub remote_url: RemoteUrl,
    /// Name of the remote bound to `remote_url`.
    pub remote: RemoteName,
    /// Conventional name for the primary branch.
    pub branch: BranchName,
    /// Commit message for the publish commit.
    pub message: String,
    /// Explicit identity; `None` defers to git config.
    pub identity: Option<Identity>,
}

impl PublishOptions {
    /// Options with default remote, branch and message.
    pub fn new(work_dir: impl Into<PathBuf>, remote_url: RemoteUrl) -> Self {
        Self {
            work_dir: work_dir.into(),
            remote_url,
            remote: RemoteName::default(),
            branch: BranchName::default(),
            message: crate::core::config::DEFAULT_MESSAGE.to_string(),
            identity: None,
        }
    }
}

/// Fatal publish failures, one variant per failing step.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The repository could not be opened or created.
    #[error("failed to initialize repository at {path}: {message}")]
    Init {
        /// Work dir being published
        path: PathBuf,
        /// Underlying diagnostic
        message: String,
    },

    /// Files could not be staged.
    #[error("failed to stage files: {message}")]
    Stage {
        /// Underlying diagnostic
        message: String,
    },

    /// Commit failed for a reason other than "nothing to commit".
    #[error("commit failed: {message}")]
    Commit {
        /// Underlying diagnostic
        message: String,
    },

    /// The primary branch could not be set.
    #[error("failed to set primary branch '{branch}': {message}")]
    Branch {
        /// Target branch name
        branch: String,
        /// Underlying diagnostic
        message: String,
    },

    /// The remote could not be removed or added.
    #[error("failed to configure remote '{name}': {message}")]
    Remote {
        /// Remote name
        name: String,
        /// Underlying diagnostic
        message: String,
    },

    /// The remote refused the push or could not be reached.
    #[error("push failed ({kind}): {message}")]
    Push {
        /// Classified failure
        kind: PushFailureKind,
        /// git's diagnostic, verbatim
        message: String,
    },
}

impl PublishError {
    /// The step that failed.
    pub fn step(&self) -> Step {
        match self {
            PublishError::Init { .. } => Step::EnsureRepository,
            PublishError::Stage { .. } => Step::StageAll,
            PublishError::Commit { .. } => Step::Commit,
            PublishError::Branch { .. } => Step::NormalizeBranch,
            PublishError::Remote { .. } => Step::ConfigureRemote,
            PublishError::Push { .. } => Step::Push,
        }
    }
}

impl From<PushFailure> for PublishError {
    fn from(failure: PushFailure) -> Self {
        PublishError::Push {
            kind: failure.kind,
            message: failure.message,
        }
    }
}

/// Runs the publish workflow.
///
/// Generic over the push transport so tests can script push results.
#[derive(Debug)]
pub struct Publisher<P: Pusher> {
    pusher: P,
    verbosity: Verbosity,
}

impl<P: Pusher> Publisher<P> {
    /// Create a publisher with the given push transport.
    pub fn new(pusher: P, verbosity: Verbosity) -> Self {
        Self { pusher, verbosity }
    }

    /// Run all six steps, printing a status line after each.
    ///
    /// # Errors
    ///
    /// Returns the first step failure; later steps do not run.
    pub fn run(&self, opts: &PublishOptions) -> Result<PublishReport, PublishError> {
        let mut report = PublishReport::default();

        self.begin(Step::EnsureRepository);
        let (git, outcome) = ensure_repository(opts)?;
        self.record(&mut report, Step::EnsureRepository, outcome);

        self.begin(Step::StageAll);
        let outcome = stage_all(&git, self.verbosity)?;
        self.record(&mut report, Step::StageAll, outcome);

        self.begin(Step::Commit);
        let outcome = commit(&git, opts)?;
        self.record(&mut report, Step::Commit, outcome);

        self.begin(Step::NormalizeBranch);
        let outcome = normalize_branch(&git, &opts.branch)?;
        self.record(&mut report, Step::NormalizeBranch, outcome);

        self.begin(Step::ConfigureRemote);
        let outcome = configure_remote(&git, &opts.remote, &opts.remote_url)?;
        self.record(&mut report, Step::ConfigureRemote, outcome);

        self.begin(Step::Push);
        let outcome = self.push(opts)?;
        self.record(&mut report, Step::Push, outcome);

        Ok(report)
    }

    fn push(&self, opts: &PublishOptions) -> Result<StepOutcome, PublishError> {
        self.pusher
            .push(&opts.work_dir, &opts.remote, &opts.branch)?;
        Ok(StepOutcome::Changed(format!(
            "pushed '{}' to '{}' ({}), tracking {}/{}",
            opts.branch, opts.remote, opts.remote_url, opts.remote, opts.branch
        )))
    }

    fn begin(&self, step: Step) {
        output::debug(format!("starting step {}: {}", step.number(), step), self.verbosity);
    }

    fn record(&self, report: &mut PublishReport, step: Step, outcome: StepOutcome) {
        output::print(status_line(step, &outcome), self.verbosity);
        report.steps.push((step, outcome));
    }
}

// =============================================================================
// Steps
// =============================================================================

/// Step 1: open the repository at the work dir, or create it.
fn ensure_repository(opts: &PublishOptions) -> Result<(Git, StepOutcome), PublishError> {
    let path = &opts.work_dir;
    let init_error = |e: GitError| PublishError::Init {
        path: path.clone(),
        message: e.to_string(),
    };

    match Git::open(path) {
        Ok(git) => {
            let info = git.info().map_err(init_error)?;
            Ok((
                git,
                StepOutcome::NoOp(format!(
                    "using existing repository at {}",
                    info.work_dir.display()
                )),
            ))
        }
        Err(GitError::NotARepo { .. }) => {
            let git = Git::init(path).map_err(init_error)?;
            Ok((
                git,
                StepOutcome::Changed(format!("initialized repository at {}", path.display())),
            ))
        }
        Err(e) => Err(init_error(e)),
    }
}

/// Step 2: stage every path in the working tree.
///
/// Nested repositories are skipped with a warning rather than failing the run.
fn stage_all(git: &Git, verbosity: Verbosity) -> Result<StepOutcome, PublishError> {
    let staged = git.stage_all().map_err(|e| PublishError::Stage {
        message: e.to_string(),
    })?;

    for path in &staged.embedded {
        output::warn(
            format!(
                "skipped '{}': it is a separate git repository; publish it on its own or add it as a submodule",
                path
            ),
            verbosity,
        );
    }

    let count = staged.count;
    Ok(if count == 0 {
        StepOutcome::NoOp("no changes to stage".to_string())
    } else {
        StepOutcome::Changed(format!(
            "staged {} {}",
            count,
            if count == 1 { "path" } else { "paths" }
        ))
    })
}

/// Step 3: commit, treating an unchanged tree as a successful no-op.
fn commit(git: &Git, opts: &PublishOptions) -> Result<StepOutcome, PublishError> {
    let result = git
        .commit_index(&opts.message, opts.identity.as_ref())
        .map_err(|e| PublishError::Commit {
            message: e.to_string(),
        })?;

    Ok(match result {
        CommitResult::Created(oid) => {
            StepOutcome::Changed(format!("created commit {} \"{}\"", oid.short(7), opts.message))
        }
        CommitResult::NothingToCommit => StepOutcome::NoOp("nothing to commit".to_string()),
    })
}

/// Step 4: make HEAD point at the primary branch.
fn normalize_branch(git: &Git, branch: &BranchName) -> Result<StepOutcome, PublishError> {
    let change = git
        .set_primary_branch(branch)
        .map_err(|e| PublishError::Branch {
            branch: branch.to_string(),
            message: e.to_string(),
        })?;

    Ok(match change {
        BranchChange::AlreadyCurrent => StepOutcome::NoOp(format!("already on '{}'", branch)),
        BranchChange::Renamed { from } => {
            StepOutcome::Changed(format!("renamed '{}' to '{}'", from, branch))
        }
        BranchChange::Repointed { from } => {
            StepOutcome::Changed(format!("HEAD now names '{}' (was unborn '{}')", branch, from))
        }
        BranchChange::CreatedFromDetached { at } => {
            StepOutcome::Changed(format!("created '{}' at detached {}", branch, at.short(7)))
        }
    })
}

/// Step 5: re-create the remote so it points at the requested URL.
fn configure_remote(
    git: &Git,
    name: &RemoteName,
    url: &RemoteUrl,
) -> Result<StepOutcome, PublishError> {
    let previous = git
        .replace_remote(name, url)
        .map_err(|e| PublishError::Remote {
            name: name.to_string(),
            message: e.to_string(),
        })?;

    Ok(match previous {
        Some(old) if old == url.as_str() => {
            StepOutcome::NoOp(format!("'{}' already points to {}", name, url))
        }
        Some(old) => StepOutcome::Changed(format!("'{}' changed from {} to {}", name, old, url)),
        None => StepOutcome::Changed(format!("added '{}' -> {}", name, url)),
    })
}

// =============================================================================
// Dry run
// =============================================================================

/// Predict what [`Publisher::run`] would do without changing anything.
///
/// Steps that would alter state are reported as `Changed`, the rest as
/// `NoOp`. The push is always reported as `Changed` since its effect
/// depends on the remote.
pub fn plan(opts: &PublishOptions) -> Result<PublishReport, PublishError> {
    let path = &opts.work_dir;
    let mut report = PublishReport::default();

    let git = match Git::open(path) {
        Ok(git) => Some(git),
        Err(GitError::NotARepo { .. }) => None,
        Err(e) => {
            return Err(PublishError::Init {
                path: path.clone(),
                message: e.to_string(),
            })
        }
    };

    let Some(git) = git else {
        let steps = [
            (
                Step::EnsureRepository,
                format!("would initialize repository at {}", path.display()),
            ),
            (Step::StageAll, "would stage all files".to_string()),
            (
                Step::Commit,
                format!("would commit \"{}\" if any files exist", opts.message),
            ),
            (
                Step::NormalizeBranch,
                format!("would name the initial branch '{}'", opts.branch),
            ),
            (
                Step::ConfigureRemote,
                format!("would add '{}' -> {}", opts.remote, opts.remote_url),
            ),
            (Step::Push, push_plan(opts)),
        ];
        report.steps = steps
            .into_iter()
            .map(|(step, detail)| (step, StepOutcome::Changed(detail)))
            .collect();
        return Ok(report);
    };

    report.steps.push((
        Step::EnsureRepository,
        StepOutcome::NoOp(format!("using existing repository at {}", path.display())),
    ));

    let pending = git.pending_changes().map_err(|e| PublishError::Stage {
        message: e.to_string(),
    })?;
    let (stage, commit) = if pending == 0 {
        (
            StepOutcome::NoOp("no changes to stage".to_string()),
            StepOutcome::NoOp("nothing to commit".to_string()),
        )
    } else {
        (
            StepOutcome::Changed(format!("would stage {} changed paths", pending)),
            StepOutcome::Changed(format!("would commit \"{}\"", opts.message)),
        )
    };
    report.steps.push((Step::StageAll, stage));
    report.steps.push((Step::Commit, commit));

    let branch_error = |e: GitError| PublishError::Branch {
        branch: opts.branch.to_string(),
        message: e.to_string(),
    };
    let branch = match git.head_state().map_err(branch_error)? {
        HeadState::Branch(name) | HeadState::Unborn(name) if name == opts.branch.as_str() => {
            StepOutcome::NoOp(format!("already on '{}'", opts.branch))
        }
        HeadState::Branch(name) => {
            StepOutcome::Changed(format!("would rename '{}' to '{}'", name, opts.branch))
        }
        HeadState::Unborn(name) => StepOutcome::Changed(format!(
            "HEAD would name '{}' (was unborn '{}')",
            opts.branch, name
        )),
        HeadState::Detached(oid) => StepOutcome::Changed(format!(
            "would create '{}' at detached {}",
            opts.branch,
            oid.short(7)
        )),
    };
    report.steps.push((Step::NormalizeBranch, branch));

    let existing = git
        .remote_url(opts.remote.as_str())
        .map_err(|e| PublishError::Remote {
            name: opts.remote.to_string(),
            message: e.to_string(),
        })?;
    let remote = match existing {
        Some(old) if old == opts.remote_url.as_str() => StepOutcome::NoOp(format!(
            "'{}' already points to {}",
            opts.remote, opts.remote_url
        )),
        Some(old) => StepOutcome::Changed(format!(
            "would change '{}' from {} to {}",
            opts.remote, old, opts.remote_url
        )),
        None => StepOutcome::Changed(format!(
            "would add '{}' -> {}",
            opts.remote, opts.remote_url
        )),
    };
    report.steps.push((Step::ConfigureRemote, remote));
    report
        .steps
        .push((Step::Push, StepOutcome::Changed(push_plan(opts))));

    Ok(report)
}

fn push_plan(opts: &PublishOptions) -> String {
    format!(
        "would push '{}' to '{}' and set upstream",
        opts.branch, opts.remote
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::Path;
    use tempfile::TempDir;

    /// Push transport that records calls and returns a scripted result.
    struct ScriptedPusher {
        result: Result<(), PushFailure>,
        calls: RefCell<Vec<(String, String)>>,
    }

    impl ScriptedPusher {
        fn ok() -> Self {
            Self {
                result: Ok(()),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn failing(kind: PushFailureKind, message: &str) -> Self {
            Self {
                result: Err(PushFailure {
                    kind,
                    message: message.to_string(),
                }),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Pusher for ScriptedPusher {
        fn push(
            &self,
            _work_dir: &Path,
            remote: &RemoteName,
            branch: &BranchName,
        ) -> Result<(), PushFailure> {
            self.calls
                .borrow_mut()
                .push((remote.to_string(), branch.to_string()));
            self.result.clone()
        }
    }

    fn options(dir: &TempDir) -> PublishOptions {
        let mut opts = PublishOptions::new(
            dir.path(),
            RemoteUrl::new("https://example.com/repo.git").unwrap(),
        );
        opts.identity = Some(Identity::new("Test User", "test@example.com").unwrap());
        opts
    }

    fn publisher(pusher: ScriptedPusher) -> Publisher<ScriptedPusher> {
        Publisher::new(pusher, Verbosity::Quiet)
    }

    #[test]
    fn fresh_directory_runs_every_step() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("one.txt"), "1").unwrap();
        std::fs::write(dir.path().join("two.txt"), "2").unwrap();

        let publisher = publisher(ScriptedPusher::ok());
        let report = publisher.run(&options(&dir)).unwrap();

        let steps: Vec<Step> = report.steps.iter().map(|(s, _)| *s).collect();
        assert_eq!(steps, Step::ALL.to_vec());
        assert!(report.outcome(Step::EnsureRepository).unwrap().is_changed());
        assert_eq!(
            report.outcome(Step::StageAll).unwrap().detail(),
            "staged 2 paths"
        );
        assert!(report.outcome(Step::Commit).unwrap().is_changed());
        assert_eq!(
            publisher.pusher.calls.borrow().as_slice(),
            &[("origin".to_string(), "main".to_string())]
        );

        let git = Git::open(dir.path()).unwrap();
        assert_eq!(git.current_branch().unwrap().as_deref(), Some("main"));
        assert_eq!(
            git.remote_url("origin").unwrap().as_deref(),
            Some("https://example.com/repo.git")
        );
    }

    #[test]
    fn second_run_reports_nothing_to_commit() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("one.txt"), "1").unwrap();
        let opts = options(&dir);

        publisher(ScriptedPusher::ok()).run(&opts).unwrap();
        let report = publisher(ScriptedPusher::ok()).run(&opts).unwrap();

        assert!(report.nothing_to_commit());
        assert!(!report.outcome(Step::EnsureRepository).unwrap().is_changed());
        assert!(!report.outcome(Step::NormalizeBranch).unwrap().is_changed());
        assert!(!report.outcome(Step::ConfigureRemote).unwrap().is_changed());
    }

    #[test]
    fn empty_directory_commits_nothing() {
        let dir = TempDir::new().unwrap();
        let report = publisher(ScriptedPusher::ok())
            .run(&options(&dir))
            .unwrap();
        assert!(report.nothing_to_commit());

        let git = Git::open(dir.path()).unwrap();
        assert_eq!(
            git.head_state().unwrap(),
            HeadState::Unborn("main".to_string())
        );
    }

    #[test]
    fn push_failure_keeps_commit_and_remote() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("one.txt"), "1").unwrap();

        let err = publisher(ScriptedPusher::failing(
            PushFailureKind::NonFastForward,
            "! [rejected] main -> main (fetch first)",
        ))
        .run(&options(&dir))
        .unwrap_err();

        assert_eq!(err.step(), Step::Push);
        assert!(matches!(
            err,
            PublishError::Push {
                kind: PushFailureKind::NonFastForward,
                ..
            }
        ));
        assert!(err.to_string().contains("fetch first"));

        let git = Git::open(dir.path()).unwrap();
        assert!(git.head_oid().unwrap().is_some());
        assert_eq!(
            git.remote_url("origin").unwrap().as_deref(),
            Some("https://example.com/repo.git")
        );
    }

    #[test]
    fn different_url_replaces_remote() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("one.txt"), "1").unwrap();
        let mut opts = options(&dir);
        publisher(ScriptedPusher::ok()).run(&opts).unwrap();

        opts.remote_url = RemoteUrl::new("https://example.com/other.git").unwrap();
        let report = publisher(ScriptedPusher::ok()).run(&opts).unwrap();

        assert!(report.outcome(Step::ConfigureRemote).unwrap().is_changed());
        let git = Git::open(dir.path()).unwrap();
        assert_eq!(git.remote_names().unwrap(), vec!["origin".to_string()]);
        assert_eq!(
            git.remote_url("origin").unwrap().as_deref(),
            Some("https://example.com/other.git")
        );
    }

    #[test]
    fn custom_branch_and_remote_names() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("one.txt"), "1").unwrap();
        let mut opts = options(&dir);
        opts.branch = BranchName::new("trunk").unwrap();
        opts.remote = RemoteName::new("upstream").unwrap();

        let pusher = ScriptedPusher::ok();
        let publisher = publisher(pusher);
        publisher.run(&opts).unwrap();

        assert_eq!(
            publisher.pusher.calls.borrow().as_slice(),
            &[("upstream".to_string(), "trunk".to_string())]
        );
        let git = Git::open(dir.path()).unwrap();
        assert_eq!(git.current_branch().unwrap().as_deref(), Some("trunk"));
    }

    #[test]
    fn bare_repository_is_an_init_failure() {
        let dir = TempDir::new().unwrap();
        let status = std::process::Command::new("git")
            .args(["init", "--bare", "."])
            .current_dir(dir.path())
            .output()
            .expect("git init --bare failed");
        assert!(status.status.success());

        let err = publisher(ScriptedPusher::ok())
            .run(&options(&dir))
            .unwrap_err();
        assert_eq!(err.step(), Step::EnsureRepository);
    }

    #[test]
    fn plan_for_fresh_directory() {
        let dir = TempDir::new().unwrap();
        let report = plan(&options(&dir)).unwrap();

        assert_eq!(report.steps.len(), 6);
        assert!(report.steps.iter().all(|(_, o)| o.is_changed()));
        assert!(!Git::exists_at(dir.path()), "plan must not create a repository");
    }

    #[test]
    fn plan_after_publish_is_mostly_noop() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("one.txt"), "1").unwrap();
        let opts = options(&dir);
        publisher(ScriptedPusher::ok()).run(&opts).unwrap();

        let report = plan(&opts).unwrap();
        assert_eq!(report.changed_count(), 1, "only the push: {:?}", report);

        std::fs::write(dir.path().join("new.txt"), "new").unwrap();
        let report = plan(&opts).unwrap();
        assert!(report.outcome(Step::Commit).unwrap().is_changed());
    }

    #[test]
    fn plan_for_unborn_head_matches_run() {
        let dir = TempDir::new().unwrap();
        Git::init(dir.path()).unwrap();
        let status = std::process::Command::new("git")
            .args(["symbolic-ref", "HEAD", "refs/heads/trunk"])
            .current_dir(dir.path())
            .output()
            .expect("git symbolic-ref failed");
        assert!(status.status.success());
        let opts = options(&dir);

        let planned = plan(&opts).unwrap();
        assert_eq!(
            planned.outcome(Step::NormalizeBranch).unwrap().detail(),
            "HEAD would name 'main' (was unborn 'trunk')"
        );

        let report = publisher(ScriptedPusher::ok()).run(&opts).unwrap();
        assert_eq!(
            report.outcome(Step::NormalizeBranch).unwrap().detail(),
            "HEAD now names 'main' (was unborn 'trunk')"
        );
    }

    #[test]
    fn embedded_repository_does_not_stop_the_run() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("one.txt"), "1").unwrap();
        let vendor = dir.path().join("vendor");
        std::fs::create_dir(&vendor).unwrap();
        Git::init(&vendor).unwrap();
        std::fs::write(vendor.join("lib.rs"), "x").unwrap();

        let report = publisher(ScriptedPusher::ok())
            .run(&options(&dir))
            .unwrap();
        assert_eq!(
            report.outcome(Step::StageAll).unwrap().detail(),
            "staged 1 path"
        );
        assert!(report.outcome(Step::Commit).unwrap().is_changed());
    }

    #[test]
    fn error_steps() {
        let err = PublishError::Commit {
            message: "missing committer identity".to_string(),
        };
        assert_eq!(err.step(), Step::Commit);
        assert!(err.to_string().starts_with("commit failed"));
    }
}
