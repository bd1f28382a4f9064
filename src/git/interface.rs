//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to local repository
//! operations. It exposes exactly the operations the publish workflow
//! needs, and normalizes git2 failures into typed [`GitError`] categories.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: No repository rooted at the path
//! - [`GitError::BareRepo`]: Repository has no working directory
//! - [`GitError::MissingIdentity`]: No commit identity configured anywhere
//! - [`GitError::AccessError`]: Locked repository or filesystem problem
//! - [`GitError::Internal`]: Any other libgit2 failure
//!
//! # Example
//!
//! ```ignore
//! use repo_publisher::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! git.stage_all()?;
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::{BranchName, Identity, Oid, RemoteName, RemoteUrl, TypeError};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// No repository rooted at the given path.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was opened
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// No author/committer identity is available.
    #[error("missing committer identity: set user.name and user.email or configure [identity]")]
    MissingIdentity,

    /// Permission or filesystem error.
    #[error("repository access error: {message}")]
    AccessError {
        /// Description of the error
        message: String,
    },

    /// Invalid data read back from the repository.
    #[error("invalid repository data: {0}")]
    InvalidData(#[from] TypeError),

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match (err.code(), err.class()) {
            (git2::ErrorCode::Locked, _) => GitError::AccessError {
                message: format!("{}: repository is locked: {}", context, err.message()),
            },
            (_, git2::ErrorClass::Os) | (_, git2::ErrorClass::Filesystem) => {
                GitError::AccessError {
                    message: format!("{}: {}", context, err.message()),
                }
            }
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

/// Information about a Git repository.
#[derive(Debug, Clone)]
pub struct RepoInfo {
    /// Path to .git directory
    pub git_dir: PathBuf,
    /// Path to working directory
    pub work_dir: PathBuf,
}

/// Where HEAD currently points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    /// HEAD is a branch with at least one commit.
    Branch(String),
    /// HEAD names a branch that has no commits yet.
    Unborn(String),
    /// HEAD points directly at a commit.
    Detached(Oid),
}

/// Result of staging the working tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Staged {
    /// Index entries that differ from HEAD afterwards.
    pub count: usize,
    /// Nested repositories that were left out, relative to the work dir.
    pub embedded: Vec<String>,
}

/// Result of committing the staged index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitResult {
    /// A new commit was created.
    Created(Oid),
    /// The index matches HEAD; nothing was recorded.
    NothingToCommit,
}

/// What normalizing the primary branch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchChange {
    /// HEAD was already on the target branch.
    AlreadyCurrent,
    /// The current branch was renamed.
    Renamed {
        /// Previous branch name
        from: String,
    },
    /// HEAD was unborn and now names the target branch.
    Repointed {
        /// Previous unborn branch name
        from: String,
    },
    /// HEAD was detached; the target branch was created at HEAD.
    CreatedFromDetached {
        /// The detached commit
        at: Oid,
    },
}

/// The Git interface.
///
/// This is the single point of interaction with local repository state.
/// No other module imports `git2` directly.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open the repository rooted at `path`.
    ///
    /// Parent directories are not searched: a directory nested inside some
    /// other repository is reported as [`GitError::NotARepo`], so publishing
    /// never touches an enclosing project by accident.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if `path` is not a repository root
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = match git2::Repository::open(path) {
            Ok(repo) => repo,
            Err(e) if e.code() == git2::ErrorCode::NotFound => {
                return Err(GitError::NotARepo {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(GitError::from_git2(e, "open repository")),
        };

        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        Ok(Self { repo })
    }

    /// Initialize a new repository at `path`.
    pub fn init(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::init(path)
            .map_err(|e| GitError::from_git2(e, "initialize repository"))?;
        Ok(Self { repo })
    }

    /// Check whether a repository is rooted at `path`.
    pub fn exists_at(path: &Path) -> bool {
        git2::Repository::open(path).is_ok()
    }

    /// Get repository information (git_dir and work_dir paths).
    pub fn info(&self) -> Result<RepoInfo, GitError> {
        let git_dir = self.repo.path().to_path_buf();
        let work_dir = self.repo.workdir().ok_or(GitError::BareRepo)?.to_path_buf();

        Ok(RepoInfo { git_dir, work_dir })
    }

    // =========================================================================
    // HEAD
    // =========================================================================

    /// Determine where HEAD points.
    pub fn head_state(&self) -> Result<HeadState, GitError> {
        match self.repo.head() {
            Ok(head) => {
                if head.is_branch() {
                    let name = head.shorthand().unwrap_or_default().to_string();
                    Ok(HeadState::Branch(name))
                } else {
                    let oid = head
                        .target()
                        .ok_or_else(|| GitError::Internal {
                            message: "HEAD has no target".to_string(),
                        })?;
                    Ok(HeadState::Detached(Oid::new(oid.to_string())?))
                }
            }
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                let head = self
                    .repo
                    .find_reference("HEAD")
                    .map_err(|e| GitError::from_git2(e, "HEAD"))?;
                let target = head.symbolic_target().unwrap_or("refs/heads/master");
                let name = target.strip_prefix("refs/heads/").unwrap_or(target);
                Ok(HeadState::Unborn(name.to_string()))
            }
            Err(e) => Err(GitError::from_git2(e, "HEAD")),
        }
    }

    /// Get the HEAD commit OID, or `None` if HEAD is unborn.
    pub fn head_oid(&self) -> Result<Option<Oid>, GitError> {
        match self.head_commit()? {
            Some(commit) => Ok(Some(Oid::new(commit.id().to_string())?)),
            None => Ok(None),
        }
    }

    /// Get the current branch name, if on a branch (born or unborn).
    pub fn current_branch(&self) -> Result<Option<String>, GitError> {
        Ok(match self.head_state()? {
            HeadState::Branch(name) | HeadState::Unborn(name) => Some(name),
            HeadState::Detached(_) => None,
        })
    }

    fn head_commit(&self) -> Result<Option<git2::Commit<'_>>, GitError> {
        match self.repo.head() {
            Ok(head) => head
                .peel_to_commit()
                .map(Some)
                .map_err(|e| GitError::from_git2(e, "HEAD")),
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                Ok(None)
            }
            Err(e) => Err(GitError::from_git2(e, "HEAD")),
        }
    }

    // =========================================================================
    // Staging and Committing
    // =========================================================================

    /// Stage every path in the working tree.
    ///
    /// New and modified files are added (ignore rules apply) and deletions
    /// of tracked files are recorded, matching `git add -A`. Directories
    /// holding their own repository are left out and reported in
    /// [`Staged::embedded`].
    pub fn stage_all(&self) -> Result<Staged, GitError> {
        let work_dir = self
            .repo
            .workdir()
            .ok_or(GitError::BareRepo)?
            .to_path_buf();
        let mut index = self
            .repo
            .index()
            .map_err(|e| GitError::from_git2(e, "read index"))?;

        let mut embedded = Vec::new();
        {
            let mut skip_embedded = |path: &Path, _matched: &[u8]| -> i32 {
                if is_embedded_repository(&work_dir, path) {
                    let name = path.to_string_lossy();
                    embedded.push(name.trim_end_matches('/').to_string());
                    1
                } else {
                    0
                }
            };
            index
                .add_all(
                    ["*"],
                    git2::IndexAddOption::DEFAULT,
                    Some(&mut skip_embedded as &mut git2::IndexMatchedPath),
                )
                .map_err(|e| GitError::from_git2(e, "add files"))?;
        }
        index
            .update_all(["*"], None)
            .map_err(|e| GitError::from_git2(e, "record deletions"))?;
        index
            .write()
            .map_err(|e| GitError::from_git2(e, "write index"))?;

        Ok(Staged {
            count: self.staged_count()?,
            embedded,
        })
    }

    /// Count index entries that differ from HEAD.
    pub fn staged_count(&self) -> Result<usize, GitError> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(false).include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(|e| GitError::from_git2(e, "status"))?;

        Ok(statuses
            .iter()
            .filter(|entry| {
                let status = entry.status();
                status.is_index_new()
                    || status.is_index_modified()
                    || status.is_index_deleted()
                    || status.is_index_renamed()
                    || status.is_index_typechange()
            })
            .count())
    }

    /// Count working tree paths that `stage_all` would pick up.
    ///
    /// Includes untracked files but not ignored ones. Read-only.
    pub fn pending_changes(&self) -> Result<usize, GitError> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(|e| GitError::from_git2(e, "status"))?;

        Ok(statuses
            .iter()
            .filter(|entry| entry.status() != git2::Status::CURRENT)
            .count())
    }

    /// Commit the current index.
    ///
    /// Compares the index tree with HEAD's tree; when they are equal (or
    /// HEAD is unborn and the index is empty) nothing is written and
    /// [`CommitResult::NothingToCommit`] is returned.
    ///
    /// The explicit `identity` is used for both author and committer when
    /// given, otherwise the repository's git config identity.
    ///
    /// # Errors
    ///
    /// - [`GitError::MissingIdentity`] if no identity is available
    pub fn commit_index(
        &self,
        message: &str,
        identity: Option<&Identity>,
    ) -> Result<CommitResult, GitError> {
        let mut index = self
            .repo
            .index()
            .map_err(|e| GitError::from_git2(e, "read index"))?;
        let tree_id = index
            .write_tree()
            .map_err(|e| GitError::from_git2(e, "write tree"))?;

        let parent = self.head_commit()?;
        let unchanged = match &parent {
            Some(commit) => commit.tree_id() == tree_id,
            None => index.is_empty(),
        };
        if unchanged {
            return Ok(CommitResult::NothingToCommit);
        }

        let signature = self.signature(identity)?;
        let tree = self
            .repo
            .find_tree(tree_id)
            .map_err(|e| GitError::from_git2(e, "find tree"))?;
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .map_err(|e| GitError::from_git2(e, "commit"))?;

        Ok(CommitResult::Created(Oid::new(oid.to_string())?))
    }

    /// Build the commit signature.
    fn signature(&self, identity: Option<&Identity>) -> Result<git2::Signature<'static>, GitError> {
        match identity {
            Some(id) => git2::Signature::now(&id.name, &id.email)
                .map_err(|e| GitError::from_git2(e, "signature")),
            None => self.repo.signature().map_err(|e| {
                if e.code() == git2::ErrorCode::NotFound {
                    GitError::MissingIdentity
                } else {
                    GitError::from_git2(e, "signature")
                }
            }),
        }
    }

    // =========================================================================
    // Branches
    // =========================================================================

    /// Make HEAD point at `target`, renaming or creating it as needed.
    ///
    /// Mirrors `git branch -M <target>`: an existing branch named `target`
    /// that is not current is overwritten.
    pub fn set_primary_branch(&self, target: &BranchName) -> Result<BranchChange, GitError> {
        let refname = target.refname();

        let change = match self.head_state()? {
            HeadState::Branch(name) | HeadState::Unborn(name) if name == target.as_str() => {
                return Ok(BranchChange::AlreadyCurrent)
            }
            HeadState::Branch(name) => {
                let mut branch = self
                    .repo
                    .find_branch(&name, git2::BranchType::Local)
                    .map_err(|e| GitError::from_git2(e, &name))?;
                branch
                    .rename(target.as_str(), true)
                    .map_err(|e| GitError::from_git2(e, "rename branch"))?;
                BranchChange::Renamed { from: name }
            }
            HeadState::Unborn(name) => BranchChange::Repointed { from: name },
            HeadState::Detached(oid) => {
                let commit = self
                    .head_commit()?
                    .ok_or_else(|| GitError::Internal {
                        message: "detached HEAD without a commit".to_string(),
                    })?;
                self.repo
                    .branch(target.as_str(), &commit, true)
                    .map_err(|e| GitError::from_git2(e, "create branch"))?;
                BranchChange::CreatedFromDetached { at: oid }
            }
        };

        self.repo
            .set_head(&refname)
            .map_err(|e| GitError::from_git2(e, &refname))?;

        Ok(change)
    }

    /// List local branch names.
    pub fn list_branches(&self) -> Result<Vec<String>, GitError> {
        let branches = self
            .repo
            .branches(Some(git2::BranchType::Local))
            .map_err(|e| GitError::from_git2(e, "list branches"))?;

        let mut names = Vec::new();
        for branch in branches {
            let (branch, _) = branch.map_err(|e| GitError::from_git2(e, "list branches"))?;
            if let Some(name) = branch
                .name()
                .map_err(|e| GitError::from_git2(e, "branch name"))?
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Get the configured upstream of a local branch as `(remote, merge_ref)`.
    ///
    /// Reads `branch.<name>.remote` and `branch.<name>.merge` from the
    /// repository config. Returns `None` if either is unset.
    pub fn upstream(&self, branch: &BranchName) -> Result<Option<(String, String)>, GitError> {
        let config = self
            .repo
            .config()
            .and_then(|mut c| c.snapshot())
            .map_err(|e| GitError::from_git2(e, "read config"))?;

        let remote = config.get_string(&format!("branch.{}.remote", branch)).ok();
        let merge = config.get_string(&format!("branch.{}.merge", branch)).ok();

        Ok(remote.zip(merge))
    }

    // =========================================================================
    // Remotes
    // =========================================================================

    /// Get the URL for a remote.
    ///
    /// Returns `None` if the remote doesn't exist.
    pub fn remote_url(&self, name: &str) -> Result<Option<String>, GitError> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(String::from)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::from_git2(e, name)),
        }
    }

    /// List configured remote names.
    pub fn remote_names(&self) -> Result<Vec<String>, GitError> {
        let remotes = self
            .repo
            .remotes()
            .map_err(|e| GitError::from_git2(e, "list remotes"))?;
        Ok(remotes.iter().flatten().map(String::from).collect())
    }

    /// Point the remote `name` at `url`, replacing any existing definition.
    ///
    /// An existing remote is deleted and re-added so no stale settings
    /// survive. Only a "remote not found" answer on lookup is tolerated;
    /// every other failure, including a failed delete, is an error.
    ///
    /// Returns the URL the remote had before, if it existed.
    pub fn replace_remote(
        &self,
        name: &RemoteName,
        url: &RemoteUrl,
    ) -> Result<Option<String>, GitError> {
        let previous = match self.repo.find_remote(name.as_str()) {
            Ok(remote) => Some(remote.url().unwrap_or_default().to_string()),
            Err(e) if e.code() == git2::ErrorCode::NotFound => None,
            Err(e) => return Err(GitError::from_git2(e, name.as_str())),
        };

        if previous.is_some() {
            self.repo
                .remote_delete(name.as_str())
                .map_err(|e| GitError::from_git2(e, "remove remote"))?;
        }

        self.repo
            .remote(name.as_str(), url.as_str())
            .map_err(|e| GitError::from_git2(e, "add remote"))?;

        Ok(previous)
    }
}

/// A directory under the work dir that is itself a git repository.
fn is_embedded_repository(work_dir: &Path, relative: &Path) -> bool {
    let dir = work_dir.join(relative);
    dir.is_dir() && dir.join(".git").exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn identity() -> Identity {
        Identity::new("Test User", "test@example.com").unwrap()
    }

    mod git_error {
        use super::*;

        #[test]
        fn display_formatting() {
            let err = GitError::NotARepo {
                path: PathBuf::from("/tmp/x"),
            };
            assert!(err.to_string().contains("/tmp/x"));
            assert!(GitError::MissingIdentity
                .to_string()
                .contains("missing committer identity"));
        }
    }

    mod open_and_init {
        use super::*;

        #[test]
        fn open_missing_repo_is_not_a_repo() {
            let dir = TempDir::new().unwrap();
            assert!(!Git::exists_at(dir.path()));
            assert!(matches!(
                Git::open(dir.path()),
                Err(GitError::NotARepo { .. })
            ));
        }

        #[test]
        fn init_then_open() {
            let dir = TempDir::new().unwrap();
            Git::init(dir.path()).unwrap();
            assert!(Git::exists_at(dir.path()));
            let git = Git::open(dir.path()).unwrap();
            assert!(git.info().unwrap().git_dir.ends_with(".git/"));
        }

        #[test]
        fn nested_directory_is_not_discovered() {
            let dir = TempDir::new().unwrap();
            Git::init(dir.path()).unwrap();
            let nested = dir.path().join("nested");
            std::fs::create_dir(&nested).unwrap();
            assert!(!Git::exists_at(&nested));
        }

        #[test]
        fn bare_repo_rejected() {
            let dir = TempDir::new().unwrap();
            git2::Repository::init_bare(dir.path()).unwrap();
            assert!(matches!(Git::open(dir.path()), Err(GitError::BareRepo)));
        }
    }

    mod commit {
        use super::*;

        #[test]
        fn empty_repo_has_nothing_to_commit() {
            let dir = TempDir::new().unwrap();
            let git = Git::init(dir.path()).unwrap();
            assert_eq!(git.stage_all().unwrap().count, 0);
            assert_eq!(
                git.commit_index("msg", Some(&identity())).unwrap(),
                CommitResult::NothingToCommit
            );
        }

        #[test]
        fn commit_then_nothing() {
            let dir = TempDir::new().unwrap();
            std::fs::write(dir.path().join("a.txt"), "a").unwrap();
            let git = Git::init(dir.path()).unwrap();

            assert_eq!(git.stage_all().unwrap().count, 1);
            let first = git.commit_index("msg", Some(&identity())).unwrap();
            assert!(matches!(first, CommitResult::Created(_)));

            assert_eq!(git.stage_all().unwrap().count, 0);
            assert_eq!(
                git.commit_index("msg", Some(&identity())).unwrap(),
                CommitResult::NothingToCommit
            );
        }

        #[test]
        fn deletions_are_staged() {
            let dir = TempDir::new().unwrap();
            std::fs::write(dir.path().join("a.txt"), "a").unwrap();
            std::fs::write(dir.path().join("b.txt"), "b").unwrap();
            let git = Git::init(dir.path()).unwrap();
            git.stage_all().unwrap();
            git.commit_index("first", Some(&identity())).unwrap();

            std::fs::remove_file(dir.path().join("b.txt")).unwrap();
            assert_eq!(git.stage_all().unwrap().count, 1);
            assert!(matches!(
                git.commit_index("second", Some(&identity())).unwrap(),
                CommitResult::Created(_)
            ));
        }

        #[test]
        fn pending_changes_counts_untracked() {
            let dir = TempDir::new().unwrap();
            std::fs::create_dir(dir.path().join("docs")).unwrap();
            std::fs::write(dir.path().join("a.txt"), "a").unwrap();
            std::fs::write(dir.path().join("docs/b.md"), "b").unwrap();
            let git = Git::init(dir.path()).unwrap();

            assert_eq!(git.pending_changes().unwrap(), 2);
            git.stage_all().unwrap();
            git.commit_index("first", Some(&identity())).unwrap();
            assert_eq!(git.pending_changes().unwrap(), 0);
        }

        #[test]
        fn ignored_files_are_not_staged() {
            let dir = TempDir::new().unwrap();
            std::fs::write(dir.path().join(".gitignore"), "secret.txt\n").unwrap();
            std::fs::write(dir.path().join("secret.txt"), "x").unwrap();
            let git = Git::init(dir.path()).unwrap();

            assert_eq!(git.stage_all().unwrap().count, 1);
        }

        #[test]
        fn embedded_repository_is_skipped() {
            let dir = TempDir::new().unwrap();
            std::fs::write(dir.path().join("a.txt"), "a").unwrap();
            let vendor = dir.path().join("vendor");
            std::fs::create_dir(&vendor).unwrap();
            git2::Repository::init(&vendor).unwrap();
            std::fs::write(vendor.join("lib.rs"), "x").unwrap();
            let git = Git::init(dir.path()).unwrap();

            let staged = git.stage_all().unwrap();
            assert_eq!(staged.count, 1);
            assert_eq!(staged.embedded, vec!["vendor".to_string()]);
            assert!(matches!(
                git.commit_index("first", Some(&identity())).unwrap(),
                CommitResult::Created(_)
            ));
        }
    }

    mod branches {
        use super::*;

        fn repo_with_commit() -> (TempDir, Git) {
            let dir = TempDir::new().unwrap();
            std::fs::write(dir.path().join("a.txt"), "a").unwrap();
            let git = Git::init(dir.path()).unwrap();
            git.stage_all().unwrap();
            git.commit_index("first", Some(&identity())).unwrap();
            (dir, git)
        }

        #[test]
        fn rename_current_branch() {
            let (_dir, git) = repo_with_commit();
            let target = BranchName::new("published").unwrap();

            let change = git.set_primary_branch(&target).unwrap();
            assert!(matches!(change, BranchChange::Renamed { .. }));
            assert_eq!(git.current_branch().unwrap().as_deref(), Some("published"));
            assert_eq!(git.list_branches().unwrap(), vec!["published".to_string()]);
        }

        #[test]
        fn already_current_is_noop() {
            let (_dir, git) = repo_with_commit();
            let target = BranchName::new("published").unwrap();
            git.set_primary_branch(&target).unwrap();

            assert_eq!(
                git.set_primary_branch(&target).unwrap(),
                BranchChange::AlreadyCurrent
            );
        }

        #[test]
        fn unborn_head_is_repointed() {
            let dir = TempDir::new().unwrap();
            let git = Git::init(dir.path()).unwrap();
            let target = BranchName::new("published").unwrap();

            let change = git.set_primary_branch(&target).unwrap();
            assert!(matches!(change, BranchChange::Repointed { .. }));
            assert_eq!(
                git.head_state().unwrap(),
                HeadState::Unborn("published".to_string())
            );
        }

        #[test]
        fn detached_head_creates_branch() {
            let (_dir, git) = repo_with_commit();
            let oid = git.head_oid().unwrap().unwrap();
            git.repo
                .set_head_detached(git2::Oid::from_str(oid.as_str()).unwrap())
                .unwrap();

            let target = BranchName::new("main").unwrap();
            let change = git.set_primary_branch(&target).unwrap();
            assert_eq!(change, BranchChange::CreatedFromDetached { at: oid });
            assert_eq!(
                git.head_state().unwrap(),
                HeadState::Branch("main".to_string())
            );
        }
    }

    mod remotes {
        use super::*;

        #[test]
        fn add_then_replace() {
            let dir = TempDir::new().unwrap();
            let git = Git::init(dir.path()).unwrap();
            let origin = RemoteName::default();

            let first = RemoteUrl::new("https://example.com/one.git").unwrap();
            assert_eq!(git.replace_remote(&origin, &first).unwrap(), None);

            let second = RemoteUrl::new("https://example.com/two.git").unwrap();
            assert_eq!(
                git.replace_remote(&origin, &second).unwrap().as_deref(),
                Some("https://example.com/one.git")
            );

            assert_eq!(git.remote_names().unwrap(), vec!["origin".to_string()]);
            assert_eq!(
                git.remote_url("origin").unwrap().as_deref(),
                Some("https://example.com/two.git")
            );
        }

        #[test]
        fn missing_remote_url_is_none() {
            let dir = TempDir::new().unwrap();
            let git = Git::init(dir.path()).unwrap();
            assert_eq!(git.remote_url("origin").unwrap(), None);
        }

        #[test]
        fn other_remotes_are_left_alone() {
            let dir = TempDir::new().unwrap();
            let git = Git::init(dir.path()).unwrap();
            git.repo
                .remote("backup", "https://example.com/backup.git")
                .unwrap();

            let url = RemoteUrl::new("https://example.com/repo.git").unwrap();
            git.replace_remote(&RemoteName::default(), &url).unwrap();

            let mut names = git.remote_names().unwrap();
            names.sort();
            assert_eq!(names, vec!["backup".to_string(), "origin".to_string()]);
        }
    }
}
