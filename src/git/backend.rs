//! git::backend
//!
//! The VCS backend abstraction consumed by the workflow engines.
//!
//! # Design
//!
//! The engines never talk to libgit2 directly. They see the repository only
//! through [`VcsBackend`], whose surface is exactly what the stage, commit,
//! push and pull workflows need: working-tree status, the index, commit
//! creation, branch and ref manipulation, remote configuration, and blocking
//! fetch/push. [`crate::git::Git`] implements it on top of `git2`;
//! [`crate::git::mock::MockBackend`] implements it in memory for tests.
//!
//! All methods take `&self`; no concurrent writers are assumed.

use std::path::{Path, PathBuf};

use crate::core::types::{BranchName, Oid, RefName, RefSpec};
use crate::ui::output::Verbosity;

use super::interface::GitError;

/// Information about a Git repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    /// Path to .git directory
    pub git_dir: PathBuf,
    /// Path to working directory
    pub work_dir: PathBuf,
}

/// The configured author identity (`user.name`, `user.email`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Author/committer identity with a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub when: chrono::DateTime<chrono::Utc>,
}

/// Status of one working-tree path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Same as the last commit.
    Unmodified,
    /// Tracked and changed in the working tree.
    Modified,
    /// Untracked.
    New,
    /// Tracked and removed from the working tree.
    Deleted,
    /// Changed in the index only.
    Staged,
    /// Matched by an ignore rule.
    Ignored,
}

/// A path reported by a status scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingTreeEntry {
    /// Path relative to the work tree root
    pub path: PathBuf,
    pub status: EntryStatus,
}

impl WorkingTreeEntry {
    /// Create a new entry.
    pub fn new(path: impl Into<PathBuf>, status: EntryStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }
}

/// Information about a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// The commit OID
    pub oid: Oid,
    /// First line of the commit message
    pub summary: String,
    /// Full commit message
    pub message: String,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// Author timestamp
    pub author_time: chrono::DateTime<chrono::Utc>,
}

/// A configured remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInfo {
    pub name: String,
    /// Fetch URL
    pub url: Option<String>,
    /// Explicit push URL, if one is configured
    pub push_url: Option<String>,
}

impl RemoteInfo {
    /// The URL pushes go to: the push URL, or the fetch URL when none is set.
    pub fn effective_push_url(&self) -> Option<&str> {
        self.push_url.as_deref().or(self.url.as_deref())
    }
}

/// A reference the remote refused to update during a push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefRejection {
    pub reference: String,
    pub message: String,
}

/// Result of merging a fetched commit into the current branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeStatus {
    /// Nothing to merge.
    UpToDate,
    /// The branch was moved forward to this commit.
    FastForward(Oid),
    /// A merge commit was created.
    Merged(Oid),
    /// The merge stopped with conflicts in the index.
    Conflicts,
}

impl std::fmt::Display for MergeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeStatus::UpToDate => write!(f, "up to date"),
            MergeStatus::FastForward(_) => write!(f, "fast-forward"),
            MergeStatus::Merged(_) => write!(f, "merged"),
            MergeStatus::Conflicts => write!(f, "conflicts"),
        }
    }
}

/// Credentials offered to the remote during push and fetch.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Options shared by network operations.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub credentials: Credentials,
    /// Progress callbacks log at debug level only.
    pub verbosity: Verbosity,
}

/// The repository operations the workflow engines rely on.
pub trait VcsBackend {
    /// Paths of the git directory and the work tree.
    fn repo_info(&self) -> Result<RepoInfo, GitError>;

    /// The configured identity; missing values are `None`.
    fn identity(&self) -> Result<Identity, GitError>;

    /// Build a signature for "now" from the configured identity.
    ///
    /// Fails with [`GitError::IdentityNotConfigured`] if `user.name` or
    /// `user.email` is unset.
    fn signature(&self) -> Result<Signature, GitError>;

    /// Scan the working tree. Ignored paths are reported only when asked.
    fn status(&self, include_ignored: bool) -> Result<Vec<WorkingTreeEntry>, GitError>;

    /// Add a work-tree relative file or directory to the index and write it.
    ///
    /// Staging an already-staged path is a no-op.
    fn stage_path(&self, path: &Path) -> Result<(), GitError>;

    /// Commit the index.
    ///
    /// With `amend`, the tip commit is replaced. When the repository has no
    /// commits and no branches, the commit is created without moving any ref;
    /// attaching it to a branch is the caller's job.
    fn create_commit(
        &self,
        message: &str,
        author: &Signature,
        committer: &Signature,
        amend: bool,
    ) -> Result<CommitInfo, GitError>;

    /// The commit HEAD points at, `None` for an unborn HEAD.
    fn head_commit(&self) -> Result<Option<CommitInfo>, GitError>;

    /// The branch HEAD points at, `None` if detached or unborn.
    fn current_branch(&self) -> Result<Option<BranchName>, GitError>;

    /// The first local branch, if any exist.
    fn first_branch(&self) -> Result<Option<BranchName>, GitError>;

    /// Whether a local branch exists.
    fn branch_exists(&self, name: &BranchName) -> Result<bool, GitError>;

    /// Create a local branch at `target`.
    fn create_branch(&self, name: &BranchName, target: &Oid) -> Result<(), GitError>;

    /// Delete a local branch.
    fn delete_branch(&self, name: &BranchName) -> Result<(), GitError>;

    /// Point HEAD at `refname`.
    fn set_head(&self, refname: &RefName) -> Result<(), GitError>;

    /// Whether `refs/remotes/<remote>/<branch>` exists.
    fn remote_tracking_exists(&self, remote: &str, branch: &BranchName) -> Result<bool, GitError>;

    /// Look up a remote by name.
    fn find_remote(&self, name: &str) -> Result<Option<RemoteInfo>, GitError>;

    /// Add a remote with `url` as both fetch and push URL.
    fn add_remote(&self, name: &str, url: &str) -> Result<(), GitError>;

    /// Set both the fetch and the push URL of an existing remote.
    fn set_remote_urls(&self, name: &str, url: &str) -> Result<(), GitError>;

    /// Push one refspec. Blocks until the remote answers.
    ///
    /// Returns the references the remote refused (empty on full success).
    /// Transport-level failures are errors: [`GitError::NonFastForward`],
    /// [`GitError::Transport`].
    fn push(
        &self,
        remote: &str,
        refspec: &RefSpec,
        transport: &TransportOptions,
    ) -> Result<Vec<RefRejection>, GitError>;

    /// Fetch from a remote. An empty `refspecs` uses the remote's configured ones.
    fn fetch(
        &self,
        remote: &str,
        refspecs: &[RefSpec],
        transport: &TransportOptions,
    ) -> Result<(), GitError>;

    /// The commit the last fetch recorded for the remote ref `source`.
    fn fetched_tip(&self, source: &RefName) -> Result<Option<Oid>, GitError>;

    /// Merge `their` into the current branch.
    ///
    /// A checkout that would overwrite local changes fails with
    /// [`GitError::CheckoutConflict`] and leaves the repository untouched.
    fn merge(&self, their: &Oid, label: &str, signature: &Signature)
        -> Result<MergeStatus, GitError>;
}
