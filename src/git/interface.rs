//! git::interface
//!
//! Git interface implementation using git2.
//!
//! [`Git`] is the production [`VcsBackend`]. Every libgit2 call in the crate
//! lives here; errors are normalized into [`GitError`] so the engines can
//! tell precondition failures from expected operation failures.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::IdentityNotConfigured`]: `user.name` / `user.email` unset
//! - [`GitError::NonFastForward`]: Push rejected as non-fast-forward
//! - [`GitError::Transport`]: Network or authentication failure
//! - [`GitError::CheckoutConflict`]: Merge checkout would overwrite local changes
//!
//! # Example
//!
//! ```no_run
//! use scmapp::git::{Git, VcsBackend};
//! use std::path::Path;
//!
//! let git = Git::open(Path::new(".")).unwrap();
//! if let Some(tip) = git.head_commit().unwrap() {
//!     println!("HEAD is at {}", tip.oid.short_id());
//! }
//! ```

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;

use crate::core::types::{BranchName, Oid, RefName, RefSpec, TypeError};
use crate::ui::output;

use super::backend::{
    CommitInfo, Credentials, EntryStatus, Identity, MergeStatus, RefRejection, RemoteInfo,
    RepoInfo, Signature, TransportOptions, VcsBackend, WorkingTreeEntry,
};

/// Credential callbacks give up after this many attempts.
pub const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// Errors from Git operations.
#[derive(Debug, Clone, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {}", path.display())]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// `user.name` or `user.email` is not configured.
    #[error("author identity unknown: set user.name and user.email")]
    IdentityNotConfigured,

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// Named remote does not exist.
    #[error("remote '{name}' does not exist")]
    RemoteNotFound {
        /// The remote name
        name: String,
    },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The OID that was not found
        oid: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Invalid ref name format.
    #[error("invalid ref name: {message}")]
    InvalidRefName {
        /// Description of the problem
        message: String,
    },

    /// The remote refused a non-fast-forward update.
    #[error("non-fast-forward update rejected for {refname}")]
    NonFastForward {
        /// The destination ref of the push
        refname: String,
    },

    /// Network or authentication failure.
    #[error("transport error: {message}")]
    Transport {
        /// The error message
        message: String,
        /// The underlying cause, if libgit2 reported one
        cause: Option<String>,
    },

    /// A checkout would overwrite local changes.
    #[error("checkout conflict: {message}")]
    CheckoutConflict {
        /// The error message
        message: String,
    },

    /// Permission or filesystem error.
    #[error("repository access error: {message}")]
    AccessError {
        /// Description of the error
        message: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with richer context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => {
                if context.starts_with("refs/") || context.contains("ref") {
                    GitError::RefNotFound {
                        refname: context.to_string(),
                    }
                } else {
                    GitError::ObjectNotFound {
                        oid: context.to_string(),
                    }
                }
            }
            git2::ErrorCode::InvalidSpec => GitError::InvalidOid {
                oid: context.to_string(),
            },
            git2::ErrorCode::Locked => GitError::AccessError {
                message: format!("repository is locked: {}", err.message()),
            },
            git2::ErrorCode::Conflict => GitError::CheckoutConflict {
                message: err.message().to_string(),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }

    /// Classify a failed push or fetch.
    fn from_network(err: git2::Error, refname: &str) -> Self {
        let message = err.message().to_string();
        let lowered = message.to_ascii_lowercase();
        if err.code() == git2::ErrorCode::NotFastForward
            || lowered.contains("non-fastforward")
            || lowered.contains("not present locally")
        {
            return GitError::NonFastForward {
                refname: refname.to_string(),
            };
        }

        let cause = match err.class() {
            git2::ErrorClass::None => None,
            class => Some(format!("{:?} error (code {:?})", class, err.code())),
        };
        GitError::Transport { message, cause }
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => GitError::RefNotFound {
                refname: err.message().to_string(),
            },
            git2::ErrorCode::InvalidSpec => GitError::InvalidOid {
                oid: err.message().to_string(),
            },
            git2::ErrorCode::Conflict => GitError::CheckoutConflict {
                message: err.message().to_string(),
            },
            _ => GitError::Internal {
                message: err.message().to_string(),
            },
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
            TypeError::InvalidRefName(msg) => GitError::InvalidRefName { message: msg },
            TypeError::InvalidBranchName(msg) => GitError::InvalidRefName { message: msg },
        }
    }
}

/// How one credential request is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CredentialStrategy {
    /// Configured user name and token.
    Plaintext,
    /// Keys held by a running ssh-agent.
    SshAgent,
    /// The git credential helper.
    Helper,
    /// Negotiated (NTLM/Kerberos) credentials.
    Default,
}

/// Strategies to try, in order, for the credential types the remote allows.
fn credential_plan(
    allowed: git2::CredentialType,
    has_token: bool,
    has_helper: bool,
) -> Vec<CredentialStrategy> {
    let mut plan = Vec::new();
    if allowed.contains(git2::CredentialType::USER_PASS_PLAINTEXT) && has_token {
        plan.push(CredentialStrategy::Plaintext);
    }
    if allowed.contains(git2::CredentialType::SSH_KEY) {
        plan.push(CredentialStrategy::SshAgent);
    }
    if allowed.contains(git2::CredentialType::USER_PASS_PLAINTEXT) && has_helper {
        plan.push(CredentialStrategy::Helper);
    }
    if allowed.contains(git2::CredentialType::DEFAULT) {
        plan.push(CredentialStrategy::Default);
    }
    plan
}

fn classify_status(status: git2::Status) -> EntryStatus {
    if status.is_ignored() {
        EntryStatus::Ignored
    } else if status.is_wt_new() {
        EntryStatus::New
    } else if status.is_wt_deleted() {
        EntryStatus::Deleted
    } else if status.is_wt_modified()
        || status.is_wt_typechange()
        || status.is_wt_renamed()
        || status.is_conflicted()
    {
        EntryStatus::Modified
    } else if status.is_index_new()
        || status.is_index_modified()
        || status.is_index_deleted()
        || status.is_index_renamed()
        || status.is_index_typechange()
    {
        EntryStatus::Staged
    } else {
        EntryStatus::Unmodified
    }
}

fn to_git2_signature(sig: &Signature) -> Result<git2::Signature<'static>, GitError> {
    let when = git2::Time::new(sig.when.timestamp(), 0);
    git2::Signature::new(&sig.name, &sig.email, &when).map_err(|e| GitError::Internal {
        message: format!("invalid signature: {}", e.message()),
    })
}

fn is_missing(err: &git2::Error) -> bool {
    matches!(
        err.code(),
        git2::ErrorCode::NotFound | git2::ErrorCode::UnbornBranch
    )
}

/// The Git interface.
///
/// This is the **single point of interaction** with Git. No other module
/// imports `git2` directly.
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

    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover` to find the repository root,
    /// so `path` can be any directory within the repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        Ok(Self { repo })
    }

    /// Get repository information (git_dir and work_dir paths).
    pub fn info(&self) -> Result<RepoInfo, GitError> {
        let git_dir = self.repo.path().to_path_buf();
        let work_dir = self.repo.workdir().ok_or(GitError::BareRepo)?.to_path_buf();

        Ok(RepoInfo { git_dir, work_dir })
    }

    fn git2_oid(oid: &Oid) -> Result<git2::Oid, GitError> {
        git2::Oid::from_str(oid.as_str()).map_err(|e| GitError::from_git2(e, oid.as_str()))
    }

    fn commit_info(commit: &git2::Commit<'_>) -> Result<CommitInfo, GitError> {
        let author = commit.author();
        let author_time = chrono::DateTime::from_timestamp(author.when().seconds(), 0)
            .unwrap_or(chrono::DateTime::UNIX_EPOCH)
            .with_timezone(&chrono::Utc);

        Ok(CommitInfo {
            oid: Oid::new(commit.id().to_string())?,
            summary: commit.summary().unwrap_or("").to_string(),
            message: commit.message().unwrap_or("").to_string(),
            author_name: author.name().unwrap_or("").to_string(),
            author_email: author.email().unwrap_or("").to_string(),
            author_time,
        })
    }

    fn head_git2_commit(&self) -> Result<Option<git2::Commit<'_>>, GitError> {
        match self.repo.head() {
            Ok(head) => Ok(Some(
                head.peel_to_commit()
                    .map_err(|e| GitError::from_git2(e, "HEAD"))?,
            )),
            Err(e) if is_missing(&e) => Ok(None),
            Err(e) => Err(GitError::from_git2(e, "HEAD")),
        }
    }

    fn find_git2_remote(&self, name: &str) -> Result<git2::Remote<'_>, GitError> {
        self.repo.find_remote(name).map_err(|e| match e.code() {
            git2::ErrorCode::NotFound | git2::ErrorCode::InvalidSpec => GitError::RemoteNotFound {
                name: name.to_string(),
            },
            _ => GitError::from_git2(e, name),
        })
    }

    /// The ref HEAD points at symbolically (e.g. `refs/heads/dev`), even when unborn.
    fn head_target(&self) -> Result<String, GitError> {
        let head = self
            .repo
            .find_reference("HEAD")
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;
        head.symbolic_target()
            .map(String::from)
            .ok_or_else(|| GitError::RefNotFound {
                refname: "HEAD is detached".to_string(),
            })
    }

    // =========================================================================
    // Network Callbacks
    // =========================================================================

    /// Build the credential and progress callbacks shared by push and fetch.
    fn remote_callbacks<'cb>(&self, transport: &'cb TransportOptions) -> git2::RemoteCallbacks<'cb> {
        let credentials: &'cb Credentials = &transport.credentials;
        let verbosity = transport.verbosity;
        let helper_config = self.repo.config().ok();
        let attempts = Rc::new(Cell::new(0usize));

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(move |url, username_from_url, allowed| {
            let username = credentials
                .username
                .as_deref()
                .or(username_from_url)
                .unwrap_or("git");

            if allowed.contains(git2::CredentialType::USERNAME) {
                return git2::Cred::username(username);
            }

            let attempt = attempts.get();
            attempts.set(attempt + 1);
            if attempt >= MAX_CREDENTIAL_ATTEMPTS {
                return Err(git2::Error::from_str(&format!(
                    "authentication failed for {} after {} attempts",
                    url, MAX_CREDENTIAL_ATTEMPTS
                )));
            }

            let plan = credential_plan(
                allowed,
                credentials.token.is_some(),
                helper_config.is_some(),
            );
            let Some(strategy) = plan.get(attempt).copied() else {
                return Err(git2::Error::from_str(&format!(
                    "no credentials available for {}",
                    url
                )));
            };
            output::debug(
                format!("credential attempt {} for {}: {:?}", attempt + 1, url, strategy),
                verbosity,
            );

            match strategy {
                CredentialStrategy::Plaintext => git2::Cred::userpass_plaintext(
                    username,
                    credentials.token.as_deref().unwrap_or_default(),
                ),
                CredentialStrategy::SshAgent => git2::Cred::ssh_key_from_agent(username),
                CredentialStrategy::Helper => match &helper_config {
                    Some(config) => git2::Cred::credential_helper(config, url, username_from_url),
                    None => Err(git2::Error::from_str("no credential helper configured")),
                },
                CredentialStrategy::Default => git2::Cred::default(),
            }
        });

        callbacks.sideband_progress(move |data| {
            output::debug(
                format!("remote: {}", String::from_utf8_lossy(data).trim_end()),
                verbosity,
            );
            true
        });
        callbacks.transfer_progress(move |stats| {
            if stats.received_objects() == stats.total_objects() {
                output::debug(
                    format!(
                        "received {} objects ({} bytes)",
                        stats.received_objects(),
                        stats.received_bytes()
                    ),
                    verbosity,
                );
            }
            true
        });
        callbacks.pack_progress(move |stage, current, total| {
            if current == total {
                output::debug(format!("pack {:?}: {}/{}", stage, current, total), verbosity);
            }
        });
        callbacks.push_transfer_progress(move |current, total, bytes| {
            if current == total {
                output::debug(
                    format!("pushed {}/{} objects ({} bytes)", current, total, bytes),
                    verbosity,
                );
            }
        });

        callbacks
    }
}

impl VcsBackend for Git {
    fn repo_info(&self) -> Result<RepoInfo, GitError> {
        self.info()
    }

    fn identity(&self) -> Result<Identity, GitError> {
        let config = self
            .repo
            .config()
            .map_err(|e| GitError::from_git2(e, "config"))?;
        let read = |key: &str| {
            config
                .get_string(key)
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Ok(Identity {
            name: read("user.name"),
            email: read("user.email"),
        })
    }

    fn signature(&self) -> Result<Signature, GitError> {
        match self.identity()? {
            Identity {
                name: Some(name),
                email: Some(email),
            } => Ok(Signature {
                name,
                email,
                when: chrono::Utc::now(),
            }),
            _ => Err(GitError::IdentityNotConfigured),
        }
    }

    fn status(&self, include_ignored: bool) -> Result<Vec<WorkingTreeEntry>, GitError> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(false)
            .include_ignored(include_ignored)
            .recurse_ignored_dirs(false);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(|e| GitError::from_git2(e, "status"))?;

        let mut entries = Vec::with_capacity(statuses.len());
        for entry in statuses.iter() {
            let Some(path) = entry.path() else {
                continue;
            };
            entries.push(WorkingTreeEntry::new(path, classify_status(entry.status())));
        }

        Ok(entries)
    }

    fn stage_path(&self, path: &Path) -> Result<(), GitError> {
        let info = self.info()?;
        let mut index = self
            .repo
            .index()
            .map_err(|e| GitError::from_git2(e, "index"))?;

        let display = path.to_string_lossy();
        if info.work_dir.join(path).is_dir() {
            // libgit2 has no pathspec for "the whole tree" other than a glob.
            let spec = match display.trim_end_matches('/') {
                "." => "*".to_string(),
                dir => dir.to_string(),
            };
            index
                .add_all([spec.as_str()], git2::IndexAddOption::DEFAULT, None)
                .map_err(|e| GitError::from_git2(e, &display))?;
        } else {
            index
                .add_path(path)
                .map_err(|e| GitError::from_git2(e, &display))?;
        }

        index
            .write()
            .map_err(|e| GitError::from_git2(e, "index"))
    }

    fn create_commit(
        &self,
        message: &str,
        author: &Signature,
        committer: &Signature,
        amend: bool,
    ) -> Result<CommitInfo, GitError> {
        let author = to_git2_signature(author)?;
        let committer = to_git2_signature(committer)?;

        let mut index = self
            .repo
            .index()
            .map_err(|e| GitError::from_git2(e, "index"))?;
        let tree_oid = index
            .write_tree()
            .map_err(|e| GitError::from_git2(e, "index"))?;
        let tree = self
            .repo
            .find_tree(tree_oid)
            .map_err(|e| GitError::from_git2(e, "tree"))?;

        let tip = self.head_git2_commit()?;
        let oid = match (&tip, amend) {
            (Some(tip), true) => tip
                .amend(
                    Some("HEAD"),
                    Some(&author),
                    Some(&committer),
                    None,
                    Some(message),
                    Some(&tree),
                )
                .map_err(|e| GitError::from_git2(e, "HEAD"))?,
            _ => {
                let parents: Vec<&git2::Commit<'_>> = tip.iter().collect();
                // A repository without branches gets its first branch from the caller.
                let update_ref = if tip.is_none() && self.first_branch()?.is_none() {
                    None
                } else {
                    Some("HEAD")
                };
                self.repo
                    .commit(update_ref, &author, &committer, message, &tree, &parents)
                    .map_err(|e| GitError::from_git2(e, "HEAD"))?
            }
        };

        let commit = self
            .repo
            .find_commit(oid)
            .map_err(|e| GitError::from_git2(e, &oid.to_string()))?;
        Self::commit_info(&commit)
    }

    fn head_commit(&self) -> Result<Option<CommitInfo>, GitError> {
        match self.head_git2_commit()? {
            Some(commit) => Ok(Some(Self::commit_info(&commit)?)),
            None => Ok(None),
        }
    }

    fn current_branch(&self) -> Result<Option<BranchName>, GitError> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e) if is_missing(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if head.is_branch() {
            if let Some(name) = head.shorthand() {
                return Ok(Some(BranchName::new(name)?));
            }
        }

        Ok(None) // Detached HEAD
    }

    fn first_branch(&self) -> Result<Option<BranchName>, GitError> {
        let mut branches = self
            .repo
            .branches(Some(git2::BranchType::Local))
            .map_err(|e| GitError::from_git2(e, "refs/heads"))?;

        match branches.next() {
            Some(Ok((branch, _))) => {
                let name = branch
                    .name()
                    .map_err(|e| GitError::from_git2(e, "refs/heads"))?
                    .unwrap_or_default();
                Ok(Some(BranchName::new(name)?))
            }
            Some(Err(e)) => Err(GitError::from_git2(e, "refs/heads")),
            None => Ok(None),
        }
    }

    fn branch_exists(&self, name: &BranchName) -> Result<bool, GitError> {
        match self.repo.find_branch(name.as_str(), git2::BranchType::Local) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(GitError::from_git2(e, name.as_str())),
        }
    }

    fn create_branch(&self, name: &BranchName, target: &Oid) -> Result<(), GitError> {
        let commit = self
            .repo
            .find_commit(Self::git2_oid(target)?)
            .map_err(|e| GitError::from_git2(e, target.as_str()))?;
        self.repo
            .branch(name.as_str(), &commit, false)
            .map_err(|e| GitError::from_git2(e, name.as_str()))?;
        Ok(())
    }

    fn delete_branch(&self, name: &BranchName) -> Result<(), GitError> {
        let refname = RefName::for_branch(name);
        let mut branch = self
            .repo
            .find_branch(name.as_str(), git2::BranchType::Local)
            .map_err(|e| GitError::from_git2(e, refname.as_str()))?;
        branch
            .delete()
            .map_err(|e| GitError::from_git2(e, refname.as_str()))
    }

    fn set_head(&self, refname: &RefName) -> Result<(), GitError> {
        self.repo
            .set_head(refname.as_str())
            .map_err(|e| GitError::from_git2(e, refname.as_str()))
    }

    fn remote_tracking_exists(&self, remote: &str, branch: &BranchName) -> Result<bool, GitError> {
        let refname = RefName::for_remote_tracking(remote, branch);
        match self.repo.find_reference(refname.as_str()) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(GitError::from_git2(e, refname.as_str())),
        }
    }

    fn find_remote(&self, name: &str) -> Result<Option<RemoteInfo>, GitError> {
        match self.find_git2_remote(name) {
            Ok(remote) => Ok(Some(RemoteInfo {
                name: name.to_string(),
                url: remote.url().map(String::from),
                push_url: remote.pushurl().map(String::from),
            })),
            Err(GitError::RemoteNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<(), GitError> {
        self.repo
            .remote(name, url)
            .map_err(|e| GitError::from_git2(e, name))?;
        self.repo
            .remote_set_pushurl(name, Some(url))
            .map_err(|e| GitError::from_git2(e, name))
    }

    fn set_remote_urls(&self, name: &str, url: &str) -> Result<(), GitError> {
        self.find_git2_remote(name)?;
        self.repo
            .remote_set_url(name, url)
            .map_err(|e| GitError::from_git2(e, name))?;
        self.repo
            .remote_set_pushurl(name, Some(url))
            .map_err(|e| GitError::from_git2(e, name))
    }

    fn push(
        &self,
        remote: &str,
        refspec: &RefSpec,
        transport: &TransportOptions,
    ) -> Result<Vec<RefRejection>, GitError> {
        let mut git_remote = self.find_git2_remote(remote)?;

        let rejections: Rc<RefCell<Vec<RefRejection>>> = Rc::new(RefCell::new(Vec::new()));
        let mut callbacks = self.remote_callbacks(transport);
        let rejected = Rc::clone(&rejections);
        callbacks.push_update_reference(move |refname, status| {
            if let Some(message) = status {
                if let Ok(mut entries) = rejected.try_borrow_mut() {
                    entries.push(RefRejection {
                        reference: refname.to_string(),
                        message: message.to_string(),
                    });
                }
            }
            Ok(())
        });

        let mut opts = git2::PushOptions::new();
        opts.remote_callbacks(callbacks);

        let spec = refspec.to_string();
        output::debug(format!("push {} {}", remote, spec), transport.verbosity);
        git_remote
            .push(&[spec.as_str()], Some(&mut opts))
            .map_err(|e| GitError::from_network(e, refspec.destination().as_str()))?;

        let rejected = rejections.borrow().clone();
        Ok(rejected)
    }

    fn fetch(
        &self,
        remote: &str,
        refspecs: &[RefSpec],
        transport: &TransportOptions,
    ) -> Result<(), GitError> {
        let mut git_remote = self.find_git2_remote(remote)?;

        // A stale FETCH_HEAD would make a missing remote branch look fetched.
        let fetch_head = self.repo.path().join("FETCH_HEAD");
        if fetch_head.exists() {
            std::fs::remove_file(&fetch_head).map_err(|e| GitError::AccessError {
                message: format!("cannot remove {}: {}", fetch_head.display(), e),
            })?;
        }

        let specs: Vec<String> = refspecs.iter().map(|spec| spec.to_string()).collect();
        output::debug(
            format!("fetch {} [{}]", remote, specs.join(", ")),
            transport.verbosity,
        );

        let mut opts = git2::FetchOptions::new();
        opts.remote_callbacks(self.remote_callbacks(transport));
        git_remote
            .fetch(&specs, Some(&mut opts), None)
            .map_err(|e| match e.code() {
                git2::ErrorCode::NotFound => GitError::RefNotFound {
                    refname: e.message().to_string(),
                },
                _ => GitError::from_network(e, remote),
            })
    }

    fn fetched_tip(&self, source: &RefName) -> Result<Option<Oid>, GitError> {
        let mut found: Option<git2::Oid> = None;
        let walked = self.repo.fetchhead_foreach(|refname, _url, oid, _is_merge| {
            if found.is_none() && refname == source.as_str() {
                found = Some(*oid);
            }
            true
        });

        match walked {
            Ok(()) => {}
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(GitError::from_git2(e, "FETCH_HEAD")),
        }

        found.map(|oid| Oid::new(oid.to_string())).transpose().map_err(Into::into)
    }

    fn merge(
        &self,
        their: &Oid,
        label: &str,
        signature: &Signature,
    ) -> Result<MergeStatus, GitError> {
        let their_oid = Self::git2_oid(their)?;
        let annotated = self
            .repo
            .find_annotated_commit(their_oid)
            .map_err(|e| GitError::from_git2(e, their.as_str()))?;
        let (analysis, _) = self
            .repo
            .merge_analysis(&[&annotated])
            .map_err(|e| GitError::from_git2(e, their.as_str()))?;

        if analysis.is_up_to_date() || analysis.is_none() {
            return Ok(MergeStatus::UpToDate);
        }

        if analysis.is_fast_forward() || analysis.is_unborn() {
            let target = self
                .repo
                .find_object(their_oid, None)
                .map_err(|e| GitError::from_git2(e, their.as_str()))?;
            let mut checkout = git2::build::CheckoutBuilder::new();
            checkout.safe();
            self.repo
                .checkout_tree(&target, Some(&mut checkout))
                .map_err(|e| GitError::from_git2(e, "checkout"))?;

            let head_ref = self.head_target()?;
            self.repo
                .reference(
                    &head_ref,
                    their_oid,
                    true,
                    &format!("pull: fast-forward to {}", label),
                )
                .map_err(|e| GitError::from_git2(e, &head_ref))?;
            return Ok(MergeStatus::FastForward(their.clone()));
        }

        let mut checkout = git2::build::CheckoutBuilder::new();
        checkout.safe();
        let mut merge_opts = git2::MergeOptions::new();
        self.repo
            .merge(&[&annotated], Some(&mut merge_opts), Some(&mut checkout))
            .map_err(|e| GitError::from_git2(e, "merge"))?;

        let mut index = self
            .repo
            .index()
            .map_err(|e| GitError::from_git2(e, "index"))?;
        if index.has_conflicts() {
            return Ok(MergeStatus::Conflicts);
        }

        let tree_oid = index
            .write_tree()
            .map_err(|e| GitError::from_git2(e, "index"))?;
        let tree = self
            .repo
            .find_tree(tree_oid)
            .map_err(|e| GitError::from_git2(e, "tree"))?;
        let ours = self.head_git2_commit()?.ok_or_else(|| GitError::RefNotFound {
            refname: "HEAD".to_string(),
        })?;
        let theirs = self
            .repo
            .find_commit(their_oid)
            .map_err(|e| GitError::from_git2(e, their.as_str()))?;

        let branch = self
            .current_branch()?
            .map(|b| b.as_str().to_string())
            .unwrap_or_else(|| "HEAD".to_string());
        let sig = to_git2_signature(signature)?;
        let message = format!("Merge {} into {}", label, branch);
        let merged = self
            .repo
            .commit(Some("HEAD"), &sig, &sig, &message, &tree, &[&ours, &theirs])
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;
        self.repo
            .cleanup_state()
            .map_err(|e| GitError::from_git2(e, "merge"))?;

        Ok(MergeStatus::Merged(Oid::new(merged.to_string())?))
    }
}
