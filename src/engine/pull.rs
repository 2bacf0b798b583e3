//! engine::pull
//!
//! Fetches from `origin` or `upstream` and merges into the current branch.
//!
//! # Modes
//!
//! - [`PullMode::Origin`] fetches with the remote's configured refspecs and
//!   merges the fetched `refs/heads/<current>`.
//! - [`PullMode::Upstream`] fetches `refs/heads/<upstream>` into
//!   `refs/remotes/upstream/<current>` and merges it.
//!
//! The merge itself (fast-forward, merge commit, conflicts) is done by the
//! backend; this module only maps the result onto a [`PullOutcome`].

use std::fmt;

use crate::core::types::{BranchName, RefName, RefSpec};
use crate::git::{GitError, MergeStatus, VcsBackend};
use crate::ui::output;

use super::{Session, WorkflowError, ORIGIN, UPSTREAM};

/// Where to pull from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullMode {
    /// The current branch from `origin`.
    Origin,
    /// `branch` from `upstream`.
    Upstream { branch: BranchName },
}

impl PullMode {
    /// The remote this mode fetches from.
    pub fn remote(&self) -> &'static str {
        match self {
            PullMode::Origin => ORIGIN,
            PullMode::Upstream { .. } => UPSTREAM,
        }
    }
}

/// The result of a pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullOutcome {
    /// The current branch now contains the fetched commit.
    Updated {
        branch: BranchName,
        short_id: String,
        merge: MergeStatus,
    },
    /// Local changes would be overwritten by the checkout.
    CheckoutConflict { message: String },
    /// The remote does not have the requested branch.
    MissingRemoteBranch { remote: String, branch: BranchName },
    /// The merge stopped with conflicts in the index.
    MergeConflicts { branch: BranchName },
    /// Network or authentication failure.
    Transport {
        message: String,
        cause: Option<String>,
    },
}

impl PullOutcome {
    /// Whether the current branch was brought up to date.
    pub fn is_success(&self) -> bool {
        matches!(self, PullOutcome::Updated { .. })
    }
}

impl fmt::Display for PullOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PullOutcome::Updated {
                branch, short_id, ..
            } => write!(f, "{} -> {}", branch, short_id),
            PullOutcome::CheckoutConflict { message } => {
                write!(f, "checkout conflict: {}", message)
            }
            PullOutcome::MissingRemoteBranch { remote, branch } => {
                write!(f, "{} does not exist {}", branch, remote)
            }
            PullOutcome::MergeConflicts { branch } => write!(
                f,
                "merge into {} stopped with conflicts; resolve them and commit",
                branch
            ),
            PullOutcome::Transport {
                message,
                cause: Some(cause),
            } => write!(f, "pull failed: {} / {}", message, cause),
            PullOutcome::Transport { message, .. } => write!(f, "pull failed: {}", message),
        }
    }
}

/// Refspec fetching `upstream`'s branch into the tracking ref for `current`.
pub fn upstream_refspec(upstream_branch: &BranchName, current: &BranchName) -> RefSpec {
    RefSpec::fetch(
        &RefName::for_branch(upstream_branch),
        &RefName::for_remote_tracking(UPSTREAM, current),
    )
}

/// Pull into the current branch.
///
/// # Errors
///
/// - [`WorkflowError::MissingRemote`] if the mode's remote is not configured
/// - [`WorkflowError::NoCurrentBranch`] if HEAD is detached or unborn
/// - unset identity (a merge commit may be needed)
pub fn pull(
    backend: &dyn VcsBackend,
    session: &mut Session,
    mode: &PullMode,
) -> Result<PullOutcome, WorkflowError> {
    let verbosity = session.verbosity();
    let remote = mode.remote();
    if backend.find_remote(remote)?.is_none() {
        return Err(WorkflowError::MissingRemote {
            name: remote.to_string(),
        });
    }
    let current = backend
        .current_branch()?
        .ok_or(WorkflowError::NoCurrentBranch)?;

    let (source_branch, refspecs) = match mode {
        PullMode::Origin => (current.clone(), Vec::new()),
        PullMode::Upstream { branch } => {
            output::print(format!("pulling {}/{}", UPSTREAM, branch), verbosity);
            (branch.clone(), vec![upstream_refspec(branch, &current)])
        }
    };
    let source = RefName::for_branch(&source_branch);
    let missing = || PullOutcome::MissingRemoteBranch {
        remote: remote.to_string(),
        branch: source_branch.clone(),
    };

    let transport = session.transport()?;
    match backend.fetch(remote, &refspecs, &transport) {
        Ok(()) => {}
        Err(GitError::Transport { message, cause }) => {
            return Ok(PullOutcome::Transport { message, cause })
        }
        Err(GitError::RefNotFound { .. }) => return Ok(missing()),
        Err(e) => return Err(e.into()),
    }

    let Some(their) = backend.fetched_tip(&source)? else {
        return Ok(missing());
    };
    output::debug(
        format!("fetched {} at {}", source, their.short_id()),
        verbosity,
    );

    let signature = backend.signature()?;
    let label = format!("{}/{}", remote, source_branch);
    let merge = match backend.merge(&their, &label, &signature) {
        Ok(merge) => merge,
        Err(GitError::CheckoutConflict { message }) => {
            return Ok(PullOutcome::CheckoutConflict { message })
        }
        Err(e) => return Err(e.into()),
    };
    output::debug(format!("merge result: {}", merge), verbosity);

    let short_id = match &merge {
        MergeStatus::Conflicts => return Ok(PullOutcome::MergeConflicts { branch: current }),
        MergeStatus::FastForward(oid) | MergeStatus::Merged(oid) => oid.short_id().to_string(),
        MergeStatus::UpToDate => backend
            .head_commit()?
            .map(|tip| tip.oid.short_id().to_string())
            .unwrap_or_default(),
    };

    Ok(PullOutcome::Updated {
        branch: current,
        short_id,
        merge,
    })
}
