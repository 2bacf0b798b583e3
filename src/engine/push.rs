//! engine::push
//!
//! Pushes the current branch to `origin` and classifies failures.
//!
//! # Refspec
//!
//! The refspec maps the branch's canonical ref onto itself. It is
//! force-marked (`+refs/heads/x:refs/heads/x`) when the caller asks for force
//! or when `origin/<branch>` does not exist yet; otherwise it is a plain
//! fast-forward refspec.
//!
//! # Outcomes
//!
//! A missing `origin` is a precondition failure. Everything that can go
//! wrong once the push is attempted is reported as a [`PushOutcome`].

use std::fmt;

use crate::core::types::{BranchName, RefName, RefSpec};
use crate::git::{GitError, VcsBackend};
use crate::ui::output;

use super::{Session, WorkflowError, ORIGIN};

/// The result of a push attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// The remote accepted the update.
    Pushed {
        short_id: String,
        forced: bool,
        refspec: String,
    },
    /// The remote refused a non-fast-forward update.
    NonFastForward { forced: bool },
    /// The remote refused to update a reference.
    RefUpdateFailed { reference: String, message: String },
    /// Network or authentication failure.
    Transport {
        message: String,
        cause: Option<String>,
    },
    /// Something that should not happen, such as HEAD not being on a branch.
    Unexpected { message: String },
}

impl PushOutcome {
    /// Whether the push went through.
    pub fn is_success(&self) -> bool {
        matches!(self, PushOutcome::Pushed { .. })
    }
}

impl fmt::Display for PushOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PushOutcome::Pushed {
                short_id,
                forced: true,
                ..
            } => write!(f, "pushed (forced) -> {}", short_id),
            PushOutcome::Pushed { short_id, .. } => write!(f, "pushed -> {}", short_id),
            PushOutcome::NonFastForward { forced } => write!(
                f,
                "Attempting fast forward with force flag: {} failed! Consider passing --amend",
                forced
            ),
            PushOutcome::RefUpdateFailed { reference, message } => {
                write!(f, "Failed to update reference '{}': {}", reference, message)
            }
            PushOutcome::Transport {
                message,
                cause: Some(cause),
            } => write!(f, "push failed: {} / {}", message, cause),
            PushOutcome::Transport { message, .. } => write!(f, "push failed: {}", message),
            PushOutcome::Unexpected { message } => {
                write!(f, "Unexpected, since branch is not hardcoded! ({})", message)
            }
        }
    }
}

/// Build the push refspec for `branch`.
///
/// Force-marked iff `should_force` or the remote-tracking branch is absent.
pub fn build_push_refspec(branch: &BranchName, should_force: bool, tracking_exists: bool) -> RefSpec {
    RefSpec::push(&RefName::for_branch(branch), should_force || !tracking_exists)
}

/// Push the current branch to `origin`.
///
/// # Errors
///
/// [`WorkflowError::MissingRemote`] if `origin` is not configured; no push
/// is attempted.
pub fn push_to_remote(
    backend: &dyn VcsBackend,
    session: &mut Session,
    should_force: bool,
) -> Result<PushOutcome, WorkflowError> {
    let verbosity = session.verbosity();
    let remote = backend
        .find_remote(ORIGIN)?
        .ok_or_else(|| WorkflowError::MissingRemote {
            name: ORIGIN.to_string(),
        })?;

    let Some(branch) = backend.current_branch()? else {
        return Ok(PushOutcome::Unexpected {
            message: "HEAD is not on a branch".to_string(),
        });
    };

    let tracking_exists = backend.remote_tracking_exists(ORIGIN, &branch)?;
    let refspec = build_push_refspec(&branch, should_force, tracking_exists);
    output::debug(format!("refspec: {}", refspec), verbosity);
    output::debug(format!("remote name: {}", remote.name), verbosity);

    let transport = session.transport()?;
    let rejections = match backend.push(ORIGIN, &refspec, &transport) {
        Ok(rejections) => rejections,
        Err(GitError::NonFastForward { .. }) => {
            return Ok(PushOutcome::NonFastForward {
                forced: should_force,
            })
        }
        Err(GitError::Transport { message, cause }) => {
            output::debug(
                format!("canonical name: {}", RefName::for_branch(&branch)),
                verbosity,
            );
            output::debug(
                format!("URL: {}", remote.url.as_deref().unwrap_or("<none>")),
                verbosity,
            );
            output::debug(
                format!(
                    "push URL: {}",
                    remote.effective_push_url().unwrap_or("<none>")
                ),
                verbosity,
            );
            return Ok(PushOutcome::Transport { message, cause });
        }
        Err(GitError::RemoteNotFound { name }) => return Err(WorkflowError::MissingRemote { name }),
        Err(e) => {
            return Ok(PushOutcome::Unexpected {
                message: e.to_string(),
            })
        }
    };

    if let Some(rejection) = rejections.into_iter().next() {
        return Ok(PushOutcome::RefUpdateFailed {
            reference: rejection.reference,
            message: rejection.message,
        });
    }

    match backend.head_commit()? {
        Some(tip) => Ok(PushOutcome::Pushed {
            short_id: tip.oid.short_id().to_string(),
            forced: refspec.is_forced(),
            refspec: refspec.to_string(),
        }),
        None => Ok(PushOutcome::Unexpected {
            message: "HEAD has no commits".to_string(),
        }),
    }
}
