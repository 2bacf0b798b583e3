//! engine::commit
//!
//! Creates commits from the index and the pending commit message.
//!
//! The first commit in a repository without branches has nowhere to go;
//! the configured default branch is created at it and HEAD is pointed
//! there. This is the only place a branch is fabricated.

use crate::core::types::{BranchName, RefName};
use crate::git::{CommitInfo, VcsBackend};
use crate::ui::output;

use super::{Session, WorkflowError};

/// The result of a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitResult {
    /// The new commit
    pub commit: CommitInfo,
    /// Whether the previous tip was replaced
    pub amended: bool,
    /// The branch created for the first commit, if any
    pub created_branch: Option<BranchName>,
}

/// Commit the index with the pending message.
///
/// # Errors
///
/// - unset identity or a missing message log (precondition failures)
/// - any repository failure while committing or creating the branch
pub fn commit(
    backend: &dyn VcsBackend,
    session: &mut Session,
    should_amend: bool,
) -> Result<CommitResult, WorkflowError> {
    let verbosity = session.verbosity();
    let signature = backend.signature()?;
    let message = session.commit_message(backend)?.clone();
    let had_tip = backend.head_commit()?.is_some();

    output::print(format!("author name: {}", signature.name), verbosity);
    let commit = backend.create_commit(message.full(), &signature, &signature, should_amend)?;
    output::print(
        format!(
            "committed with amend flag: {}\nand message:\n{}",
            should_amend,
            message.first_line()
        ),
        verbosity,
    );

    let created_branch = if backend.first_branch()?.is_none() {
        let branch = session.config()?.default_branch();
        backend.create_branch(&branch, &commit.oid)?;
        backend.set_head(&RefName::for_branch(&branch))?;
        output::debug(
            format!("created branch {} at {}", branch, commit.oid.short_id()),
            verbosity,
        );
        Some(branch)
    } else {
        None
    };

    Ok(CommitResult {
        commit,
        amended: should_amend && had_tip,
        created_branch,
    })
}

/// Whether the pending message differs from the tip commit's message.
///
/// Both sides are trimmed before comparing. With no tip commit there is
/// nothing to compare against, so the log counts as changed.
pub fn has_commit_log_changed(
    backend: &dyn VcsBackend,
    session: &mut Session,
) -> Result<bool, WorkflowError> {
    let Some(tip) = backend.head_commit()? else {
        output::print("failed to retrieve commit message!", session.verbosity());
        return Ok(true);
    };

    let pending = session.commit_message(backend)?;
    Ok(pending.differs_from(&tip.message))
}
