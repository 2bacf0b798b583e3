//! delete-branch command - Delete a branch on origin and locally
//!
//! The remote deletion is attempted first; the local branch is only removed
//! once origin has accepted it. A branch that does not exist locally is a
//! no-op; the checked-out branch is refused without touching origin.

use crate::core::types::BranchName;
use crate::engine::remote::{self, BranchDeleteOutcome};
use crate::engine::{Context, Session};
use crate::ui::output;
use anyhow::{bail, Context as _, Result};

use super::{lock_repo, open_repo};

/// Delete `name` on origin and locally.
pub fn delete_branch(ctx: &Context, name: &str) -> Result<()> {
    let branch = BranchName::new(name).context("Invalid branch name")?;
    let git = open_repo(ctx)?;
    let _lock = lock_repo(&git)?;
    let mut session = Session::from_context(ctx);

    match remote::delete_branch(&git, &mut session, &branch)? {
        BranchDeleteOutcome::Deleted | BranchDeleteOutcome::NotFound => Ok(()),
        BranchDeleteOutcome::RemoteRejected { message } => {
            output::error(format!("origin refused to delete {}: {}", branch, message));
            bail!("branch {} was kept", branch)
        }
        BranchDeleteOutcome::CurrentBranch => {
            bail!("cannot delete the checked-out branch {}", branch)
        }
    }
}
