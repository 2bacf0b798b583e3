//! pull command - Fetch and merge into the current branch

use crate::core::types::BranchName;
use crate::engine::pull::{self, PullMode};
use crate::engine::{Context, Session};
use crate::ui::output;
use anyhow::{bail, Context as _, Result};

use super::{lock_repo, open_repo};

/// Pull from origin, or from upstream when `upstream` is set.
///
/// The upstream branch is `branch` if given, else the configured one.
pub fn pull(ctx: &Context, upstream: bool, branch: Option<&str>) -> Result<()> {
    let git = open_repo(ctx)?;
    let _lock = lock_repo(&git)?;
    let mut session = Session::from_context(ctx);

    let mode = if upstream {
        let branch = match branch {
            Some(name) => BranchName::new(name).context("Invalid branch name")?,
            None => session.config()?.upstream_branch(),
        };
        PullMode::Upstream { branch }
    } else {
        PullMode::Origin
    };

    let outcome = pull::pull(&git, &mut session, &mode)?;

    if outcome.is_success() {
        output::success(&outcome, ctx.verbosity());
        Ok(())
    } else {
        output::error(&outcome);
        bail!("pull did not complete")
    }
}
