//! push command - Stage, commit and push the current branch

use crate::cli::args::PushTarget;
use crate::engine::stage::StagePolicy;
use crate::engine::{workflow, Context, Session};
use crate::ui::output;
use anyhow::{bail, Result};

use super::{lock_repo, open_repo};

/// Run the stage-commit-push pipeline.
pub fn push(ctx: &Context, target: &PushTarget) -> Result<()> {
    let git = open_repo(ctx)?;
    let _lock = lock_repo(&git)?;
    let mut session = Session::from_context(ctx);

    let policy = match target {
        PushTarget::Mod { .. } => StagePolicy::Update,
        PushTarget::Single { file_path, .. } => StagePolicy::Single(file_path.clone()),
        PushTarget::All { .. } => StagePolicy::All,
    };

    let report = workflow::scp_changes(&git, &mut session, &policy, target.amend())?;

    if report.push.is_success() {
        output::success(&report.push, ctx.verbosity());
        Ok(())
    } else {
        output::error(&report.push);
        bail!("push did not complete")
    }
}
