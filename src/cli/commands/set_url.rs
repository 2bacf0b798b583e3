//! set-url command - Point origin or upstream at a URL

use crate::engine::remote::{self, RemoteUrlOutcome};
use crate::engine::{Context, ORIGIN, UPSTREAM};
use crate::ui::output;
use anyhow::Result;

use super::{lock_repo, open_repo};

/// Set the fetch and push URL of `origin` (or `upstream`).
pub fn set_url(ctx: &Context, url: &str, upstream: bool) -> Result<()> {
    let git = open_repo(ctx)?;
    let _lock = lock_repo(&git)?;
    let name = if upstream { UPSTREAM } else { ORIGIN };

    match remote::update_remote_url(&git, name, url)? {
        RemoteUrlOutcome::AlreadySet => {
            output::print("Already set to provided URL!", ctx.verbosity());
        }
        RemoteUrlOutcome::Added => {
            output::success(format!("{} added -> {}", name, url), ctx.verbosity());
        }
        RemoteUrlOutcome::Updated => {
            output::success(format!("{} -> {}", name, url), ctx.verbosity());
        }
    }
    Ok(())
}
