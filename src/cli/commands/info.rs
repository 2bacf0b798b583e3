//! info and status commands - Read-only repository summaries
//!
//! Neither command takes the repository lock.

use crate::engine::{Context, Session};
use crate::git::{EntryStatus, Git, VcsBackend};
use crate::ui::output;
use anyhow::{Context as _, Result};

use super::open_repo;

/// Show the repository, author, branch and tip commit.
pub fn info(ctx: &Context) -> Result<()> {
    let git = open_repo(ctx)?;
    print_info(&git, ctx)
}

/// Show info, local changes and the pending commit message.
pub fn status(ctx: &Context) -> Result<()> {
    let verbosity = ctx.verbosity();
    let git = open_repo(ctx)?;
    print_info(&git, ctx)?;

    output::print("\nLocal changes:", verbosity);
    let entries = git.status(false).context("Failed to read working tree status")?;
    for entry in entries {
        let marker = if entry.status == EntryStatus::Modified {
            "*"
        } else {
            " "
        };
        output::print(format!("{} {}", marker, entry.path.display()), verbosity);
    }

    output::print("\nMessage (to be used with next commit):", verbosity);
    let mut session = Session::from_context(ctx);
    match session.commit_message(&git) {
        Ok(message) => {
            output::print(message.first_line(), verbosity);
            output::print("...", verbosity);
        }
        Err(e) => output::warn(e, verbosity),
    }
    Ok(())
}

fn print_info(git: &Git, ctx: &Context) -> Result<()> {
    let verbosity = ctx.verbosity();
    let repo = git.repo_info()?;
    let identity = git.identity()?;

    output::print(
        format!("Local Repo: {}", repo.work_dir.display()),
        verbosity,
    );
    output::print(
        format!("Author: {}", identity.name.as_deref().unwrap_or("(not set)")),
        verbosity,
    );
    output::print(
        format!("Email: {}", identity.email.as_deref().unwrap_or("(not set)")),
        verbosity,
    );

    match (git.current_branch()?, git.head_commit()?) {
        (Some(branch), Some(tip)) => {
            output::print(format!("Branch: {}", branch), verbosity);
            output::print(format!("SHA: {}", tip.oid.short_id()), verbosity);
        }
        (None, Some(tip)) => {
            output::print("Branch: (detached HEAD)", verbosity);
            output::print(format!("SHA: {}", tip.oid.short_id()), verbosity);
        }
        (_, None) => output::print(
            "Head doesn't exist yet! Yet to do a first commit and create branch?",
            verbosity,
        ),
    }
    Ok(())
}
