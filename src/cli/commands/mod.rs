//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens the repository and, for mutating commands, takes the repo lock
//! 2. Calls the engine to execute the command
//! 3. Formats and displays the outcome
//!
//! Handlers do NOT perform repository mutations directly. A failed outcome
//! is printed and then turned into an error so the process exits non-zero.

mod delete;
mod info;
mod pull;
mod push;
mod set_url;

// Re-export command functions for testing and direct invocation
pub use delete::delete_branch;
pub use info::{info, status};
pub use pull::pull;
pub use push::push;
pub use set_url::set_url;

use crate::cli::args::Command;
use crate::core::lock::RepoLock;
use crate::engine::Context;
use crate::git::Git;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Push { target } => push::push(ctx, &target),
        Command::Pull { upstream, branch } => pull::pull(ctx, upstream, branch.as_deref()),
        Command::Info => info::info(ctx),
        Command::Status => info::status(ctx),
        Command::SetUrl {
            remote_url,
            upstream,
        } => set_url::set_url(ctx, &remote_url, upstream),
        Command::DeleteBranch { branch_name } => delete::delete_branch(ctx, &branch_name),
    }
}

/// Open the repository the context points at.
fn open_repo(ctx: &Context) -> Result<Git> {
    let dir = ctx.repo_dir();
    let git = Git::open(&dir)
        .with_context(|| format!("Failed to open repository at {}", dir.display()))?;
    output::debug(
        format!("opened repository at {}", dir.display()),
        ctx.verbosity(),
    );
    Ok(git)
}

/// Take the exclusive lock for a mutating command.
///
/// The lock is released when the returned guard is dropped.
fn lock_repo(git: &Git) -> Result<RepoLock> {
    let info = git.info()?;
    let lock = RepoLock::acquire(&info.git_dir)?;
    Ok(lock)
}
