//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--repo-path <path>`: Operate on the repository at that path
//! - `--config-file-path <path>`: Use this configuration file
//! - `--debug`: Enable debug logging
//! - `--no-interactive`: Never prompt for a token
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// scm - stage, commit and push in one command
#[derive(Parser, Debug)]
#[command(name = "scm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Operate on the repository at this path instead of the current directory
    #[arg(long, global = true, value_name = "PATH")]
    pub repo_path: Option<PathBuf>,

    /// Read configuration from this file
    #[arg(long, global = true, value_name = "PATH")]
    pub config_file_path: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; implies --no-interactive
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_interactive: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Whether prompting is allowed.
    ///
    /// False when `--no-interactive` or `--quiet` was given, or when stdin
    /// is not a terminal.
    pub fn interactive(&self) -> bool {
        use std::io::IsTerminal;

        !(self.no_interactive || self.quiet) && std::io::stdin().is_terminal()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Stage, commit and push
    #[command(
        name = "push",
        long_about = "Stage changes, commit them with the pending commit message, and push \
            the current branch to origin.\n\n\
            The commit message is read from the commit message file (by default \
            .git/scm/commit-message.txt). A commit is only made when something was \
            staged, or when --amend is given and the message differs from the last \
            commit's. The push always runs.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Stage modified tracked files, commit and push
    scm push mod

    # Stage one file (or directory) only
    scm push single src/lib.rs

    # Stage everything, including new files
    scm push all

    # Reword the last commit and force-push it
    scm push mod --amend"
    )]
    Push {
        #[command(subcommand)]
        target: PushTarget,
    },

    /// Fetch and merge into the current branch
    #[command(
        name = "pull",
        long_about = "Fetch from origin and merge the current branch's remote counterpart.\n\n\
            With --upstream, fetch a branch from the upstream remote instead (by \
            default the configured upstream branch, main) and merge it into the \
            current branch.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bring the current branch up to date with origin
    scm pull

    # Merge upstream/main into the current branch
    scm pull --upstream

    # Merge a different upstream branch
    scm pull -u --branch release"
    )]
    Pull {
        /// Pull from the upstream remote
        #[arg(long, short)]
        upstream: bool,

        /// Upstream branch to merge (with --upstream)
        #[arg(long, requires = "upstream", value_name = "NAME")]
        branch: Option<String>,
    },

    /// Show the repository, author and current commit
    #[command(name = "info", visible_alias = "information")]
    Info,

    /// Show info, local changes and the pending commit message
    #[command(name = "status", visible_alias = "stat")]
    Status,

    /// Set the URL of origin (or upstream)
    #[command(
        name = "set-url",
        after_help = "\
WORKFLOW EXAMPLES:
    # Point origin at a new URL (creates origin if missing)
    scm set-url https://github.com/me/project.git

    # Configure the upstream remote
    scm set-url -u https://github.com/org/project.git"
    )]
    SetUrl {
        /// The new remote URL
        remote_url: String,

        /// Set the upstream remote instead of origin
        #[arg(long, short)]
        upstream: bool,
    },

    /// Delete a branch on origin and locally
    #[command(name = "delete-branch")]
    DeleteBranch {
        /// Branch to delete
        branch_name: String,
    },
}

/// What `push` stages.
#[derive(Subcommand, Debug, Clone)]
pub enum PushTarget {
    /// Modified tracked files
    #[command(name = "mod", visible_alias = "modified")]
    Mod {
        /// Amend the last commit and force-push
        #[arg(long, short = 'f')]
        amend: bool,
    },

    /// A single file or directory
    #[command(name = "single", visible_alias = "single-file")]
    Single {
        /// Path to stage, relative to the repository root or absolute
        file_path: PathBuf,

        /// Amend the last commit and force-push
        #[arg(long, short = 'f')]
        amend: bool,
    },

    /// Everything the status scan reports, new files included
    #[command(name = "all")]
    All {
        /// Amend the last commit and force-push
        #[arg(long, short = 'f')]
        amend: bool,
    },
}

impl PushTarget {
    /// Whether `--amend` was given.
    pub fn amend(&self) -> bool {
        match self {
            PushTarget::Mod { amend } | PushTarget::All { amend } => *amend,
            PushTarget::Single { amend, .. } => *amend,
        }
    }
}
