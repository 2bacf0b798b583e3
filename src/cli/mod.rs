//! cli
//!
//! Command-line interface layer for scm.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Does NOT perform repository mutations directly
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to the
//! [`crate::engine`] for execution.

pub mod args;
pub mod commands;

pub use args::{Cli, Command, PushTarget};

use crate::engine;
use anyhow::Result;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = engine::Context {
        repo_path: cli.repo_path.clone(),
        config_path: cli.config_file_path.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
        interactive: cli.interactive(),
    };

    commands::dispatch(cli.command, &ctx)
}
