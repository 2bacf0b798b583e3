//! scm - stage, commit and push in one command
//!
//! `scm` automates the edit-commit-publish loop on a git repository: it
//! stages changes under a chosen policy, commits them with a message kept in
//! a file, and pushes the current branch to `origin`. It also pulls from
//! `origin` or `upstream`, manages remote URLs, deletes branches, and prints
//! repository status.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Stage, commit, push and pull engines and the workflow that composes them
//! - [`core`] - Domain types, configuration, commit message source, repo lock
//! - [`git`] - The `VcsBackend` trait, its git2 implementation and a mock
//! - [`ui`] - Output with verbosity control
//!
//! # Invariants
//!
//! 1. A commit is created only when something was staged, or when amending
//!    with a message that differs from the tip's
//! 2. A push refspec is force-marked iff force was requested or
//!    `origin/<branch>` does not exist
//! 3. A branch is fabricated only for the very first commit of a repository

pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod ui;
