//! engine
//!
//! Workflow engines: stage, commit, push, pull and the branch/remote
//! lifecycle, composed by [`workflow::scp_changes`].
//!
//! # Architecture
//!
//! Each engine is a free function over `&dyn VcsBackend` and a [`Session`]:
//!
//! ```text
//! stage -> [commit] -> push        (workflow::scp_changes)
//! fetch -> merge                   (pull::pull)
//! add/update remote                (remote::update_remote_url)
//! push delete refspec -> delete    (remote::delete_branch)
//! ```
//!
//! # Error model
//!
//! - Precondition failures (missing remote, missing commit message log,
//!   unset identity, repository errors) are [`WorkflowError`]s and abort
//!   the command.
//! - Expected operation failures (non-fast-forward push, rejected ref,
//!   checkout conflict, missing upstream branch) are outcome variants
//!   ([`push::PushOutcome`], [`pull::PullOutcome`]) that the CLI reports.
//! - No-op outcomes are neither; they are logged and the workflow proceeds.
//!
//! # Example
//!
//! ```no_run
//! use scmapp::engine::{workflow, Context, Session};
//! use scmapp::engine::stage::StagePolicy;
//! use scmapp::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new(".")).unwrap();
//! let mut session = Session::from_context(&Context::default());
//! let report = workflow::scp_changes(&git, &mut session, &StagePolicy::Update, false).unwrap();
//! println!("{}", report.push);
//! ```

pub mod commit;
pub mod pull;
pub mod push;
pub mod remote;
pub mod session;
pub mod stage;
pub mod workflow;

pub use session::Session;

use std::path::PathBuf;

use thiserror::Error;

use crate::core::config::ConfigError;
use crate::core::lock::LockError;
use crate::core::message::MessageError;
use crate::git::GitError;
use crate::ui::output::Verbosity;

/// The remote every push goes to.
pub const ORIGIN: &str = "origin";

/// The optional remote pulled with `--upstream`.
pub const UPSTREAM: &str = "upstream";

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags that affect command behavior.
#[derive(Debug, Clone)]
pub struct Context {
    /// Repository path override (defaults to the current directory).
    pub repo_path: Option<PathBuf>,
    /// Explicit configuration file.
    pub config_path: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
    /// Interactive mode enabled (may prompt for a token).
    pub interactive: bool,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            repo_path: None,
            config_path: None,
            debug: false,
            quiet: false,
            interactive: true,
        }
    }
}

impl Context {
    /// Output verbosity from the quiet/debug flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// The directory to open the repository from.
    pub fn repo_dir(&self) -> PathBuf {
        self.repo_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Precondition failures that abort a workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A required remote is not configured.
    #[error("remote {name} not found! Try running with set-url argument")]
    MissingRemote { name: String },

    /// HEAD is detached or unborn where a branch is required.
    #[error("HEAD is not on a branch")]
    NoCurrentBranch,

    /// The commit message log could not be read.
    #[error(transparent)]
    Message(#[from] MessageError),

    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A repository operation failed.
    #[error(transparent)]
    Git(#[from] GitError),

    /// The repository lock could not be taken.
    #[error(transparent)]
    Lock(#[from] LockError),

    /// Credentials could not be obtained.
    #[error("failed to read credentials: {0}")]
    Credentials(String),
}
