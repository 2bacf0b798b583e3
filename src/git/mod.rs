//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. The workflow engines depend on
//! the [`VcsBackend`] trait; [`Git`] implements it with the `git2` crate (no
//! shelling out to the git CLI) and [`mock::MockBackend`] implements it in
//! memory for tests. No other module imports `git2`.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Working-tree status and the index
//! - Commit creation and amend
//! - Branch, HEAD and remote-tracking refs
//! - Remote configuration
//! - Blocking push and fetch with credential callbacks
//! - Merging fetched commits
//!
//! # Invariants
//!
//! - No other module calls git2 directly
//! - All operations return strong types (Oid, BranchName, RefName, RefSpec)
//! - Expected network failures surface as typed [`GitError`] variants

mod backend;
mod interface;
pub mod mock;

pub use backend::{
    CommitInfo, Credentials, EntryStatus, Identity, MergeStatus, RefRejection, RemoteInfo,
    RepoInfo, Signature, TransportOptions, VcsBackend, WorkingTreeEntry,
};
pub use interface::{Git, GitError, MAX_CREDENTIAL_ATTEMPTS};
