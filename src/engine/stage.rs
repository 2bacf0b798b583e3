//! engine::stage
//!
//! Selects which paths enter the next commit.
//!
//! # Policies
//!
//! - [`StagePolicy::Single`] stages one file or directory. Relative paths are
//!   resolved against the repository root; configured redirect rules may move
//!   the path into a conventional subdirectory first.
//! - [`StagePolicy::Update`] stages every tracked path modified in the work
//!   tree that still exists on disk.
//! - [`StagePolicy::All`] stages every path the status scan reports (ignored
//!   paths excluded) that still exists on disk.
//!
//! Every staged path is logged as `* <path>` (`* d <path>` for directories).

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::core::config::StageRedirect;
use crate::git::{EntryStatus, VcsBackend};
use crate::ui::output;

use super::{Session, WorkflowError};

/// How paths are chosen for staging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagePolicy {
    /// Exactly one file or directory.
    Single(PathBuf),
    /// Every modified tracked path.
    Update,
    /// Every path the status scan reports.
    All,
}

/// A path added to the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedPath {
    /// Work-tree relative path
    pub path: PathBuf,
    pub is_dir: bool,
}

impl fmt::Display for StagedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dir {
            write!(f, "* d {}", self.path.display())
        } else {
            write!(f, "* {}", self.path.display())
        }
    }
}

/// The outcome of one staging pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagingSelection {
    /// Paths added to the index, in the order they were staged
    pub paths: Vec<StagedPath>,
}

impl StagingSelection {
    /// Whether anything was staged.
    pub fn modified(&self) -> bool {
        !self.paths.is_empty()
    }
}

/// Run one staging pass.
///
/// A single path that exists neither as a file nor as a directory is a
/// no-op: it is reported and an empty selection is returned.
pub fn stage(
    backend: &dyn VcsBackend,
    session: &mut Session,
    policy: &StagePolicy,
) -> Result<StagingSelection, WorkflowError> {
    let verbosity = session.verbosity();
    let work_dir = backend.repo_info()?.work_dir;
    let mut selection = StagingSelection::default();

    match policy {
        StagePolicy::Single(hint) => {
            let Some(relative) = resolve_in_work_tree(&work_dir, hint) else {
                output::warn(
                    format!("{} is outside the repository", hint.display()),
                    verbosity,
                );
                return Ok(selection);
            };
            let target = redirect(&work_dir, relative, session.config()?.stage_redirects());
            let absolute = work_dir.join(&target);

            if absolute.is_file() || absolute.is_dir() {
                stage_one(backend, &work_dir, target, &mut selection)?;
            } else {
                output::print(format!("{} doesn't exist!", target.display()), verbosity);
            }
        }
        StagePolicy::Update | StagePolicy::All => {
            let entries = backend.status(false)?;
            for entry in entries {
                if *policy == StagePolicy::Update && entry.status != EntryStatus::Modified {
                    continue;
                }
                if !work_dir.join(&entry.path).exists() {
                    output::debug(
                        format!("skipping vanished path {}", entry.path.display()),
                        verbosity,
                    );
                    continue;
                }
                stage_one(backend, &work_dir, entry.path, &mut selection)?;
            }
        }
    }

    for staged in &selection.paths {
        output::print(staged, verbosity);
    }

    Ok(selection)
}

fn stage_one(
    backend: &dyn VcsBackend,
    work_dir: &Path,
    path: PathBuf,
    selection: &mut StagingSelection,
) -> Result<(), WorkflowError> {
    backend.stage_path(&path)?;
    let is_dir = work_dir.join(&path).is_dir();
    selection.paths.push(StagedPath { path, is_dir });
    Ok(())
}

/// Make `hint` relative to the work tree root.
///
/// Relative hints are taken relative to the root, and the root itself
/// becomes `.`. Returns `None` when the path lies outside the work tree.
pub fn resolve_in_work_tree(work_dir: &Path, hint: &Path) -> Option<PathBuf> {
    let candidate = if hint.is_absolute() {
        normalize(hint)
    } else {
        normalize(&work_dir.join(hint))
    };
    let root = normalize(work_dir);

    let relative = candidate.strip_prefix(&root).ok()?;
    if relative.as_os_str().is_empty() {
        Some(PathBuf::from("."))
    } else {
        Some(relative.to_path_buf())
    }
}

/// Lexically resolve `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Apply the first matching redirect rule to a work-tree relative path.
///
/// A rule applies when the path carries its extension, its directory exists,
/// the path is not already inside it, and the redirected file exists.
pub fn redirect(work_dir: &Path, path: PathBuf, rules: &[StageRedirect]) -> PathBuf {
    for rule in rules {
        if !rule.matches_extension(&path) || path.starts_with(&rule.directory) {
            continue;
        }
        if !work_dir.join(&rule.directory).is_dir() {
            continue;
        }
        let candidate = rule.directory.join(&path);
        if work_dir.join(&candidate).exists() {
            return candidate;
        }
    }
    path
}
