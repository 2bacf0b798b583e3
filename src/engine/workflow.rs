//! engine::workflow
//!
//! The stage-commit-push pipeline behind every `push` subcommand.

use crate::git::VcsBackend;
use crate::ui::output;

use super::commit::{self, CommitResult};
use super::push::{self, PushOutcome};
use super::stage::{self, StagePolicy, StagingSelection};
use super::{Session, WorkflowError};

/// Printed before anything else when amending.
pub const AMEND_WARNING: &str =
    "Amend/Force flag is set. This will amend last comment and force push to remote!";

/// Everything one stage-commit-push run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScpReport {
    pub selection: StagingSelection,
    /// `None` when nothing warranted a commit
    pub commit: Option<CommitResult>,
    pub push: PushOutcome,
}

/// Stage according to `policy`, commit if warranted, then push.
///
/// A commit is made when something was staged, or when amending with a
/// pending message that differs from the tip's. The push always runs and
/// is forced when amending.
pub fn scp_changes(
    backend: &dyn VcsBackend,
    session: &mut Session,
    policy: &StagePolicy,
    should_amend: bool,
) -> Result<ScpReport, WorkflowError> {
    let verbosity = session.verbosity();
    if should_amend {
        output::warn(AMEND_WARNING, verbosity);
    }

    let selection = stage::stage(backend, session, policy)?;
    if selection.modified() {
        output::print("changes staged", verbosity);
    }

    let should_commit = selection.modified()
        || (should_amend && commit::has_commit_log_changed(backend, session)?);
    let commit = if should_commit {
        Some(commit::commit(backend, session, should_amend)?)
    } else {
        output::debug("nothing to commit", verbosity);
        None
    };

    let push = push::push_to_remote(backend, session, should_amend)?;

    Ok(ScpReport {
        selection,
        commit,
        push,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{Config, LazyConfig};
    use crate::core::message::CommitMessage;
    use crate::git::mock::{MockBackend, MockOperation};
    use crate::git::{EntryStatus, WorkingTreeEntry};
    use crate::ui::output::Verbosity;
    use std::fs;
    use tempfile::TempDir;

    fn session(message: &str) -> Session {
        Session::new(
            LazyConfig::preloaded(Config::default()),
            Verbosity::Quiet,
            false,
        )
        .with_commit_message(CommitMessage::from_text(message))
    }

    fn backend(temp: &TempDir) -> MockBackend {
        let backend = MockBackend::new(temp.path())
            .with_identity("A", "a@example.com")
            .with_history("feature", "tip message")
            .with_remote("origin", "https://example.com/repo.git")
            .with_tracking("origin", "feature");
        backend.clear_operations();
        backend
    }

    fn commits(backend: &MockBackend) -> Vec<MockOperation> {
        backend
            .operations()
            .into_iter()
            .filter(|op| matches!(op, MockOperation::CreateCommit { .. }))
            .collect()
    }

    fn pushes(backend: &MockBackend) -> Vec<String> {
        backend
            .operations()
            .into_iter()
            .filter_map(|op| match op {
                MockOperation::Push { refspec, .. } => Some(refspec),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn staged_changes_are_committed_and_pushed() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        let backend = backend(&temp)
            .with_entries(vec![WorkingTreeEntry::new("a.txt", EntryStatus::Modified)]);

        let report = scp_changes(&backend, &mut session("update a"), &StagePolicy::Update, false)
            .unwrap();

        assert!(report.selection.modified());
        assert!(report.commit.is_some());
        assert!(report.push.is_success());
        assert_eq!(pushes(&backend), vec!["refs/heads/feature:refs/heads/feature"]);
    }

    #[test]
    fn clean_tree_pushes_without_commit() {
        let temp = TempDir::new().unwrap();
        let backend = backend(&temp);

        let report = scp_changes(&backend, &mut session("unused"), &StagePolicy::All, false)
            .unwrap();

        assert!(report.commit.is_none());
        assert!(commits(&backend).is_empty());
        assert_eq!(pushes(&backend).len(), 1);
    }

    #[test]
    fn amend_with_new_message_commits_and_forces() {
        let temp = TempDir::new().unwrap();
        let backend = backend(&temp);

        let report = scp_changes(&backend, &mut session("reworded"), &StagePolicy::Update, true)
            .unwrap();

        let commit = report.commit.unwrap();
        assert!(commit.amended);
        assert_eq!(
            commits(&backend),
            vec![MockOperation::CreateCommit {
                message: "reworded".to_string(),
                amend: true,
            }]
        );
        assert_eq!(pushes(&backend), vec!["+refs/heads/feature:refs/heads/feature"]);
    }

    #[test]
    fn amend_with_same_message_skips_commit_but_forces() {
        let temp = TempDir::new().unwrap();
        let backend = backend(&temp);

        let report = scp_changes(
            &backend,
            &mut session("tip message\n"),
            &StagePolicy::Update,
            true,
        )
        .unwrap();

        assert!(report.commit.is_none());
        assert!(commits(&backend).is_empty());
        assert_eq!(pushes(&backend), vec!["+refs/heads/feature:refs/heads/feature"]);
    }

    #[test]
    fn missing_path_still_pushes() {
        let temp = TempDir::new().unwrap();
        let backend = backend(&temp);

        let report = scp_changes(
            &backend,
            &mut session("unused"),
            &StagePolicy::Single("missing.md".into()),
            false,
        )
        .unwrap();

        assert!(!report.selection.modified());
        assert!(report.commit.is_none());
        assert_eq!(pushes(&backend).len(), 1);
    }

    #[test]
    fn missing_origin_fails_after_commit() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        let backend = MockBackend::new(temp.path())
            .with_identity("A", "a@example.com")
            .with_history("feature", "tip")
            .with_entries(vec![WorkingTreeEntry::new("a.txt", EntryStatus::Modified)]);

        let err = scp_changes(&backend, &mut session("msg"), &StagePolicy::Update, false)
            .unwrap_err();

        assert!(matches!(err, WorkflowError::MissingRemote { .. }));
        assert_eq!(commits(&backend).len(), 1);
    }
}
