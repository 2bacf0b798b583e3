//! engine::remote
//!
//! Remote URL management and branch deletion.

use crate::core::types::{BranchName, RefName, RefSpec};
use crate::git::{GitError, VcsBackend};
use crate::ui::output;

use super::{Session, WorkflowError, ORIGIN};

/// What `update_remote_url` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteUrlOutcome {
    /// The remote did not exist and was created.
    Added,
    /// Both the fetch and the effective push URL were already `url`.
    AlreadySet,
    /// The fetch and push URLs were replaced.
    Updated,
}

/// Point remote `name` at `url`, creating it if needed.
///
/// Both the fetch and push URLs are set.
pub fn update_remote_url(
    backend: &dyn VcsBackend,
    name: &str,
    url: &str,
) -> Result<RemoteUrlOutcome, WorkflowError> {
    match backend.find_remote(name)? {
        None => {
            backend.add_remote(name, url)?;
            Ok(RemoteUrlOutcome::Added)
        }
        Some(remote)
            if remote.url.as_deref() == Some(url) && remote.effective_push_url() == Some(url) =>
        {
            Ok(RemoteUrlOutcome::AlreadySet)
        }
        Some(_) => {
            backend.set_remote_urls(name, url)?;
            Ok(RemoteUrlOutcome::Updated)
        }
    }
}

/// What `delete_branch` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchDeleteOutcome {
    /// No local branch by that name.
    NotFound,
    /// The branch is checked out; nothing was touched.
    CurrentBranch,
    /// Removed from `origin` (if present there) and locally.
    Deleted,
    /// `origin` refused the deletion; the local branch is kept.
    RemoteRejected { message: String },
}

/// Delete `name` from `origin` and then locally.
///
/// Deleting a branch the remote never had is not an error. The checked-out
/// branch is refused before anything is pushed.
///
/// # Errors
///
/// [`WorkflowError::MissingRemote`] if `origin` is not configured.
pub fn delete_branch(
    backend: &dyn VcsBackend,
    session: &mut Session,
    name: &BranchName,
) -> Result<BranchDeleteOutcome, WorkflowError> {
    let verbosity = session.verbosity();
    if !backend.branch_exists(name)? {
        output::print(format!("Branch {} does not exist!", name), verbosity);
        return Ok(BranchDeleteOutcome::NotFound);
    }
    if backend.current_branch()?.as_ref() == Some(name) {
        output::print(
            format!("Branch {} is checked out; switch to another branch first", name),
            verbosity,
        );
        return Ok(BranchDeleteOutcome::CurrentBranch);
    }
    if backend.find_remote(ORIGIN)?.is_none() {
        return Err(WorkflowError::MissingRemote {
            name: ORIGIN.to_string(),
        });
    }

    let refspec = RefSpec::delete(&RefName::for_branch(name));
    output::debug(format!("refspec: {}", refspec), verbosity);
    let transport = session.transport()?;
    match backend.push(ORIGIN, &refspec, &transport) {
        Ok(rejections) => {
            if let Some(rejection) = rejections.into_iter().next() {
                return Ok(BranchDeleteOutcome::RemoteRejected {
                    message: format!("{}: {}", rejection.reference, rejection.message),
                });
            }
        }
        Err(GitError::NonFastForward { refname }) => {
            return Ok(BranchDeleteOutcome::RemoteRejected {
                message: format!("{}: rejected", refname),
            })
        }
        Err(e) => return Err(e.into()),
    }
    output::print(
        "- removed from remote (NoOp if already removed)",
        verbosity,
    );

    backend.delete_branch(name)?;
    output::print("- removed from local", verbosity);
    Ok(BranchDeleteOutcome::Deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{Config, LazyConfig};
    use crate::git::mock::{MockBackend, MockOperation};
    use crate::ui::output::Verbosity;

    fn session() -> Session {
        Session::new(
            LazyConfig::preloaded(Config::default()),
            Verbosity::Quiet,
            false,
        )
    }

    mod urls {
        use super::*;

        #[test]
        fn adds_missing_remote() {
            let backend = MockBackend::new("/tmp/work");

            let outcome = update_remote_url(&backend, "origin", "https://example.com/a.git").unwrap();

            assert_eq!(outcome, RemoteUrlOutcome::Added);
            let remote = backend.find_remote("origin").unwrap().unwrap();
            assert_eq!(remote.url.as_deref(), Some("https://example.com/a.git"));
        }

        #[test]
        fn same_url_is_noop() {
            let backend = MockBackend::new("/tmp/work").with_remote("origin", "https://example.com/a.git");

            let outcome = update_remote_url(&backend, "origin", "https://example.com/a.git").unwrap();

            assert_eq!(outcome, RemoteUrlOutcome::AlreadySet);
            assert!(backend.operations().is_empty());
        }

        #[test]
        fn diverging_push_url_is_repaired() {
            let backend = MockBackend::new("/tmp/work").with_remote_urls(
                "origin",
                "https://example.com/a.git",
                Some("https://example.com/other.git"),
            );

            let outcome = update_remote_url(&backend, "origin", "https://example.com/a.git").unwrap();

            assert_eq!(outcome, RemoteUrlOutcome::Updated);
            let remote = backend.find_remote("origin").unwrap().unwrap();
            assert_eq!(remote.effective_push_url(), Some("https://example.com/a.git"));
        }

        #[test]
        fn different_url_replaces_both() {
            let backend = MockBackend::new("/tmp/work").with_remote_urls(
                "upstream",
                "https://example.com/old.git",
                Some("git@example.com:old.git"),
            );

            let outcome = update_remote_url(&backend, "upstream", "https://example.com/new.git").unwrap();

            assert_eq!(outcome, RemoteUrlOutcome::Updated);
            let remote = backend.find_remote("upstream").unwrap().unwrap();
            assert_eq!(remote.url.as_deref(), Some("https://example.com/new.git"));
            assert_eq!(remote.effective_push_url(), Some("https://example.com/new.git"));
        }
    }

    mod branches {
        use super::*;

        fn backend() -> MockBackend {
            let backend = MockBackend::new("/tmp/work")
                .with_history("topic", "topic work")
                .with_history("main", "main work")
                .with_remote("origin", "https://example.com/a.git");
            backend.clear_operations();
            backend
        }

        #[test]
        fn deletes_remote_then_local() {
            let backend = backend();
            let name = BranchName::new("topic").unwrap();

            let outcome = delete_branch(&backend, &mut session(), &name).unwrap();

            assert_eq!(outcome, BranchDeleteOutcome::Deleted);
            assert_eq!(
                backend.operations(),
                vec![
                    MockOperation::Push {
                        remote: "origin".to_string(),
                        refspec: ":refs/heads/topic".to_string(),
                    },
                    MockOperation::DeleteBranch {
                        name: "topic".to_string(),
                    },
                ]
            );
            assert_eq!(backend.branch_names(), vec!["main".to_string()]);
        }

        #[test]
        fn second_delete_is_noop() {
            let backend = backend();
            let name = BranchName::new("topic").unwrap();

            delete_branch(&backend, &mut session(), &name).unwrap();
            backend.clear_operations();
            let outcome = delete_branch(&backend, &mut session(), &name).unwrap();

            assert_eq!(outcome, BranchDeleteOutcome::NotFound);
            assert!(backend.operations().is_empty());
        }

        #[test]
        fn remote_rejection_keeps_local_branch() {
            let backend = backend().with_push_rejection("refs/heads/topic", "deletion prohibited");
            let name = BranchName::new("topic").unwrap();

            let outcome = delete_branch(&backend, &mut session(), &name).unwrap();

            assert_eq!(
                outcome,
                BranchDeleteOutcome::RemoteRejected {
                    message: "refs/heads/topic: deletion prohibited".to_string()
                }
            );
            assert!(backend.branch_names().contains(&"topic".to_string()));
        }

        #[test]
        fn checked_out_branch_is_refused_before_push() {
            let backend = backend();
            backend
                .set_head(&RefName::for_branch(&BranchName::new("topic").unwrap()))
                .unwrap();
            backend.clear_operations();
            let name = BranchName::new("topic").unwrap();

            let outcome = delete_branch(&backend, &mut session(), &name).unwrap();

            assert_eq!(outcome, BranchDeleteOutcome::CurrentBranch);
            assert!(backend.operations().is_empty());
            assert!(backend.branch_names().contains(&"topic".to_string()));
        }

        #[test]
        fn missing_origin_is_precondition_failure() {
            let backend = MockBackend::new("/tmp/work").with_history("topic", "work");
            let name = BranchName::new("topic").unwrap();

            let err = delete_branch(&backend, &mut session(), &name).unwrap_err();

            assert!(matches!(err, WorkflowError::MissingRemote { .. }));
            assert_eq!(backend.branch_names(), vec!["topic".to_string()]);
        }
    }
}
