//! git::mock
//!
//! Mock VCS backend for deterministic testing.
//!
//! # Design
//!
//! The mock backend keeps commits, branches, remotes and remote-tracking refs
//! in memory and allows configuring failure scenarios. Every mutating call is
//! recorded as a [`MockOperation`] so tests can assert on the exact sequence
//! the engines issued (e.g. "no commit was created", "the push refspec was
//! force-marked").
//!
//! The working tree is a real directory supplied by the caller, because the
//! staging engine checks paths on disk; status entries are scripted.
//!
//! # Example
//!
//! ```
//! use scmapp::git::mock::MockBackend;
//! use scmapp::git::VcsBackend;
//!
//! let backend = MockBackend::new("/tmp/work")
//!     .with_identity("Test User", "test@example.com")
//!     .with_history("feature", "initial")
//!     .with_remote("origin", "https://example.com/repo.git");
//!
//! assert_eq!(backend.current_branch().unwrap().unwrap().as_str(), "feature");
//! assert!(backend.find_remote("origin").unwrap().is_some());
//! ```

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::core::types::{BranchName, Oid, RefName, RefSpec};

use super::backend::{
    CommitInfo, EntryStatus, Identity, MergeStatus, RefRejection, RemoteInfo, RepoInfo,
    Signature, TransportOptions, VcsBackend, WorkingTreeEntry,
};
use super::interface::GitError;

/// Mock backend for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockBackend {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockBackendInner>>,
}

/// Internal mutable state.
#[derive(Debug)]
struct MockBackendInner {
    info: RepoInfo,
    identity: Identity,
    /// Scripted status scan result.
    entries: Vec<WorkingTreeEntry>,
    /// Paths added to the index since the last commit.
    index: Vec<PathBuf>,
    /// All commits ever created, by full id.
    commits: HashMap<String, CommitInfo>,
    /// Local branches in creation order.
    branches: Vec<(BranchName, Oid)>,
    /// Symbolic target of HEAD.
    head: RefName,
    /// Existing remote-tracking refs (full names).
    tracking: BTreeSet<String>,
    remotes: Vec<RemoteInfo>,
    /// Refs the remotes advertise, keyed by remote name then source ref.
    remote_refs: HashMap<String, HashMap<String, Oid>>,
    /// Entries recorded by the last fetch.
    fetch_head: Vec<(String, Oid)>,
    /// Result the next merge reports instead of the default behavior.
    merge_result: Option<MergeStatus>,
    /// Rejections every push reports.
    push_rejections: Vec<RefRejection>,
    next_commit: u64,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail status with the given error.
    Status(GitError),
    /// Fail stage_path with the given error.
    StagePath(GitError),
    /// Fail create_commit with the given error.
    CreateCommit(GitError),
    /// Fail delete_branch with the given error.
    DeleteBranch(GitError),
    /// Fail push with the given error.
    Push(GitError),
    /// Fail fetch with the given error.
    Fetch(GitError),
    /// Fail merge with the given error.
    Merge(GitError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    StagePath {
        path: PathBuf,
    },
    CreateCommit {
        message: String,
        amend: bool,
    },
    CreateBranch {
        name: String,
        target: Oid,
    },
    DeleteBranch {
        name: String,
    },
    SetHead {
        refname: String,
    },
    AddRemote {
        name: String,
        url: String,
    },
    SetRemoteUrls {
        name: String,
        url: String,
    },
    Push {
        remote: String,
        refspec: String,
    },
    Fetch {
        remote: String,
        refspecs: Vec<String>,
    },
    Merge {
        their: Oid,
        label: String,
    },
}

impl MockBackend {
    /// Create an empty repository whose work tree is `work_dir`.
    ///
    /// HEAD points at an unborn `refs/heads/master`, as after `git init`.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        let work_dir = work_dir.into();
        let head = RefName::new("refs/heads/master").unwrap_or_else(|_| unreachable!());
        Self {
            inner: Arc::new(Mutex::new(MockBackendInner {
                info: RepoInfo {
                    git_dir: work_dir.join(".git"),
                    work_dir,
                },
                identity: Identity::default(),
                entries: Vec::new(),
                index: Vec::new(),
                commits: HashMap::new(),
                branches: Vec::new(),
                head,
                tracking: BTreeSet::new(),
                remotes: Vec::new(),
                remote_refs: HashMap::new(),
                fetch_head: Vec::new(),
                merge_result: None,
                push_rejections: Vec::new(),
                next_commit: 1,
                fail_on: None,
                operations: Vec::new(),
            })),
        }
    }

    /// Configure `user.name` and `user.email`.
    pub fn with_identity(self, name: &str, email: &str) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.identity = Identity {
                name: Some(name.to_string()),
                email: Some(email.to_string()),
            };
        }
        self
    }

    /// Script the result of status scans.
    pub fn with_entries(self, entries: Vec<WorkingTreeEntry>) -> Self {
        self.set_entries(entries);
        self
    }

    /// Create a commit on `branch` and check the branch out.
    pub fn with_history(self, branch: &str, message: &str) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            let branch = BranchName::new(branch).unwrap();
            let commit = inner.new_commit(message, "Test User", "test@example.com");
            let oid = commit.oid.clone();
            inner.commits.insert(oid.as_str().to_string(), commit);
            inner.set_branch(&branch, oid);
            inner.head = RefName::for_branch(&branch);
        }
        self
    }

    /// Add a remote with the same fetch and push URL.
    pub fn with_remote(self, name: &str, url: &str) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.remotes.push(RemoteInfo {
                name: name.to_string(),
                url: Some(url.to_string()),
                push_url: Some(url.to_string()),
            });
        }
        self
    }

    /// Add a remote whose push URL differs from its fetch URL.
    pub fn with_remote_urls(self, name: &str, url: &str, push_url: Option<&str>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.remotes.push(RemoteInfo {
                name: name.to_string(),
                url: Some(url.to_string()),
                push_url: push_url.map(String::from),
            });
        }
        self
    }

    /// Mark `refs/remotes/<remote>/<branch>` as existing.
    pub fn with_tracking(self, remote: &str, branch: &str) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            let branch = BranchName::new(branch).unwrap();
            let refname = RefName::for_remote_tracking(remote, &branch);
            inner.tracking.insert(refname.as_str().to_string());
        }
        self
    }

    /// Advertise `source` (e.g. `refs/heads/main`) on `remote` at a new commit.
    ///
    /// Returns the id the ref points at, for later assertions.
    pub fn add_remote_ref(&self, remote: &str, source: &str, message: &str) -> Oid {
        let mut inner = self.inner.lock().unwrap();
        let commit = inner.new_commit(message, "Remote User", "remote@example.com");
        let oid = commit.oid.clone();
        inner.commits.insert(oid.as_str().to_string(), commit);
        inner
            .remote_refs
            .entry(remote.to_string())
            .or_default()
            .insert(source.to_string(), oid.clone());
        oid
    }

    /// Make the next merges report `status`.
    pub fn with_merge_result(self, status: MergeStatus) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.merge_result = Some(status);
        }
        self
    }

    /// Make every push report `rejection`.
    pub fn with_push_rejection(self, reference: &str, message: &str) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.push_rejections.push(RefRejection {
                reference: reference.to_string(),
                message: message.to_string(),
            });
        }
        self
    }

    /// Configure the mock to fail on a specific operation.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = None;
    }

    /// Replace the scripted status scan result.
    pub fn set_entries(&self, entries: Vec<WorkingTreeEntry>) {
        let mut inner = self.inner.lock().unwrap();
        inner.entries = entries;
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Clear recorded operations.
    pub fn clear_operations(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.clear();
    }

    /// Paths staged since the last commit.
    pub fn staged_paths(&self) -> Vec<PathBuf> {
        let inner = self.inner.lock().unwrap();
        inner.index.clone()
    }

    /// Local branch names in creation order.
    pub fn branch_names(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner
            .branches
            .iter()
            .map(|(name, _)| name.as_str().to_string())
            .collect()
    }

    /// Tip of a local branch.
    pub fn branch_tip(&self, name: &str) -> Option<Oid> {
        let inner = self.inner.lock().unwrap();
        inner
            .branches
            .iter()
            .find(|(b, _)| b.as_str() == name)
            .map(|(_, oid)| oid.clone())
    }

    /// Symbolic target of HEAD.
    pub fn head_ref(&self) -> String {
        let inner = self.inner.lock().unwrap();
        inner.head.as_str().to_string()
    }

    /// Number of commits created so far (including replaced ones).
    pub fn commit_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.commits.len()
    }

    /// Record an operation.
    fn record(&self, op: MockOperation) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
    }

    /// Check if we should fail and return the error if so.
    fn check_fail(&self, expected: &str) -> Option<GitError> {
        let inner = self.inner.lock().unwrap();
        match &inner.fail_on {
            Some(FailOn::Status(e)) if expected == "status" => Some(e.clone()),
            Some(FailOn::StagePath(e)) if expected == "stage_path" => Some(e.clone()),
            Some(FailOn::CreateCommit(e)) if expected == "create_commit" => Some(e.clone()),
            Some(FailOn::DeleteBranch(e)) if expected == "delete_branch" => Some(e.clone()),
            Some(FailOn::Push(e)) if expected == "push" => Some(e.clone()),
            Some(FailOn::Fetch(e)) if expected == "fetch" => Some(e.clone()),
            Some(FailOn::Merge(e)) if expected == "merge" => Some(e.clone()),
            _ => None,
        }
    }
}

impl MockBackendInner {
    fn new_commit(&mut self, message: &str, name: &str, email: &str) -> CommitInfo {
        let id = format!("{:040x}", self.next_commit);
        self.next_commit += 1;
        CommitInfo {
            oid: Oid::new(id).unwrap_or_else(|_| unreachable!()),
            summary: message.lines().next().unwrap_or("").to_string(),
            message: message.to_string(),
            author_name: name.to_string(),
            author_email: email.to_string(),
            author_time: chrono::Utc::now(),
        }
    }

    fn set_branch(&mut self, name: &BranchName, oid: Oid) {
        match self.branches.iter_mut().find(|(b, _)| b == name) {
            Some(entry) => entry.1 = oid,
            None => self.branches.push((name.clone(), oid)),
        }
    }

    fn head_branch(&self) -> Option<BranchName> {
        self.head
            .strip_prefix("refs/heads/")
            .and_then(|name| BranchName::new(name).ok())
    }

    fn head_oid(&self) -> Option<Oid> {
        let branch = self.head_branch()?;
        self.branches
            .iter()
            .find(|(b, _)| *b == branch)
            .map(|(_, oid)| oid.clone())
    }
}

impl VcsBackend for MockBackend {
    fn repo_info(&self) -> Result<RepoInfo, GitError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.info.clone())
    }

    fn identity(&self) -> Result<Identity, GitError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.identity.clone())
    }

    fn signature(&self) -> Result<Signature, GitError> {
        match self.identity()? {
            Identity {
                name: Some(name),
                email: Some(email),
            } => Ok(Signature {
                name,
                email,
                when: chrono::Utc::now(),
            }),
            _ => Err(GitError::IdentityNotConfigured),
        }
    }

    fn status(&self, include_ignored: bool) -> Result<Vec<WorkingTreeEntry>, GitError> {
        if let Some(err) = self.check_fail("status") {
            return Err(err);
        }
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .entries
            .iter()
            .filter(|e| include_ignored || e.status != EntryStatus::Ignored)
            .cloned()
            .collect())
    }

    fn stage_path(&self, path: &Path) -> Result<(), GitError> {
        self.record(MockOperation::StagePath {
            path: path.to_path_buf(),
        });
        if let Some(err) = self.check_fail("stage_path") {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        if !inner.info.work_dir.join(path).exists() {
            return Err(GitError::ObjectNotFound {
                oid: path.display().to_string(),
            });
        }
        if !inner.index.iter().any(|p| p == path) {
            inner.index.push(path.to_path_buf());
        }
        Ok(())
    }

    fn create_commit(
        &self,
        message: &str,
        author: &Signature,
        _committer: &Signature,
        amend: bool,
    ) -> Result<CommitInfo, GitError> {
        self.record(MockOperation::CreateCommit {
            message: message.to_string(),
            amend,
        });
        if let Some(err) = self.check_fail("create_commit") {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        let commit = inner.new_commit(message, &author.name, &author.email);
        let oid = commit.oid.clone();
        inner.commits.insert(oid.as_str().to_string(), commit.clone());
        inner.index.clear();

        let unborn_without_branches = inner.head_oid().is_none() && inner.branches.is_empty();
        if !unborn_without_branches {
            if let Some(branch) = inner.head_branch() {
                inner.set_branch(&branch, oid);
            }
        }
        Ok(commit)
    }

    fn head_commit(&self) -> Result<Option<CommitInfo>, GitError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .head_oid()
            .and_then(|oid| inner.commits.get(oid.as_str()).cloned()))
    }

    fn current_branch(&self) -> Result<Option<BranchName>, GitError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.head_oid().and(inner.head_branch()))
    }

    fn first_branch(&self) -> Result<Option<BranchName>, GitError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.branches.first().map(|(name, _)| name.clone()))
    }

    fn branch_exists(&self, name: &BranchName) -> Result<bool, GitError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.branches.iter().any(|(b, _)| b == name))
    }

    fn create_branch(&self, name: &BranchName, target: &Oid) -> Result<(), GitError> {
        self.record(MockOperation::CreateBranch {
            name: name.as_str().to_string(),
            target: target.clone(),
        });
        let mut inner = self.inner.lock().unwrap();
        if !inner.commits.contains_key(target.as_str()) {
            return Err(GitError::ObjectNotFound {
                oid: target.as_str().to_string(),
            });
        }
        if inner.branches.iter().any(|(b, _)| b == name) {
            return Err(GitError::Internal {
                message: format!("a branch named '{}' already exists", name),
            });
        }
        inner.branches.push((name.clone(), target.clone()));
        Ok(())
    }

    fn delete_branch(&self, name: &BranchName) -> Result<(), GitError> {
        self.record(MockOperation::DeleteBranch {
            name: name.as_str().to_string(),
        });
        if let Some(err) = self.check_fail("delete_branch") {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        let before = inner.branches.len();
        inner.branches.retain(|(b, _)| b != name);
        if inner.branches.len() == before {
            return Err(GitError::RefNotFound {
                refname: RefName::for_branch(name).as_str().to_string(),
            });
        }
        Ok(())
    }

    fn set_head(&self, refname: &RefName) -> Result<(), GitError> {
        self.record(MockOperation::SetHead {
            refname: refname.as_str().to_string(),
        });
        let mut inner = self.inner.lock().unwrap();
        inner.head = refname.clone();
        Ok(())
    }

    fn remote_tracking_exists(&self, remote: &str, branch: &BranchName) -> Result<bool, GitError> {
        let inner = self.inner.lock().unwrap();
        let refname = RefName::for_remote_tracking(remote, branch);
        Ok(inner.tracking.contains(refname.as_str()))
    }

    fn find_remote(&self, name: &str) -> Result<Option<RemoteInfo>, GitError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.remotes.iter().find(|r| r.name == name).cloned())
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<(), GitError> {
        self.record(MockOperation::AddRemote {
            name: name.to_string(),
            url: url.to_string(),
        });
        let mut inner = self.inner.lock().unwrap();
        if inner.remotes.iter().any(|r| r.name == name) {
            return Err(GitError::Internal {
                message: format!("remote '{}' already exists", name),
            });
        }
        inner.remotes.push(RemoteInfo {
            name: name.to_string(),
            url: Some(url.to_string()),
            push_url: Some(url.to_string()),
        });
        Ok(())
    }

    fn set_remote_urls(&self, name: &str, url: &str) -> Result<(), GitError> {
        self.record(MockOperation::SetRemoteUrls {
            name: name.to_string(),
            url: url.to_string(),
        });
        let mut inner = self.inner.lock().unwrap();
        let remote = inner
            .remotes
            .iter_mut()
            .find(|r| r.name == name)
            .ok_or_else(|| GitError::RemoteNotFound {
                name: name.to_string(),
            })?;
        remote.url = Some(url.to_string());
        remote.push_url = Some(url.to_string());
        Ok(())
    }

    fn push(
        &self,
        remote: &str,
        refspec: &RefSpec,
        _transport: &TransportOptions,
    ) -> Result<Vec<RefRejection>, GitError> {
        self.record(MockOperation::Push {
            remote: remote.to_string(),
            refspec: refspec.to_string(),
        });
        if let Some(err) = self.check_fail("push") {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        if !inner.remotes.iter().any(|r| r.name == remote) {
            return Err(GitError::RemoteNotFound {
                name: remote.to_string(),
            });
        }
        if !inner.push_rejections.is_empty() {
            return Ok(inner.push_rejections.clone());
        }

        let destination = refspec.destination().clone();
        let Some(branch) = destination
            .strip_prefix("refs/heads/")
            .and_then(|name| BranchName::new(name).ok())
        else {
            return Ok(Vec::new());
        };
        let tracking = RefName::for_remote_tracking(remote, &branch);
        let state = &mut *inner;
        let head = state.head_oid();
        let remote_refs = state.remote_refs.entry(remote.to_string()).or_default();
        if refspec.is_delete() {
            remote_refs.remove(destination.as_str());
            state.tracking.remove(tracking.as_str());
        } else if let Some(oid) = head {
            remote_refs.insert(destination.as_str().to_string(), oid);
            state.tracking.insert(tracking.as_str().to_string());
        }
        Ok(Vec::new())
    }

    fn fetch(
        &self,
        remote: &str,
        refspecs: &[RefSpec],
        _transport: &TransportOptions,
    ) -> Result<(), GitError> {
        self.record(MockOperation::Fetch {
            remote: remote.to_string(),
            refspecs: refspecs.iter().map(|s| s.to_string()).collect(),
        });
        if let Some(err) = self.check_fail("fetch") {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        if !inner.remotes.iter().any(|r| r.name == remote) {
            return Err(GitError::RemoteNotFound {
                name: remote.to_string(),
            });
        }

        let advertised = inner.remote_refs.get(remote).cloned().unwrap_or_default();
        let mut fetched = Vec::new();
        if refspecs.is_empty() {
            let mut all: Vec<_> = advertised.into_iter().collect();
            all.sort();
            fetched = all;
        } else {
            for spec in refspecs {
                let Some(source) = spec.source() else {
                    continue;
                };
                if let Some(oid) = advertised.get(source.as_str()) {
                    fetched.push((source.as_str().to_string(), oid.clone()));
                    inner.tracking.insert(spec.destination().as_str().to_string());
                }
            }
        }
        inner.fetch_head = fetched;
        Ok(())
    }

    fn fetched_tip(&self, source: &RefName) -> Result<Option<Oid>, GitError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .fetch_head
            .iter()
            .find(|(name, _)| name == source.as_str())
            .map(|(_, oid)| oid.clone()))
    }

    fn merge(
        &self,
        their: &Oid,
        label: &str,
        _signature: &Signature,
    ) -> Result<MergeStatus, GitError> {
        self.record(MockOperation::Merge {
            their: their.clone(),
            label: label.to_string(),
        });
        if let Some(err) = self.check_fail("merge") {
            return Err(err);
        }

        let mut inner = self.inner.lock().unwrap();
        if let Some(status) = inner.merge_result.clone() {
            return Ok(status);
        }
        if inner.head_oid().as_ref() == Some(their) {
            return Ok(MergeStatus::UpToDate);
        }
        let branch = inner.head_branch().ok_or_else(|| GitError::RefNotFound {
            refname: "HEAD".to_string(),
        })?;
        inner.set_branch(&branch, their.clone());
        Ok(MergeStatus::FastForward(their.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unborn_commit_does_not_fabricate_branch() {
        let temp = tempfile::TempDir::new().unwrap();
        let backend = MockBackend::new(temp.path()).with_identity("A", "a@example.com");
        let sig = backend.signature().unwrap();

        backend.create_commit("first", &sig, &sig, false).unwrap();

        assert!(backend.branch_names().is_empty());
        assert!(backend.head_commit().unwrap().is_none());
        assert_eq!(backend.commit_count(), 1);
    }

    #[test]
    fn commit_moves_checked_out_branch() {
        let temp = tempfile::TempDir::new().unwrap();
        let backend = MockBackend::new(temp.path())
            .with_identity("A", "a@example.com")
            .with_history("feature", "initial");
        let sig = backend.signature().unwrap();

        let commit = backend.create_commit("second", &sig, &sig, false).unwrap();

        assert_eq!(backend.branch_tip("feature"), Some(commit.oid));
        assert_eq!(backend.head_commit().unwrap().unwrap().summary, "second");
    }

    #[test]
    fn status_hides_ignored_unless_asked() {
        let backend = MockBackend::new("/tmp/work").with_entries(vec![
            WorkingTreeEntry::new("a.txt", EntryStatus::Modified),
            WorkingTreeEntry::new("target/", EntryStatus::Ignored),
        ]);

        assert_eq!(backend.status(false).unwrap().len(), 1);
        assert_eq!(backend.status(true).unwrap().len(), 2);
    }

    #[test]
    fn configured_failure_is_returned() {
        let backend = MockBackend::new("/tmp/work")
            .with_remote("origin", "https://example.com/a.git")
            .fail_on(FailOn::Fetch(GitError::Transport {
                message: "offline".to_string(),
                cause: None,
            }));
        let transport = TransportOptions {
            credentials: Default::default(),
            verbosity: crate::ui::output::Verbosity::Quiet,
        };

        assert!(backend.fetch("origin", &[], &transport).is_err());
        backend.clear_fail_on();
        assert!(backend.fetch("origin", &[], &transport).is_ok());
        assert_eq!(backend.operations().len(), 2);
    }
}
