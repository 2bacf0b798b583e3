//! Integration tests for the Git interface.
//!
//! These tests use real git repositories created via tempfile (and a local
//! bare repository as `origin`) to verify that the git2-backed backend
//! behaves the way the engines expect.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use scmapp::core::types::{BranchName, RefName, RefSpec};
use scmapp::git::{
    EntryStatus, Git, GitError, MergeStatus, TransportOptions, VcsBackend,
};
use scmapp::ui::output::Verbosity;

/// Run a git command in the given directory.
fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Capture the trimmed stdout of a git command.
fn git_output(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

fn transport() -> TransportOptions {
    TransportOptions {
        credentials: Default::default(),
        verbosity: Verbosity::Quiet,
    }
}

fn branch(name: &str) -> BranchName {
    BranchName::new(name).unwrap()
}

/// Test fixture: a work repository on `main` with one commit, plus a bare
/// repository configured as `origin`.
struct TestRepo {
    dir: TempDir,
    origin: TempDir,
}

impl TestRepo {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let origin = TempDir::new().expect("failed to create temp dir");

        run_git(origin.path(), &["init", "--bare", "-b", "main"]);
        run_git(dir.path(), &["init", "-b", "main"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);
        std::fs::write(dir.path().join("README.md"), "# Test Repo\n").unwrap();
        run_git(dir.path(), &["add", "README.md"]);
        run_git(dir.path(), &["commit", "-m", "Initial commit"]);
        run_git(
            dir.path(),
            &["remote", "add", "origin", origin.path().to_str().unwrap()],
        );

        Self { dir, origin }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn origin_path(&self) -> &Path {
        self.origin.path()
    }

    fn git(&self) -> Git {
        Git::open(self.path()).expect("failed to open test repo")
    }

    fn write(&self, path: &str, content: &str) -> PathBuf {
        let full = self.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full, content).unwrap();
        PathBuf::from(path)
    }

    /// A second clone of origin with identity configured.
    fn clone_origin(&self) -> TempDir {
        let dir = TempDir::new().unwrap();
        run_git(
            dir.path(),
            &["clone", self.origin_path().to_str().unwrap(), "."],
        );
        run_git(dir.path(), &["config", "user.email", "other@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Other User"]);
        dir
    }
}

mod opening {
    use super::*;

    #[test]
    fn plain_directory_is_not_a_repo() {
        let dir = TempDir::new().unwrap();
        let err = Git::open(dir.path()).unwrap_err();
        assert!(matches!(err, GitError::NotARepo { .. }));
    }

    #[test]
    fn bare_repo_is_rejected() {
        let dir = TempDir::new().unwrap();
        run_git(dir.path(), &["init", "--bare"]);
        let err = Git::open(dir.path()).unwrap_err();
        assert!(matches!(err, GitError::BareRepo));
    }

    #[test]
    fn subdirectory_discovers_root() {
        let repo = TestRepo::new();
        repo.write("nested/deep/file.txt", "x");

        let git = Git::open(&repo.path().join("nested/deep")).unwrap();
        let info = git.repo_info().unwrap();
        assert_eq!(
            info.work_dir.canonicalize().unwrap(),
            repo.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn identity_comes_from_config() {
        let repo = TestRepo::new();
        let git = repo.git();

        let identity = git.identity().unwrap();
        assert_eq!(identity.name.as_deref(), Some("Test User"));
        assert_eq!(git.signature().unwrap().email, "test@example.com");
    }
}

mod working_tree {
    use super::*;

    #[test]
    fn status_classifies_entries() {
        let repo = TestRepo::new();
        repo.write("README.md", "changed\n");
        repo.write("new.txt", "new\n");
        repo.write(".gitignore", "*.log\n");
        repo.write("debug.log", "noise\n");

        let entries = repo.git().status(false).unwrap();
        let status_of = |path: &str| {
            entries
                .iter()
                .find(|e| e.path == Path::new(path))
                .map(|e| e.status)
        };

        assert_eq!(status_of("README.md"), Some(EntryStatus::Modified));
        assert_eq!(status_of("new.txt"), Some(EntryStatus::New));
        assert_eq!(status_of("debug.log"), None);

        let with_ignored = repo.git().status(true).unwrap();
        assert!(with_ignored
            .iter()
            .any(|e| e.status == EntryStatus::Ignored));
    }

    #[test]
    fn stage_path_writes_index() {
        let repo = TestRepo::new();
        let path = repo.write("docs/guide.md", "guide\n");

        repo.git().stage_path(&path).unwrap();

        let staged = git_output(repo.path(), &["diff", "--cached", "--name-only"]);
        assert_eq!(staged, "docs/guide.md");
    }

    #[test]
    fn stage_directory_adds_contents() {
        let repo = TestRepo::new();
        repo.write("assets/a.svg", "a");
        repo.write("assets/b.svg", "b");

        repo.git().stage_path(Path::new("assets")).unwrap();

        let staged = git_output(repo.path(), &["diff", "--cached", "--name-only"]);
        assert_eq!(staged, "assets/a.svg\nassets/b.svg");
    }

    #[test]
    fn stage_root_adds_whole_tree() {
        let repo = TestRepo::new();
        repo.write("top.txt", "t");
        repo.write("nested/deep.txt", "d");

        repo.git().stage_path(Path::new(".")).unwrap();

        let staged = git_output(repo.path(), &["diff", "--cached", "--name-only"]);
        assert_eq!(staged, "nested/deep.txt\ntop.txt");
    }
}

mod commits {
    use super::*;

    #[test]
    fn commit_advances_branch() {
        let repo = TestRepo::new();
        let git = repo.git();
        let path = repo.write("a.txt", "a");
        git.stage_path(&path).unwrap();
        let sig = git.signature().unwrap();

        let commit = git.create_commit("add a\n\nbody", &sig, &sig, false).unwrap();

        assert_eq!(commit.summary, "add a");
        assert_eq!(git_output(repo.path(), &["rev-parse", "HEAD"]), commit.oid.as_str());
        assert_eq!(git_output(repo.path(), &["rev-list", "--count", "HEAD"]), "2");
    }

    #[test]
    fn amend_replaces_tip() {
        let repo = TestRepo::new();
        let git = repo.git();
        let sig = git.signature().unwrap();
        let before = git.head_commit().unwrap().unwrap();

        let amended = git.create_commit("reworded", &sig, &sig, true).unwrap();

        assert_ne!(amended.oid, before.oid);
        assert_eq!(git_output(repo.path(), &["rev-list", "--count", "HEAD"]), "1");
        assert_eq!(git.head_commit().unwrap().unwrap().message, "reworded");
    }

    #[test]
    fn first_commit_leaves_refs_alone() {
        let dir = TempDir::new().unwrap();
        run_git(dir.path(), &["init"]);
        run_git(dir.path(), &["config", "user.email", "t@example.com"]);
        run_git(dir.path(), &["config", "user.name", "T"]);
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        let git = Git::open(dir.path()).unwrap();
        git.stage_path(Path::new("a.txt")).unwrap();
        let sig = git.signature().unwrap();

        assert!(git.head_commit().unwrap().is_none());
        assert!(git.current_branch().unwrap().is_none());

        let commit = git.create_commit("first", &sig, &sig, false).unwrap();
        assert!(git.first_branch().unwrap().is_none());

        let dev = branch("dev");
        git.create_branch(&dev, &commit.oid).unwrap();
        git.set_head(&RefName::for_branch(&dev)).unwrap();

        assert_eq!(git.current_branch().unwrap(), Some(dev));
        assert_eq!(git.head_commit().unwrap().unwrap().oid, commit.oid);
    }

    #[test]
    fn branch_lifecycle() {
        let repo = TestRepo::new();
        let git = repo.git();
        let tip = git.head_commit().unwrap().unwrap();
        let topic = branch("topic");

        assert!(!git.branch_exists(&topic).unwrap());
        git.create_branch(&topic, &tip.oid).unwrap();
        assert!(git.branch_exists(&topic).unwrap());
        git.delete_branch(&topic).unwrap();
        assert!(!git.branch_exists(&topic).unwrap());
        assert!(matches!(
            git.delete_branch(&topic),
            Err(GitError::RefNotFound { .. })
        ));
    }
}

mod remotes {
    use super::*;

    #[test]
    fn add_and_update_urls() {
        let repo = TestRepo::new();
        let git = repo.git();

        assert!(git.find_remote("upstream").unwrap().is_none());
        git.add_remote("upstream", "https://example.com/one.git").unwrap();
        let remote = git.find_remote("upstream").unwrap().unwrap();
        assert_eq!(remote.url.as_deref(), Some("https://example.com/one.git"));

        git.set_remote_urls("upstream", "https://example.com/two.git").unwrap();
        let remote = git.find_remote("upstream").unwrap().unwrap();
        assert_eq!(remote.url.as_deref(), Some("https://example.com/two.git"));
        assert_eq!(remote.push_url.as_deref(), Some("https://example.com/two.git"));
    }

    #[test]
    fn set_urls_on_missing_remote_fails() {
        let repo = TestRepo::new();
        let err = repo
            .git()
            .set_remote_urls("nope", "https://example.com/x.git")
            .unwrap_err();
        assert!(matches!(err, GitError::RemoteNotFound { .. }));
    }

    #[test]
    fn push_creates_remote_branch_and_tracking_ref() {
        let repo = TestRepo::new();
        let git = repo.git();
        let main = branch("main");
        assert!(!git.remote_tracking_exists("origin", &main).unwrap());

        let spec = RefSpec::push(&RefName::for_branch(&main), true);
        let rejections = git.push("origin", &spec, &transport()).unwrap();

        assert!(rejections.is_empty());
        assert_eq!(
            git_output(repo.origin_path(), &["rev-parse", "refs/heads/main"]),
            git_output(repo.path(), &["rev-parse", "HEAD"])
        );
        assert!(git.remote_tracking_exists("origin", &main).unwrap());
    }

    #[test]
    fn diverged_push_is_non_fast_forward() {
        let repo = TestRepo::new();
        let git = repo.git();
        let main = RefName::for_branch(&branch("main"));
        git.push("origin", &RefSpec::push(&main, true), &transport())
            .unwrap();

        let other = repo.clone_origin();
        std::fs::write(other.path().join("theirs.txt"), "theirs").unwrap();
        run_git(other.path(), &["add", "theirs.txt"]);
        run_git(other.path(), &["commit", "-m", "theirs"]);
        run_git(other.path(), &["push", "origin", "main"]);

        let path = repo.write("ours.txt", "ours");
        git.stage_path(&path).unwrap();
        let sig = git.signature().unwrap();
        git.create_commit("ours", &sig, &sig, false).unwrap();

        let err = git
            .push("origin", &RefSpec::push(&main, false), &transport())
            .unwrap_err();
        assert!(matches!(err, GitError::NonFastForward { .. }), "{:?}", err);
    }

    #[test]
    fn delete_refspec_removes_remote_branch() {
        let repo = TestRepo::new();
        let git = repo.git();
        let topic = branch("topic");
        let tip = git.head_commit().unwrap().unwrap();
        git.create_branch(&topic, &tip.oid).unwrap();
        let refname = RefName::for_branch(&topic);
        git.push("origin", &RefSpec::push(&refname, true), &transport())
            .unwrap();
        assert!(!git_output(repo.origin_path(), &["branch", "--list", "topic"]).is_empty());

        git.push("origin", &RefSpec::delete(&refname), &transport())
            .unwrap();

        assert!(git_output(repo.origin_path(), &["branch", "--list", "topic"]).is_empty());
    }

    #[test]
    fn fetch_and_fast_forward_merge() {
        let repo = TestRepo::new();
        let git = repo.git();
        let main = branch("main");
        git.push(
            "origin",
            &RefSpec::push(&RefName::for_branch(&main), true),
            &transport(),
        )
        .unwrap();

        let other = repo.clone_origin();
        std::fs::write(other.path().join("remote.txt"), "remote").unwrap();
        run_git(other.path(), &["add", "remote.txt"]);
        run_git(other.path(), &["commit", "-m", "remote work"]);
        run_git(other.path(), &["push", "origin", "main"]);

        git.fetch("origin", &[], &transport()).unwrap();
        let their = git
            .fetched_tip(&RefName::for_branch(&main))
            .unwrap()
            .expect("main was fetched");

        let sig = git.signature().unwrap();
        let status = git.merge(&their, "origin/main", &sig).unwrap();

        assert_eq!(status, MergeStatus::FastForward(their.clone()));
        assert_eq!(git.head_commit().unwrap().unwrap().oid, their);
        assert!(repo.path().join("remote.txt").exists());

        let again = git.merge(&their, "origin/main", &sig).unwrap();
        assert_eq!(again, MergeStatus::UpToDate);
    }

    #[test]
    fn fetching_missing_branch_records_nothing() {
        let repo = TestRepo::new();
        let git = repo.git();
        let missing = RefName::for_branch(&branch("missing"));
        let spec = RefSpec::fetch(
            &missing,
            &RefName::for_remote_tracking("origin", &branch("main")),
        );

        let _ = git.fetch("origin", &[spec], &transport());

        assert_eq!(git.fetched_tip(&missing).unwrap(), None);
    }
}
