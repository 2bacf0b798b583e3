//! End-to-end tests for the `scm` binary.
//!
//! Every test runs the binary with `--repo-path` against a fresh repository
//! and a home directory of its own, so no user configuration leaks in.

use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn run_git(dir: &Path, args: &[&str]) {
    let status = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .expect("failed to run git");
    assert!(status.success(), "git {:?} failed", args);
}

struct Sandbox {
    repo: TempDir,
    home: TempDir,
}

impl Sandbox {
    /// An empty repository with identity configured.
    fn new() -> Self {
        let repo = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        run_git(repo.path(), &["init"]);
        run_git(repo.path(), &["config", "user.email", "cli@example.com"]);
        run_git(repo.path(), &["config", "user.name", "Cli User"]);
        Self { repo, home }
    }

    /// A repository with one commit on `dev`.
    fn with_commit() -> Self {
        let sandbox = Self::new();
        run_git(sandbox.path(), &["checkout", "-b", "dev"]);
        std::fs::write(sandbox.path().join("a.txt"), "a\n").unwrap();
        run_git(sandbox.path(), &["add", "a.txt"]);
        run_git(sandbox.path(), &["commit", "-m", "first"]);
        sandbox
    }

    fn path(&self) -> &Path {
        self.repo.path()
    }

    fn write_config(&self, json: &str) -> std::path::PathBuf {
        let path = self.home.path().join("config.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    fn scm(&self) -> Command {
        let mut cmd = Command::cargo_bin("scm").unwrap();
        cmd.env_remove("SCM_CONFIG")
            .env_remove("SCM_TOKEN")
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .arg("--no-interactive")
            .arg("--repo-path")
            .arg(self.path());
        cmd
    }
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("scm")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("push"))
        .stdout(predicate::str::contains("delete-branch"));
}

#[test]
fn outside_repository_fails() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("scm")
        .unwrap()
        .args(["info", "--repo-path"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn info_on_empty_repository() {
    let sandbox = Sandbox::new();
    sandbox
        .scm()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Local Repo:"))
        .stdout(predicate::str::contains("Author: Cli User"))
        .stdout(predicate::str::contains("Head doesn't exist yet!"));
}

#[test]
fn information_alias_shows_branch_and_sha() {
    let sandbox = Sandbox::with_commit();
    sandbox
        .scm()
        .arg("information")
        .assert()
        .success()
        .stdout(predicate::str::contains("Branch: dev"))
        .stdout(predicate::str::is_match(r"SHA: [0-9a-f]{9}\n").unwrap());
}

#[test]
fn status_marks_modified_entries_and_shows_message() {
    let sandbox = Sandbox::with_commit();
    std::fs::write(sandbox.path().join("a.txt"), "changed\n").unwrap();
    std::fs::write(sandbox.path().join("new.txt"), "new\n").unwrap();
    let message = sandbox.home.path().join("message.txt");
    std::fs::write(&message, "Next change\n\nMore detail").unwrap();
    let config = sandbox.write_config(&format!(
        r#"{{ "commit_message_file": {:?} }}"#,
        message.to_str().unwrap()
    ));

    sandbox
        .scm()
        .arg("--config-file-path")
        .arg(&config)
        .arg("stat")
        .assert()
        .success()
        .stdout(predicate::str::contains("Local changes:"))
        .stdout(predicate::str::contains("* a.txt"))
        .stdout(predicate::str::contains("  new.txt"))
        .stdout(predicate::str::contains("Next change\n..."))
        .stdout(predicate::str::contains("More detail").not());
}

#[test]
fn quiet_suppresses_output() {
    let sandbox = Sandbox::with_commit();
    sandbox
        .scm()
        .args(["-q", "info"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn push_without_origin_fails() {
    let sandbox = Sandbox::with_commit();
    sandbox
        .scm()
        .args(["push", "mod"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("remote origin not found"))
        .stderr(predicate::str::contains("set-url"));
}

#[test]
fn push_amend_warns_first() {
    let sandbox = Sandbox::with_commit();
    sandbox
        .scm()
        .args(["push", "all", "--amend"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Amend/Force flag is set. This will amend last comment and force push to remote!",
        ));
}

#[test]
fn push_all_end_to_end() {
    let sandbox = Sandbox::new();
    let origin = TempDir::new().unwrap();
    run_git(origin.path(), &["init", "--bare"]);
    std::fs::write(sandbox.path().join("notes.txt"), "hello\n").unwrap();
    let message = sandbox.home.path().join("message.txt");
    std::fs::write(&message, "Add notes").unwrap();
    let config = sandbox.write_config(&format!(
        r#"{{ "commit_message_file": {:?} }}"#,
        message.to_str().unwrap()
    ));

    sandbox
        .scm()
        .arg("set-url")
        .arg(origin.path())
        .assert()
        .success();

    sandbox
        .scm()
        .arg("--config-file-path")
        .arg(&config)
        .args(["push", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* notes.txt"))
        .stdout(predicate::str::contains("changes staged"))
        .stdout(predicate::str::contains("author name: Cli User"))
        .stdout(predicate::str::contains("Add notes"))
        .stdout(predicate::str::contains("pushed (forced) -> "));

    let output = StdCommand::new("git")
        .args(["branch", "--list", "dev"])
        .current_dir(origin.path())
        .output()
        .unwrap();
    assert!(String::from_utf8_lossy(&output.stdout).contains("dev"));
}

#[test]
fn set_url_twice_reports_already_set() {
    let sandbox = Sandbox::with_commit();
    let url = "https://example.com/project.git";

    sandbox.scm().args(["set-url", url]).assert().success();
    sandbox
        .scm()
        .args(["set-url", url])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already set to provided URL!"));
}

#[test]
fn delete_missing_branch_is_noop() {
    let sandbox = Sandbox::with_commit();
    sandbox
        .scm()
        .args(["delete-branch", "nope"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Branch nope does not exist!"));
}

#[test]
fn delete_checked_out_branch_fails() {
    let sandbox = Sandbox::with_commit();
    sandbox
        .scm()
        .args(["delete-branch", "dev"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot delete the checked-out branch dev"));

    run_git(sandbox.path(), &["rev-parse", "--verify", "refs/heads/dev"]);
}

#[test]
fn invalid_config_is_rejected() {
    let sandbox = Sandbox::with_commit();
    let config = sandbox.write_config(r#"{ "no_such_field": true }"#);

    sandbox
        .scm()
        .arg("--config-file-path")
        .arg(&config)
        .args(["pull", "--upstream"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config file"));
}

#[test]
fn missing_config_file_is_rejected() {
    let sandbox = Sandbox::with_commit();
    sandbox
        .scm()
        .args(["--config-file-path", "/definitely/not/here.json"])
        .args(["pull", "-u"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}
