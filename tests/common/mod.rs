//! Test repository fixtures backed by real git repositories in temp dirs.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// The TempDir must stay alive for the duration of the test to prevent
/// cleanup from under the repository.
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

pub fn setup_repo() -> TestRepo {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().to_path_buf();
    git(&path, &["init"]);
    git(&path, &["config", "user.name", "Test User"]);
    git(&path, &["config", "user.email", "test@example.com"]);
    TestRepo { temp_dir, path }
}

/// A repository with one commit, so index operations have a HEAD to diff
/// against.
pub fn setup_repo_with_commit() -> TestRepo {
    let repo = setup_repo();
    write_file(&repo.path, "initial.txt", "initial content\n");
    git(&repo.path, &["add", "initial.txt"]);
    git(&repo.path, &["commit", "-m", "initial commit"]);
    repo
}

pub fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

pub fn git_stdout(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn write_file(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}
