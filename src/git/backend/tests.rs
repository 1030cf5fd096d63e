// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;
use std::process::Command;

use super::{GitQuery, GixBackend, ShellBackend};
use crate::core::process::SystemRunner;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "Harbor Test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Harbor Test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .status()
        .expect("git should run");
    assert!(status.success(), "git {args:?} failed");
}

fn repo_with_commit() -> TempDir {
    let temp = temp_dir();
    git(temp.path(), &["init", "--quiet"]);
    std::fs::write(temp.path().join("docker-compose.yml"), "services: {}\n").unwrap();
    git(temp.path(), &["add", "."]);
    git(temp.path(), &["commit", "--quiet", "-m", "initial"]);
    temp
}

#[test]
fn test_gix_backend_is_git_repo() {
    let temp = temp_dir();
    assert!(!GixBackend::is_git_repo(temp.path()));

    gix::init(temp.path()).expect("failed to init repo");
    assert!(GixBackend::is_git_repo(temp.path()));
}

#[test]
fn test_is_git_repo_does_not_search_parents() {
    let temp = temp_dir();
    gix::init(temp.path()).expect("failed to init repo");
    let nested = temp.path().join("nested");
    std::fs::create_dir(&nested).unwrap();

    assert!(!GixBackend::is_git_repo(&nested));
}

#[test]
fn test_clean_checkout_has_no_changes() {
    let repo = repo_with_commit();
    assert!(!GixBackend::has_uncommitted_changes(repo.path()).unwrap());
}

#[test]
fn test_untracked_files_are_not_changes() {
    let repo = repo_with_commit();
    std::fs::write(repo.path().join(".env"), "SECRET=1\n").unwrap();

    assert!(!GixBackend::has_uncommitted_changes(repo.path()).unwrap());
}

#[test]
fn test_modified_tracked_file_is_a_change() {
    let repo = repo_with_commit();
    std::fs::write(
        repo.path().join("docker-compose.yml"),
        "services:\n  web: {}\n",
    )
    .unwrap();

    assert!(GixBackend::has_uncommitted_changes(repo.path()).unwrap());
}

#[test]
fn test_uncommitted_changes_outside_repo_is_error() {
    let temp = temp_dir();
    assert!(GixBackend::has_uncommitted_changes(temp.path()).is_err());
}

#[tokio::test]
async fn test_shell_backend_short_commit() {
    let repo = repo_with_commit();
    let runner = SystemRunner::new();
    let shell = ShellBackend::new(&runner);

    let head = shell
        .short_commit(repo.path(), "HEAD")
        .await
        .expect("git should launch")
        .expect("HEAD should resolve");
    assert_eq!(head.len(), 12);

    let missing = shell
        .short_commit(repo.path(), "no-such-branch")
        .await
        .expect("git should launch");
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_shell_backend_clone_failure_is_a_result() {
    let temp = temp_dir();
    let runner = SystemRunner::new();
    let shell = ShellBackend::new(&runner);

    let result = shell
        .clone(
            &temp.path().join("missing-remote").to_string_lossy(),
            &temp.path().join("copy"),
        )
        .await
        .expect("git should launch");

    assert!(!result.success());
    assert!(!temp.path().join("copy").exists());
}

#[tokio::test]
async fn test_shell_backend_is_ancestor() {
    let repo = repo_with_commit();
    let runner = SystemRunner::new();
    let shell = ShellBackend::new(&runner);
    let first = shell
        .short_commit(repo.path(), "HEAD")
        .await
        .expect("git should launch")
        .expect("HEAD should resolve");
    std::fs::write(repo.path().join("README.md"), "docs\n").unwrap();
    git(repo.path(), &["add", "."]);
    git(repo.path(), &["commit", "--quiet", "-m", "docs"]);

    let forward = shell
        .is_ancestor(repo.path(), &first, "HEAD")
        .await
        .expect("git should launch");
    let backward = shell
        .is_ancestor(repo.path(), "HEAD", &first)
        .await
        .expect("git should launch");

    assert!(forward);
    assert!(!backward);
}
