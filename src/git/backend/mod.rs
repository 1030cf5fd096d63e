// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitQuery (read)   --> GixBackend   (pure Rust gix, no subprocess)
//! writes, revisions --> ShellBackend (git CLI through a ProcessRunner)
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use crate::core::process::{CommandResult, ProcessRunner};
use crate::error::{GixError, ProcessError};

// --- Query Trait (Read-only operations) ---

/// Read-only git query operations.
///
/// Implementors inspect repository state without modifying it.
pub trait GitQuery {
    /// Check if `path` is itself the root of a git work tree.
    ///
    /// Parent directories are not searched.
    fn is_git_repo(path: &Path) -> bool;

    /// Check for modifications to tracked files, staged or not.
    ///
    /// Untracked files are ignored.
    ///
    /// # Errors
    ///
    /// Returns a `GixError` if the repository cannot be opened or its status
    /// cannot be computed.
    fn has_uncommitted_changes(path: &Path) -> Result<bool, GixError>;
}

// --- GixBackend Implementation (Pure Rust) ---

/// Pure Rust git backend using gix.
pub struct GixBackend;

impl GitQuery for GixBackend {
    fn is_git_repo(path: &Path) -> bool {
        gix::open(path).is_ok_and(|repo| repo.workdir().is_some())
    }

    fn has_uncommitted_changes(path: &Path) -> Result<bool, GixError> {
        use gix::status::UntrackedFiles;

        let repo = gix::open(path).map_err(|e| GixError::Open(Box::new(e)))?;
        if repo.workdir().is_none() {
            return Err(GixError::BareRepository);
        }

        let has_changes = repo
            .status(gix::progress::Discard)
            .map_err(|e| GixError::Status(e.to_string()))?
            .untracked_files(UntrackedFiles::None)
            .into_iter(None)
            .map_err(|e| GixError::Status(e.to_string()))?
            .next()
            .is_some();

        Ok(has_changes)
    }
}

// --- ShellBackend Implementation (Git CLI) ---

/// Git CLI invocations routed through an injected [`ProcessRunner`].
///
/// Every call sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0` so a
/// missing credential fails fast instead of waiting on a prompt.
pub struct ShellBackend<'a> {
    runner: &'a dyn ProcessRunner,
    env: BTreeMap<String, String>,
}

impl<'a> ShellBackend<'a> {
    #[must_use]
    pub fn new(runner: &'a dyn ProcessRunner) -> Self {
        let env = BTreeMap::from([
            ("GCM_INTERACTIVE".to_string(), "never".to_string()),
            ("GIT_TERMINAL_PROMPT".to_string(), "0".to_string()),
        ]);
        Self { runner, env }
    }

    /// Execute `git <args>` in `cwd`.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if git could not be launched. A non-zero exit
    /// is returned as a normal [`CommandResult`].
    pub async fn git(&self, args: &[&str], cwd: &Path) -> Result<CommandResult, ProcessError> {
        let mut command = Vec::with_capacity(args.len() + 1);
        command.push("git".to_string());
        command.extend(args.iter().map(ToString::to_string));
        self.runner.run(&command, cwd, &self.env).await
    }

    /// Clone `url` into `dest`. Runs in the parent of `dest`.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if git could not be launched.
    pub async fn clone(&self, url: &str, dest: &Path) -> Result<CommandResult, ProcessError> {
        let dest_str = dest.to_string_lossy();
        let parent = dest.parent().unwrap_or_else(|| Path::new("."));
        self.git(
            &[
                "clone",
                "--quiet",
                "-c",
                "advice.detachedHead=false",
                url,
                &dest_str,
            ],
            parent,
        )
        .await
    }

    /// Fetch branches and tags from `origin`, pruning deleted refs.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if git could not be launched.
    pub async fn fetch(&self, repo_path: &Path) -> Result<CommandResult, ProcessError> {
        self.git(
            &["fetch", "--quiet", "--prune", "--tags", "--force", "origin"],
            repo_path,
        )
        .await
    }

    /// Resolve `rev` to an abbreviated commit id.
    ///
    /// Returns `None` when the revision does not name a commit.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if git could not be launched.
    pub async fn short_commit(
        &self,
        repo_path: &Path,
        rev: &str,
    ) -> Result<Option<String>, ProcessError> {
        let revspec = format!("{rev}^{{commit}}");
        let result = self
            .git(
                &["rev-parse", "--quiet", "--verify", "--short=12", &revspec],
                repo_path,
            )
            .await?;
        let stdout = result.stdout_lossy();
        let id = stdout.trim();
        Ok((result.success() && !id.is_empty()).then(|| id.to_string()))
    }

    /// Whether `ancestor` is reachable from `descendant`, i.e. moving from
    /// the first to the second is a fast-forward.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if git could not be launched.
    pub async fn is_ancestor(
        &self,
        repo_path: &Path,
        ancestor: &str,
        descendant: &str,
    ) -> Result<bool, ProcessError> {
        let result = self
            .git(&["merge-base", "--is-ancestor", ancestor, descendant], repo_path)
            .await?;
        Ok(result.success())
    }

    /// Move HEAD and the work tree to `what`, detaching HEAD.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if git could not be launched.
    pub async fn checkout_detached(
        &self,
        repo_path: &Path,
        what: &str,
    ) -> Result<CommandResult, ProcessError> {
        self.git(
            &[
                "-c",
                "advice.detachedHead=false",
                "checkout",
                "-q",
                "--detach",
                what,
            ],
            repo_path,
        )
        .await
    }
}

#[cfg(test)]
mod tests;
