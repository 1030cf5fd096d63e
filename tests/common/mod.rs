// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared helpers for integration tests.
//!
//! `RecordingRunner` passes `git` through to the real tool and answers every
//! other command itself, so deployments run without a container runtime.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use futures_util::future::BoxFuture;
use harbor_rs::core::process::{CommandResult, ProcessRunner, SystemRunner, display_command};
use harbor_rs::error::ProcessError;
use tempfile::TempDir;

pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

/// Runs git synchronously with a fixed identity, returning trimmed stdout.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "Harbor Test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Harbor Test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .output()
        .expect("git should run");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// An upstream repository whose default branch holds a compose manifest.
pub struct Upstream {
    _dir: TempDir,
    pub path: PathBuf,
}

impl Upstream {
    pub fn new(name: &str) -> Self {
        let dir = temp_dir();
        let path = dir.path().join(name);
        std::fs::create_dir(&path).unwrap();
        git(&path, &["init", "--quiet"]);
        let upstream = Self { _dir: dir, path };
        upstream.commit(
            "docker-compose.yml",
            "services:\n  web:\n    image: nginx\n",
            "initial",
        );
        upstream
    }

    pub fn commit(&self, file: &str, content: &str, message: &str) -> String {
        if let Some(parent) = Path::new(file).parent() {
            std::fs::create_dir_all(self.path.join(parent)).unwrap();
        }
        std::fs::write(self.path.join(file), content).unwrap();
        git(&self.path, &["add", file]);
        git(&self.path, &["commit", "--quiet", "-m", message]);
        self.head()
    }

    pub fn head(&self) -> String {
        git(&self.path, &["rev-parse", "--short=12", "HEAD"])
    }

    pub fn url(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// One recorded non-git invocation.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub line: String,
    pub cwd: PathBuf,
    pub env: BTreeMap<String, String>,
}

#[derive(Default)]
pub struct RecordingRunner {
    git: SystemRunner,
    recorded: Mutex<Vec<Recorded>>,
    failures: Vec<(String, i32, String)>,
    running: String,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands containing `pattern` exit with `code` and `stderr`.
    pub fn failing(mut self, pattern: &str, code: i32, stderr: &str) -> Self {
        self.failures
            .push((pattern.to_string(), code, stderr.to_string()));
        self
    }

    /// Stdout of the running-services query.
    pub fn with_running(mut self, services: &[&str]) -> Self {
        self.running = services.join("\n");
        self
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.recorded
            .lock()
            .map(|recorded| recorded.clone())
            .unwrap_or_default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.recorded().into_iter().map(|call| call.line).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.clear();
        }
    }

    fn answer(&self, line: &str) -> CommandResult {
        if let Some((_, code, stderr)) = self
            .failures
            .iter()
            .find(|(pattern, _, _)| line.contains(pattern.as_str()))
        {
            return CommandResult::new(*code, Vec::new(), stderr.as_bytes().to_vec());
        }
        if line.contains(" ps ") {
            return CommandResult::new(0, self.running.as_bytes().to_vec(), Vec::new());
        }
        CommandResult::default()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run<'a>(
        &'a self,
        command: &'a [String],
        cwd: &'a Path,
        env: &'a BTreeMap<String, String>,
    ) -> BoxFuture<'a, Result<CommandResult, ProcessError>> {
        Box::pin(async move {
            if command.first().is_some_and(|program| program == "git") {
                return self.git.run(command, cwd, env).await;
            }
            let line = display_command(command);
            if let Ok(mut recorded) = self.recorded.lock() {
                recorded.push(Recorded {
                    line: line.clone(),
                    cwd: cwd.to_path_buf(),
                    env: env.clone(),
                });
            }
            Ok(self.answer(&line))
        })
    }
}
