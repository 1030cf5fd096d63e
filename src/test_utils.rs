// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared test utilities.
//!
//! `ScriptedRunner` records every command and answers from a script, so
//! compose and orchestrator tests never need a container runtime. Git calls
//! can be passed through to the real tool.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use crate::core::process::{CommandResult, ProcessRunner, SystemRunner, display_command};
use crate::error::ProcessError;

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Call {
    pub(crate) command: Vec<String>,
    pub(crate) cwd: PathBuf,
    pub(crate) env: BTreeMap<String, String>,
}

impl Call {
    pub(crate) fn line(&self) -> String {
        display_command(&self.command)
    }

    pub(crate) fn is_git(&self) -> bool {
        self.command.first().is_some_and(|program| program == "git")
    }
}

#[derive(Clone)]
enum Reply {
    Exit(CommandResult),
    LaunchFailure,
}

struct Rule {
    pattern: String,
    cwd: Option<PathBuf>,
    reply: Reply,
}

impl Rule {
    fn matches(&self, line: &str, cwd: &Path) -> bool {
        line.contains(self.pattern.as_str()) && self.cwd.as_deref().is_none_or(|dir| dir == cwd)
    }
}

#[derive(Default)]
pub(crate) struct ScriptedRunner {
    calls: Mutex<Vec<Call>>,
    rules: Vec<Rule>,
    git: Option<SystemRunner>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedRunner {
    /// Every command succeeds with empty output.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Runs `git` commands for real.
    pub(crate) fn with_git(mut self) -> Self {
        self.git = Some(SystemRunner::new());
        self
    }

    /// Answers commands whose line contains `pattern` with `result`.
    pub(crate) fn respond(self, pattern: &str, result: CommandResult) -> Self {
        self.rule(pattern, None, Reply::Exit(result))
    }

    /// Like [`respond`](Self::respond), for commands run in `cwd` only.
    pub(crate) fn respond_in(self, cwd: &Path, pattern: &str, result: CommandResult) -> Self {
        self.rule(pattern, Some(cwd.to_path_buf()), Reply::Exit(result))
    }

    /// Commands whose line contains `pattern` cannot be launched.
    pub(crate) fn fail_launch(self, pattern: &str) -> Self {
        self.rule(pattern, None, Reply::LaunchFailure)
    }

    fn rule(mut self, pattern: &str, cwd: Option<PathBuf>, reply: Reply) -> Self {
        self.rules.push(Rule {
            pattern: pattern.to_string(),
            cwd,
            reply,
        });
        self
    }

    /// Holds each scripted command open for `delay`.
    pub(crate) const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Command lines of all non-git calls, in order.
    pub(crate) fn compose_lines(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter(|call| !call.is_git())
            .map(Call::line)
            .collect()
    }

    /// Highest number of scripted commands observed running at once.
    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn reply_for(&self, call: &Call) -> Reply {
        let line = call.line();
        self.rules
            .iter()
            .find(|rule| rule.matches(&line, &call.cwd))
            .map_or_else(
                || Reply::Exit(CommandResult::default()),
                |rule| rule.reply.clone(),
            )
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run<'a>(
        &'a self,
        command: &'a [String],
        cwd: &'a Path,
        env: &'a BTreeMap<String, String>,
    ) -> BoxFuture<'a, Result<CommandResult, ProcessError>> {
        Box::pin(async move {
            let call = Call {
                command: command.to_vec(),
                cwd: cwd.to_path_buf(),
                env: env.clone(),
            };
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(call.clone());
            }

            if call.is_git()
                && let Some(git) = &self.git
            {
                return git.run(command, cwd, env).await;
            }

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match self.reply_for(&call) {
                Reply::Exit(result) => Ok(result),
                Reply::LaunchFailure => Err(ProcessError::ExecutableNotFound {
                    name: command.first().cloned().unwrap_or_default(),
                }),
            }
        })
    }
}

/// Shorthand for a completed command.
pub(crate) fn exited(code: i32, stdout: &str, stderr: &str) -> CommandResult {
    CommandResult::new(code, stdout.as_bytes().to_vec(), stderr.as_bytes().to_vec())
}

#[derive(Clone)]
struct BufferWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| std::io::Error::other("buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
struct BufferMakeWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl<'a> MakeWriter<'a> for BufferMakeWriter {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter {
            buffer: self.buffer.clone(),
        }
    }
}

/// Runs an async closure while capturing tracing output at INFO and above.
///
/// Returns the closure's value and the captured log text.
pub(crate) async fn run_with_logs<F, Fut, T>(f: F) -> (T, String)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = T>,
{
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(BufferMakeWriter {
            buffer: buffer.clone(),
        })
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .with_target(false)
        .finish();

    let _guard = tracing::subscriber::set_default(subscriber);
    let value = f().await;

    let logs = buffer
        .lock()
        .map(|guard| String::from_utf8_lossy(&guard).to_string())
        .unwrap_or_default();
    (value, logs)
}
