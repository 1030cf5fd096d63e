// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! [`ProcessRunner`] backed by real child processes.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use futures_util::future::BoxFuture;

use super::builder::{CommandResult, ProcessBuilder};
use super::ProcessRunner;
use crate::core::env::container::Env;
use crate::core::env::current_env;
use crate::error::ProcessError;

/// Runs commands as child processes of this one.
///
/// The base environment is captured at construction; per-call overrides are
/// layered on top of it.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    base_env: Env,
    timeout: Option<Duration>,
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemRunner {
    /// Creates a runner that inherits the current process environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_env: current_env(),
            timeout: None,
        }
    }

    /// Replaces the base environment.
    #[must_use]
    pub fn with_base_env(mut self, env: Env) -> Self {
        self.base_env = env;
        self
    }

    /// Kills any single command that runs longer than `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the per-command timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl ProcessRunner for SystemRunner {
    fn run<'a>(
        &'a self,
        command: &'a [String],
        cwd: &'a Path,
        env: &'a BTreeMap<String, String>,
    ) -> BoxFuture<'a, Result<CommandResult, ProcessError>> {
        Box::pin(async move {
            let Some((program, args)) = command.split_first() else {
                return Err(ProcessError::ExecutableNotFound {
                    name: String::new(),
                });
            };

            let mut builder = ProcessBuilder::which(program)?
                .name(program.as_str())
                .args(args)
                .cwd(cwd)
                .env(self.base_env.overlay(env));
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }

            builder.run().await
        })
    }
}
