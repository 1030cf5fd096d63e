// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Compose tool invocations for one application.
//!
//! ```text
//! <compose_command...> -f <compose_file> <verb...>
//!   cwd = working copy [/ compose_dir]
//!   env = application environment (over the runner's base env)
//!
//! query_running_services  ps --services --filter status=running
//! pull_images             pull
//! up_stack(rebuild)       up --remove-orphans [--build] -d
//! down_stack              down --remove-orphans
//! ```

#[cfg(test)]
mod tests;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::process::{CommandResult, ProcessRunner, display_command};
use crate::deploy::model::Application;
use crate::error::{ComposeError, ProcessError};

/// Default compose executable.
pub const DEFAULT_COMPOSE_COMMAND: &str = "docker-compose";

/// Drives the compose tool for one application's working copy.
pub struct ComposeController<'a> {
    runner: &'a dyn ProcessRunner,
    compose_command: &'a [String],
    app: &'a Application,
    project_dir: PathBuf,
}

impl<'a> ComposeController<'a> {
    /// `working_copy` is the repository root; the application's
    /// `compose_dir` is resolved against it.
    #[must_use]
    pub fn new(
        runner: &'a dyn ProcessRunner,
        compose_command: &'a [String],
        app: &'a Application,
        working_copy: &Path,
    ) -> Self {
        let project_dir = app
            .compose_dir()
            .map_or_else(|| working_copy.to_path_buf(), |dir| working_copy.join(dir));
        Self {
            runner,
            compose_command,
            app,
            project_dir,
        }
    }

    /// Directory the compose tool runs in.
    #[must_use]
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Builds the full command line for `verb`.
    #[must_use]
    pub fn command(&self, verb: &[&str]) -> Vec<String> {
        let mut command = Vec::with_capacity(self.compose_command.len() + 2 + verb.len());
        command.extend(self.compose_command.iter().cloned());
        command.push("-f".to_string());
        command.push(self.app.compose_file().to_string());
        command.extend(verb.iter().map(ToString::to_string));
        command
    }

    async fn invoke(&self, verb: &[&str]) -> Result<CommandResult, ProcessError> {
        let command = self.command(verb);
        debug!(command = %display_command(&command), "compose");
        self.runner
            .run(&command, &self.project_dir, self.app.environment())
            .await
    }

    /// Names of services currently running for this project.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError::QueryFailed` when the tool exits non-zero, or
    /// `ComposeError::Launch` when it cannot be run.
    pub async fn query_running_services(&self) -> Result<BTreeSet<String>, ComposeError> {
        let verb = ["ps", "--services", "--filter", "status=running"];
        let result = self.invoke(&verb).await?;
        if !result.success() {
            return Err(ComposeError::QueryFailed {
                command: display_command(&self.command(&verb)),
                exit_code: result.exit_code(),
                stderr: result.stderr_lossy().trim().to_string(),
            });
        }
        Ok(parse_service_names(&result.stdout_lossy()))
    }

    /// Pulls images for all services.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if the tool cannot be run.
    pub async fn pull_images(&self) -> Result<CommandResult, ProcessError> {
        self.invoke(&["pull"]).await
    }

    /// Starts services detached, removing orphans; `rebuild` adds `--build`.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if the tool cannot be run.
    pub async fn up_stack(&self, rebuild: bool) -> Result<CommandResult, ProcessError> {
        if rebuild {
            self.invoke(&["up", "--remove-orphans", "--build", "-d"]).await
        } else {
            self.invoke(&["up", "--remove-orphans", "-d"]).await
        }
    }

    /// Stops and removes services, removing orphans.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError` if the tool cannot be run.
    pub async fn down_stack(&self) -> Result<CommandResult, ProcessError> {
        self.invoke(&["down", "--remove-orphans"]).await
    }
}

/// One service name per line; blank lines ignored.
#[must_use]
pub fn parse_service_names(output: &str) -> BTreeSet<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}
