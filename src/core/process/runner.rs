// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! run()
//!   |
//!   v
//! validate cwd ---------> InvalidWorkingDir
//!   |
//!   v
//! build_command()
//! args, cwd, env, piped stdio
//!   |
//!   v
//! spawn() --------------> ExecutableNotFound / SpawnFailed
//!   |
//!   v
//! run_child()  drain stdout/stderr, wait (timeout)
//!   |
//!   v
//! CommandResult { exit_code, stdout, stderr }
//! ```

use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, trace};

use super::builder::{CommandResult, ProcessBuilder};
use super::display_command;
use crate::error::ProcessError;

impl ProcessBuilder {
    /// Returns the display name for this process.
    pub(super) fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Full command line, rendered like every other command in logs and reports.
    pub(super) fn command_line(&self) -> String {
        let program = self.program().to_string_lossy();
        display_command(
            std::iter::once(program.as_ref()).chain(self.args_slice().iter().map(String::as_str)),
        )
    }

    /// Spawns and runs the process, waiting for completion.
    ///
    /// A non-zero exit status is returned as a normal [`CommandResult`].
    ///
    /// # Errors
    ///
    /// Returns a [`ProcessError`] if:
    /// - The working directory does not exist.
    /// - The executable cannot be found or spawned.
    /// - The configured timeout elapses (the child is killed).
    /// - Waiting on the child fails.
    pub async fn run(self) -> Result<CommandResult, ProcessError> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if let Some(cwd) = self.working_dir() {
            if !cwd.is_dir() {
                return Err(ProcessError::InvalidWorkingDir {
                    command: cmd_line,
                    path: cwd.display().to_string(),
                });
            }
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, "exec");

        let mut command = self.build_command();

        let mut child = command.spawn().map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ProcessError::ExecutableNotFound {
                    name: self.program().display().to_string(),
                }
            } else {
                ProcessError::SpawnFailed {
                    command: cmd_line.clone(),
                    source,
                }
            }
        })?;

        let pid = child.id();
        trace!(process = %name, pid = ?pid, "spawned");

        let output = self.run_child(&name, &cmd_line, &mut child).await?;

        trace!(process = %name, exit_code = output.exit_code(), "completed");
        Ok(output)
    }

    /// Builds the tokio Command from this builder's configuration.
    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());

        command.args(self.args_slice());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }

        if let Some(env) = self.environment() {
            command.env_clear();
            for (key, value) in env.iter() {
                command.env(key, value);
            }
        }

        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        // An aborted run drops this future; the child must not outlive it.
        command.kill_on_drop(true);

        command
    }
}
