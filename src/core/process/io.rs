// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! I/O draining and output capture for processes.
//!
//! ```text
//! run_child()
//!   stdout/stderr reader tasks (read_until '\n')
//!     each line --> trace!(process, stream, line)
//!     raw bytes --> Vec<u8>
//!   wait (or timeout --> kill --> ProcessError::Timeout)
//!   join readers
//!   --> CommandResult { exit_code, stdout, stderr }
//! ```

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use super::builder::{CommandResult, ProcessBuilder};
use crate::error::ProcessError;
use crate::logging::OUTPUT_TARGET;

/// Spawns a task draining `reader` to its end.
fn spawn_reader<R>(reader: Option<R>, process_name: &str, stream: &'static str) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let name = process_name.to_string();
    tokio::spawn(async move {
        match reader {
            Some(reader) => read_stream(reader, &name, stream).await,
            None => Vec::new(),
        }
    })
}

impl ProcessBuilder {
    /// Runs the child process, draining its output and waiting for completion.
    pub(super) async fn run_child(
        &self,
        name: &str,
        cmd_line: &str,
        child: &mut Child,
    ) -> Result<CommandResult, ProcessError> {
        let stdout_handle = spawn_reader(child.stdout.take(), name, "stdout");
        let stderr_handle = spawn_reader(child.stderr.take(), name, "stderr");

        let limit = self.timeout_duration();
        let finished = match limit {
            Some(limit) => tokio::time::timeout(limit, child.wait()).await.ok(),
            None => Some(child.wait().await),
        };

        let Some(waited) = finished else {
            let limit = limit.unwrap_or_default();
            warn!(process = %name, timeout = ?limit, "process timed out");
            child.kill().await.ok();
            stdout_handle.abort();
            stderr_handle.abort();
            return Err(ProcessError::Timeout {
                command: cmd_line.to_string(),
                timeout_secs: limit.as_secs(),
            });
        };

        let exit_status = waited.map_err(|e| ProcessError::OutputError {
            command: cmd_line.to_string(),
            message: e.to_string(),
        })?;

        let join = |e: tokio::task::JoinError| ProcessError::OutputError {
            command: cmd_line.to_string(),
            message: e.to_string(),
        };
        let stdout = stdout_handle.await.map_err(join)?;
        let stderr = stderr_handle.await.map_err(join)?;

        Ok(CommandResult::new(
            exit_status.code().unwrap_or(-1),
            stdout,
            stderr,
        ))
    }
}

/// Reads a stream to EOF, forwarding each line to the trace log.
async fn read_stream<R>(reader: R, process_name: &str, stream_name: &str) -> Vec<u8>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut captured = Vec::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {
                trace!(
                    target: OUTPUT_TARGET,
                    process = %process_name,
                    stream = %stream_name,
                    line = %String::from_utf8_lossy(&line).trim_end(),
                    "output"
                );
                captured.extend_from_slice(&line);
            }
            Err(e) => {
                warn!(
                    process = %process_name,
                    stream = %stream_name,
                    error = %e,
                    "error reading stream"
                );
                break;
            }
        }
    }

    captured
}
