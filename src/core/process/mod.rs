// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning and management.
//!
//! ```text
//! ProcessRunner (trait, injected into git/compose/orchestrator)
//!     |
//!     +-- SystemRunner: base Env + overrides, optional timeout
//!             |
//!             v
//!     ProcessBuilder::which("docker-compose")
//!       .args() .cwd() .env() .timeout()
//!       .run()
//!           --> tokio::process::Command
//!               drain stdout/stderr
//!           --> CommandResult { exit_code, stdout, stderr }
//! ```

pub mod builder;
mod io;
mod runner;
mod system;

use std::collections::BTreeMap;
use std::path::Path;

use futures_util::future::BoxFuture;

pub use builder::{CommandResult, ProcessBuilder};
pub use system::SystemRunner;

use crate::error::ProcessError;

/// Capability to run one external command to completion.
///
/// Implementations must never fail because of a non-zero exit code; that is
/// reported through [`CommandResult::exit_code`]. Errors are reserved for
/// commands that could not be run at all.
///
/// The orchestrator only talks to git and the compose tool through this trait,
/// so tests can substitute a recording implementation.
pub trait ProcessRunner: Send + Sync {
    /// Runs `command` (program followed by its arguments) in `cwd`.
    ///
    /// `env` holds overrides layered on top of the runner's base environment.
    fn run<'a>(
        &'a self,
        command: &'a [String],
        cwd: &'a Path,
        env: &'a BTreeMap<String, String>,
    ) -> BoxFuture<'a, Result<CommandResult, ProcessError>>;
}

/// Renders a command for logs and reports.
///
/// Empty arguments and arguments containing whitespace or `"` are wrapped in
/// double quotes, with embedded `"` escaped.
#[must_use]
pub fn display_command<I, S>(command: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    use std::fmt::Write as _;

    let mut line = String::new();
    for (i, part) in command.into_iter().enumerate() {
        let part = part.as_ref();
        if i > 0 {
            line.push(' ');
        }
        if part.is_empty() || part.contains(|c: char| c.is_whitespace() || c == '"') {
            let escaped = part.replace('"', "\\\"");
            let _ = write!(line, "\"{escaped}\"");
        } else {
            line.push_str(part);
        }
    }
    line
}
