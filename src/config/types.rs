// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global configuration section.
//!
//! ```text
//! global:
//!   working_dir           ./harbor-data
//!   workers               1
//!   command_timeout_secs  none
//!   compose_command       [docker-compose]
//!   output_log_level      3
//!   file_log_level        5
//!   log_file              none
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::compose::DEFAULT_COMPOSE_COMMAND;
use crate::logging::{LogConfig, LogLevel};

/// Default working root, relative to the current directory.
pub const DEFAULT_WORKING_DIR: &str = "harbor-data";

/// Global configuration options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Directory holding one working copy per application.
    pub working_dir: PathBuf,
    /// Number of applications processed at once.
    pub workers: usize,
    /// Kill any single git or compose command running longer than this.
    pub command_timeout_secs: Option<u64>,
    /// Compose executable and leading arguments.
    pub compose_command: Vec<String>,

    /// Log level for stdout output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file.
    pub log_file: Option<PathBuf>,
    /// Write the log file as JSON lines.
    pub log_json: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from(DEFAULT_WORKING_DIR),
            workers: 1,
            command_timeout_secs: None,
            compose_command: vec![DEFAULT_COMPOSE_COMMAND.to_string()],
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
            log_json: false,
        }
    }
}

impl GlobalConfig {
    /// Per-command timeout; `0` disables it.
    #[must_use]
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Logging setup for these options.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig::builder()
            .with_console_level(self.output_log_level)
            .with_file_level(self.file_log_level)
            .maybe_with_log_file(self.log_file.clone())
            .with_json_file(self.log_json)
            .build()
    }
}
