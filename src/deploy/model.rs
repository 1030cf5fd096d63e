// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Deployment data model.
//!
//! ```text
//! Application        immutable per run, built from config
//! DeploymentDecision NoAction | Deploy(NewCheckout|RevisionChanged|ForcedByCaller)
//! DeploymentOutcome  Skipped | Succeeded | Stopped | Failed(StageFailure)
//! Stage              Clone Fetch QueryRunning Pull Up Down
//! ```

use bon::Builder;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::process::CommandResult;

/// Compose manifest name used when an application does not override it.
pub const DEFAULT_COMPOSE_FILE: &str = "docker-compose.yml";

/// One git-backed compose application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Builder)]
pub struct Application {
    /// Unique identifier; also the working copy directory name.
    #[builder(into)]
    id: String,
    /// Clone URL or local path of the repository.
    #[builder(into)]
    source: String,
    /// Branch, tag or commit to deploy instead of the remote default branch.
    #[builder(into)]
    revision_pin: Option<String>,
    /// Variables layered over the orchestrator's environment for compose.
    #[builder(default)]
    environment: BTreeMap<String, String>,
    /// Subdirectory of the working copy holding the compose manifest.
    #[builder(into)]
    compose_dir: Option<PathBuf>,
    #[builder(into, default = DEFAULT_COMPOSE_FILE.to_string())]
    compose_file: String,
    #[builder(default = true)]
    enabled: bool,
}

impl Application {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn revision_pin(&self) -> Option<&str> {
        self.revision_pin.as_deref()
    }

    #[must_use]
    pub const fn environment(&self) -> &BTreeMap<String, String> {
        &self.environment
    }

    #[must_use]
    pub fn compose_dir(&self) -> Option<&Path> {
        self.compose_dir.as_deref()
    }

    #[must_use]
    pub fn compose_file(&self) -> &str {
        &self.compose_file
    }

    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }
}

/// Why a deployment is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployReason {
    /// The working copy did not exist before this run.
    NewCheckout,
    /// Upstream moved since the previous run.
    RevisionChanged,
    /// The caller asked for a redeploy regardless of revisions.
    ForcedByCaller,
}

impl fmt::Display for DeployReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewCheckout => write!(f, "new checkout"),
            Self::RevisionChanged => write!(f, "revision changed"),
            Self::ForcedByCaller => write!(f, "forced"),
        }
    }
}

/// Planner verdict for one application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentDecision {
    NoAction,
    Deploy(DeployReason),
}

/// Step of the per-application pipeline that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Clone,
    Fetch,
    QueryRunning,
    Pull,
    Up,
    Down,
}

impl Stage {
    /// Returns the display name for this stage.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Clone => "clone",
            Self::Fetch => "fetch",
            Self::QueryRunning => "query_running",
            Self::Pull => "pull",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything needed to diagnose a failed stage without re-running it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageFailure {
    stage: Stage,
    message: String,
    /// Present when the stage ran a command that exited non-zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<CommandResult>,
}

impl StageFailure {
    /// A command ran and exited non-zero.
    #[must_use]
    pub fn from_result(stage: Stage, result: CommandResult) -> Self {
        let stderr = result.stderr_lossy();
        let message = if stderr.trim().is_empty() {
            format!("exited with code {}", result.exit_code())
        } else {
            format!(
                "exited with code {}: {}",
                result.exit_code(),
                stderr.trim()
            )
        };
        Self {
            stage,
            message,
            result: Some(result),
        }
    }

    /// The stage failed before or without a command result.
    #[must_use]
    pub fn from_error(stage: Stage, error: &dyn std::error::Error) -> Self {
        Self {
            stage,
            message: error.to_string(),
            result: None,
        }
    }

    /// Attaches the command result that led to `error`.
    #[must_use]
    pub fn with_result(mut self, result: Option<CommandResult>) -> Self {
        self.result = result;
        self
    }

    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn result(&self) -> Option<&CommandResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        self.result.as_ref().map(CommandResult::exit_code)
    }
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.message)
    }
}

/// Why an application was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Working copy already at the target revision.
    UpToDate,
    /// Application disabled and nothing left to stop.
    Disabled,
}

/// Terminal state of one application in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeploymentOutcome {
    Skipped {
        reason: SkipReason,
    },
    Succeeded {
        reason: DeployReason,
        revision: String,
        /// Services that were running before `up`.
        previously_running: BTreeSet<String>,
    },
    /// Disabled application brought down and its working copy archived.
    Stopped,
    Failed(StageFailure),
}

impl DeploymentOutcome {
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns the failure details, if this outcome is `Failed`.
    #[must_use]
    pub const fn failure(&self) -> Option<&StageFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

impl fmt::Display for DeploymentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped {
                reason: SkipReason::UpToDate,
            } => write!(f, "skipped (up to date)"),
            Self::Skipped {
                reason: SkipReason::Disabled,
            } => write!(f, "skipped (disabled)"),
            Self::Succeeded {
                reason, revision, ..
            } => write!(f, "deployed {revision} ({reason})"),
            Self::Stopped => write!(f, "stopped"),
            Self::Failed(failure) => write!(f, "{failure}"),
        }
    }
}
