// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-run orchestration.
//!
//! ```text
//!  Pending --lock--> Syncing --> Deciding --NoAction--> Skipped(UpToDate)
//!                       |     (previous = last deployed revision)
//!                       |           |
//!                       |         Deploy
//!                       |           v
//!                       |        Pulling  (ps, pull) --fail--> Failed(Pull)
//!                       |           v
//!                       |       UpBringing (up)      --fail--> Failed(Up)
//!                       |           v
//!                       |        Succeeded --> record deployed revision
//!                       +--fail--> Failed(Clone|Fetch)
//!
//!  disabled: Stopping (down, archive) --> Stopped | Failed(Down)
//!            no working copy          --> Skipped(Disabled)
//! ```
//!
//! Applications are admitted through a semaphore of `workers` permits and
//! the report keeps configured order whatever the completion order.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bon::Builder;
use futures_util::future::join_all;
use tokio::sync::Semaphore;
use tracing::{Instrument, debug, info, info_span, warn};

use super::lock::WorkingCopyLock;
use super::marker::DeployedRevision;
use super::model::{
    Application, DeploymentDecision, DeploymentOutcome, SkipReason, Stage, StageFailure,
};
use super::planner::decide;
use super::report::{AppReport, RunReport};
use crate::compose::{ComposeController, DEFAULT_COMPOSE_COMMAND};
use crate::core::process::{CommandResult, ProcessRunner, SystemRunner};
use crate::error::ProcessError;
use crate::git::sync::{RepositorySync, SyncFailure, SyncPhase, archive_working_copy};

/// Everything a run needs besides the application list.
#[derive(Debug, Clone, Builder)]
pub struct OrchestratorSettings {
    /// Directory holding one working copy per application.
    #[builder(into)]
    working_root: PathBuf,
    /// Compose executable and leading arguments, e.g. `["docker", "compose"]`.
    #[builder(default = vec![DEFAULT_COMPOSE_COMMAND.to_string()])]
    compose_command: Vec<String>,
    /// Maximum number of applications processed at once.
    #[builder(default = 1)]
    workers: usize,
    /// Kill any single git or compose command running longer than this.
    timeout: Option<Duration>,
    /// Redeploy every enabled application regardless of revisions.
    #[builder(default)]
    forced: bool,
}

impl OrchestratorSettings {
    #[must_use]
    pub const fn working_root(&self) -> &PathBuf {
        &self.working_root
    }

    #[must_use]
    pub fn compose_command(&self) -> &[String] {
        &self.compose_command
    }

    #[must_use]
    pub const fn workers(&self) -> usize {
        self.workers
    }

    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    #[must_use]
    pub const fn forced(&self) -> bool {
        self.forced
    }
}

/// Runs the per-application pipeline over a list of applications.
pub struct Orchestrator {
    runner: Arc<dyn ProcessRunner>,
    settings: OrchestratorSettings,
}

impl Orchestrator {
    #[must_use]
    pub fn new(runner: Arc<dyn ProcessRunner>, settings: OrchestratorSettings) -> Self {
        Self { runner, settings }
    }

    /// Orchestrator backed by real processes, honoring the settings' timeout.
    #[must_use]
    pub fn with_system_runner(settings: OrchestratorSettings) -> Self {
        let runner = SystemRunner::new().with_timeout(settings.timeout());
        Self::new(Arc::new(runner), settings)
    }

    #[must_use]
    pub const fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Processes every application and returns one outcome per application,
    /// in the order given.
    pub async fn run(&self, apps: &[Application]) -> RunReport {
        let root = &self.settings.working_root;
        if let Err(e) = tokio::fs::create_dir_all(root).await {
            warn!(path = %root.display(), error = %e, "cannot create working root");
            let failure = StageFailure::from_error(Stage::Clone, &e);
            return RunReport::new(
                apps.iter()
                    .map(|app| AppReport {
                        app: app.id().to_string(),
                        outcome: DeploymentOutcome::Failed(failure.clone()),
                    })
                    .collect(),
            );
        }

        let semaphore = Semaphore::new(self.settings.workers.max(1));
        let pending = apps.iter().map(|app| {
            let semaphore = &semaphore;
            async move {
                let _permit = semaphore.acquire().await.ok();
                let span = info_span!("app", id = app.id());
                let outcome = self.process(app).instrument(span).await;
                AppReport {
                    app: app.id().to_string(),
                    outcome,
                }
            }
        });

        let report = RunReport::new(join_all(pending).await);
        let summary = report.summary();
        info!(
            succeeded = summary.succeeded,
            skipped = summary.skipped,
            stopped = summary.stopped,
            failed = summary.failed,
            "run complete"
        );
        report
    }

    async fn process(&self, app: &Application) -> DeploymentOutcome {
        let lock_stage = if app.enabled() { Stage::Clone } else { Stage::Down };
        let _lock =
            match WorkingCopyLock::acquire_async(&self.settings.working_root, app.id()).await {
                Ok(lock) => lock,
                Err(e) => {
                    warn!(error = %e, "cannot lock working copy");
                    return DeploymentOutcome::Failed(StageFailure::from_error(lock_stage, &e));
                }
            };

        let outcome = if app.enabled() {
            self.deploy(app).await
        } else {
            self.retire(app).await
        };

        match &outcome {
            DeploymentOutcome::Failed(failure) => warn!(
                stage = %failure.stage(),
                exit_code = failure.exit_code(),
                "{}",
                failure.message()
            ),
            other => info!("{other}"),
        }
        outcome
    }

    async fn deploy(&self, app: &Application) -> DeploymentOutcome {
        let marker = DeployedRevision::new(&self.settings.working_root, app.id());
        let deployed = marker.read().await.unwrap_or_else(|e| {
            warn!(error = %e, "cannot read deployed revision, treating as never deployed");
            None
        });

        debug!(state = "syncing");
        let repo_sync = RepositorySync::new(self.runner.as_ref(), &self.settings.working_root);
        let synced = match repo_sync.sync(app).await {
            Ok(synced) => synced,
            Err(failure) => return DeploymentOutcome::Failed(sync_stage_failure(failure)),
        };

        // A fresh clone is always a new checkout, whatever an old marker says.
        let previous = synced.previous_revision.as_ref().and(deployed);
        debug!(
            state = "deciding",
            revision = synced.working_copy.revision(),
            deployed = previous.as_deref()
        );
        let decision = decide(
            previous.as_deref(),
            synced.working_copy.revision(),
            self.settings.forced,
        );
        let DeploymentDecision::Deploy(reason) = decision else {
            return DeploymentOutcome::Skipped {
                reason: SkipReason::UpToDate,
            };
        };

        debug!(state = "pulling", reason = %reason);
        let compose = ComposeController::new(
            self.runner.as_ref(),
            &self.settings.compose_command,
            app,
            synced.working_copy.path(),
        );
        let previously_running = match compose.query_running_services().await {
            Ok(services) => services,
            Err(e) => {
                warn!(stage = %Stage::QueryRunning, error = %e, "could not list running services");
                BTreeSet::new()
            }
        };
        if previously_running.is_empty() {
            info!(reason = %reason, "deploying");
        } else {
            info!(
                reason = %reason,
                running = previously_running.len(),
                "redeploying"
            );
        }

        if let Err(failure) = command_stage(Stage::Pull, compose.pull_images().await) {
            return DeploymentOutcome::Failed(failure);
        }

        debug!(state = "up_bringing");
        if let Err(failure) = command_stage(Stage::Up, compose.up_stack(true).await) {
            return DeploymentOutcome::Failed(failure);
        }

        if let Err(e) = marker.record(synced.working_copy.revision()).await {
            warn!(error = %e, "cannot record deployed revision, next run redeploys");
        }
        DeploymentOutcome::Succeeded {
            reason,
            revision: synced.working_copy.revision().to_string(),
            previously_running,
        }
    }

    async fn retire(&self, app: &Application) -> DeploymentOutcome {
        let path = self.settings.working_root.join(app.id());
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return DeploymentOutcome::Skipped {
                reason: SkipReason::Disabled,
            };
        }

        debug!(state = "stopping");
        let compose = ComposeController::new(
            self.runner.as_ref(),
            &self.settings.compose_command,
            app,
            &path,
        );
        if let Err(failure) = command_stage(Stage::Down, compose.down_stack().await) {
            return DeploymentOutcome::Failed(failure);
        }

        let archived = archive_working_copy(&self.settings.working_root, app.id()).await;
        match archived {
            Ok(dest) => debug!(archive = %dest.display(), "working copy archived"),
            Err(e) => return DeploymentOutcome::Failed(StageFailure::from_error(Stage::Down, &e)),
        }
        let marker = DeployedRevision::new(&self.settings.working_root, app.id());
        if let Err(e) = marker.clear().await {
            warn!(error = %e, "cannot clear deployed revision");
        }
        DeploymentOutcome::Stopped
    }
}

/// Non-zero exit or launch failure of a compose command ends the pipeline.
fn command_stage(
    stage: Stage,
    result: Result<CommandResult, ProcessError>,
) -> Result<CommandResult, StageFailure> {
    match result {
        Ok(result) if result.success() => Ok(result),
        Ok(result) => Err(StageFailure::from_result(stage, result)),
        Err(e) => Err(StageFailure::from_error(stage, &e)),
    }
}

fn sync_stage_failure(failure: SyncFailure) -> StageFailure {
    let stage = match failure.phase {
        SyncPhase::Clone => Stage::Clone,
        SyncPhase::Update => Stage::Fetch,
    };
    StageFailure::from_error(stage, &failure.error).with_result(failure.result)
}
