// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Run report: one outcome per configured application, in config order.

use serde::Serialize;

use super::model::DeploymentOutcome;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppReport {
    pub app: String,
    #[serde(flatten)]
    pub outcome: DeploymentOutcome,
}

/// Outcome counts for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub succeeded: usize,
    pub skipped: usize,
    pub stopped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    apps: Vec<AppReport>,
}

impl RunReport {
    #[must_use]
    pub const fn new(apps: Vec<AppReport>) -> Self {
        Self { apps }
    }

    #[must_use]
    pub fn apps(&self) -> &[AppReport] {
        &self.apps
    }

    /// Looks up the outcome for application `id`.
    #[must_use]
    pub fn outcome(&self, id: &str) -> Option<&DeploymentOutcome> {
        self.apps
            .iter()
            .find(|entry| entry.app == id)
            .map(|entry| &entry.outcome)
    }

    /// `true` if any application failed; drives the process exit status.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.apps.iter().any(|entry| entry.outcome.is_failed())
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        self.apps
            .iter()
            .fold(Summary::default(), |mut summary, entry| {
                match entry.outcome {
                    DeploymentOutcome::Succeeded { .. } => summary.succeeded += 1,
                    DeploymentOutcome::Skipped { .. } => summary.skipped += 1,
                    DeploymentOutcome::Stopped => summary.stopped += 1,
                    DeploymentOutcome::Failed(_) => summary.failed += 1,
                }
                summary
            })
    }

    /// Human-readable lines: one per application, then the totals.
    #[must_use]
    pub fn render(&self) -> String {
        use std::fmt::Write;

        let width = self
            .apps
            .iter()
            .map(|entry| entry.app.len())
            .max()
            .unwrap_or(0);
        let mut out = String::new();
        for entry in &self.apps {
            let _ = writeln!(out, "{:<width$}  {}", entry.app, entry.outcome);
        }
        let summary = self.summary();
        let _ = write!(
            out,
            "{} deployed, {} skipped, {} stopped, {} failed",
            summary.succeeded, summary.skipped, summary.stopped, summary.failed
        );
        out
    }
}
