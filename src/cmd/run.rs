// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Run command implementation for harbor-rs.

use crate::cli::run::RunArgs;
use crate::config::Config;
use crate::deploy::{Orchestrator, RunReport};
use crate::error::{Result, bail_out};

/// Main handler for run command.
///
/// # Errors
///
/// Returns an error if any application failed, if the report cannot be
/// serialized, or if the run was interrupted.
pub async fn run_deploy_command(args: &RunArgs, config: &Config) -> Result<()> {
    let apps = config.applications();
    if apps.is_empty() {
        tracing::warn!("No applications configured");
    }

    let orchestrator = Orchestrator::with_system_runner(config.orchestrator_settings(args.force));

    // Dropping the run kills in-flight children and releases the locks.
    let report = tokio::select! {
        report = orchestrator.run(&apps) => report,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Received Ctrl+C, interrupting run...");
            return Err(bail_out("run interrupted").into());
        }
    };

    println!("{}", format_report(&report, args.json)?);
    check_report(&report)
}

/// Renders the report as text, or as pretty JSON.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_report(report: &RunReport, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(report)?)
    } else {
        Ok(report.render())
    }
}

/// Fails if any application failed.
///
/// # Errors
///
/// Returns an error naming the number of failed applications.
pub fn check_report(report: &RunReport) -> Result<()> {
    if report.has_failures() {
        let failed = report.summary().failed;
        return Err(bail_out(format!(
            "{failed} of {} applications failed",
            report.apps().len()
        ))
        .into());
    }
    Ok(())
}
