// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments for the `run` and `list` commands.

use clap::Args;

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Redeploys every enabled application, even when its revision is unchanged.
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Number of applications processed at once, overrides global.workers.
    #[arg(short = 'j', long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: Option<u16>,

    /// Prints the run report as JSON instead of one line per application.
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Converts run arguments to configuration overrides.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<String> {
        self.jobs
            .map(|jobs| format!("global.workers={jobs}"))
            .into_iter()
            .collect()
    }
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Shows only enabled applications.
    #[arg(short = 'e', long)]
    pub enabled: bool,
}
