// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! List command implementation for harbor-rs.

use crate::cli::run::ListArgs;
use crate::config::Config;

/// Main handler for list command.
pub fn run_list_command(args: &ListArgs, config: &Config) {
    let lines = format_app_list(config, args.enabled);
    if lines.is_empty() {
        println!("No applications configured");
    } else {
        for line in &lines {
            println!("{line}");
        }
    }
}

/// One line per application in configured order: id, source, pin and state.
#[must_use]
pub fn format_app_list(config: &Config, enabled_only: bool) -> Vec<String> {
    let apps: Vec<_> = config
        .apps
        .iter()
        .filter(|(_, app)| app.enabled || !enabled_only)
        .collect();
    let width = apps.iter().map(|(id, _)| id.len()).max().unwrap_or(0);

    apps.into_iter()
        .map(|(id, app)| {
            let mut line = format!("{id:<width$}  {}", app.url);
            if let Some(branch) = &app.branch {
                line.push_str(" @ ");
                line.push_str(branch);
            }
            if !app.enabled {
                line.push_str(" (disabled)");
            }
            line
        })
        .collect()
}
