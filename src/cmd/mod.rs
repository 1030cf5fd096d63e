// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> config::load_config --> cmd::run_* handlers
//!   run, list, options, configs
//! ```

pub mod config;
pub mod list;
pub mod run;

#[cfg(test)]
mod tests;
