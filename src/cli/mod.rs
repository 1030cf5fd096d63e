// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for harbor-rs using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! harbor [global options] <command>
//! run [--force] [--jobs N] [--json]
//! list
//! options
//! configs
//! version
//! ```

pub mod global;
pub mod run;


use crate::cli::global::GlobalOptions;
use crate::cli::run::{ListArgs, RunArgs};
use clap::{Parser, Subcommand};

/// Compose Deployment Orchestrator
///
/// Keeps a set of git-hosted docker-compose applications deployed.
#[derive(Debug, Parser)]
#[command(
    name = "harbor",
    author,
    version,
    about = "Compose Deployment Orchestrator",
    long_about = "harbor-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Keeps a set of git-hosted docker-compose applications deployed.\n\n\
                  `harbor run` clones or updates every configured application and\n\
                  redeploys the ones whose revision changed. See\n\
                  `harbor <command> --help` for more information about a command.",
    after_help = "CONFIGURATION:\n\n\
                  By default, harbor reads `harbor.yml` from the current directory\n\
                  if it exists. Use --config to name another file (.yml, .yaml or\n\
                  .toml). HARBOR_* environment variables override the file, e.g.\n\
                  HARBOR_GLOBAL__WORKERS=4 or HARBOR_APPS__WEB__BRANCH=staging.\n\
                  --set and the other command-line flags override everything."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their effective values.
    Options,

    /// Lists the configuration files used by harbor.
    Configs,

    /// Syncs every application and redeploys the ones that changed.
    Run(RunArgs),

    /// Lists configured applications.
    List(ListArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
