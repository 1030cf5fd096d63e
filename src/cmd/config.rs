// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Config-related commands for harbor-rs.

use crate::cli::global::GlobalOptions;
use crate::config::{Config, ConfigLoader, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use crate::error::{ConfigError, Result};

/// Key whose override value is split on whitespace into a list.
const COMPOSE_COMMAND_KEY: &str = "global.compose_command";

/// Loader for the file named by `--config`, or `harbor.yml` in the current
/// directory if present, with `HARBOR_*` environment variables on top.
#[must_use]
pub fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let loader = match &global.config {
        Some(path) => ConfigLoader::new().add_file(path),
        None => ConfigLoader::new().add_file_optional(DEFAULT_CONFIG_FILE),
    };
    loader.with_env_prefix(ENV_PREFIX)
}

/// Loads and validates the configuration, applying command-line overrides.
///
/// `extra` overrides are applied after the global ones.
///
/// # Errors
///
/// Returns an error if an override is malformed or the configuration cannot
/// be loaded or validated.
pub fn load_config(global: &GlobalOptions, extra: &[String]) -> Result<Config> {
    let mut loader = build_config_loader(global);
    for raw in global.to_config_overrides().iter().chain(extra) {
        let (key, value) = parse_override(raw)?;
        loader = if key == COMPOSE_COMMAND_KEY {
            let words: Vec<String> = value.split_whitespace().map(str::to_string).collect();
            loader.set(key, words)?
        } else {
            loader.set(key, value)?
        };
    }
    loader.build()
}

/// Splits a `KEY=VALUE` override.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if there is no `=` or the key is empty.
pub fn parse_override(raw: &str) -> std::result::Result<(&str, &str), ConfigError> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| ConfigError::InvalidValue {
            section: "override".to_string(),
            key: raw.to_string(),
            message: "expected KEY=VALUE".to_string(),
        })
}

/// Display current configuration options.
pub fn run_options_command(config: &Config) {
    for line in config.format_options() {
        println!("{line}");
    }
}

/// Display loaded configuration files.
pub fn run_configs_command(config_files: &[String]) {
    if config_files.is_empty() {
        println!("No configuration files loaded");
    } else {
        for line in config_files {
            println!("{line}");
        }
    }
}
