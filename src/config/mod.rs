// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for harbor-rs.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. harbor.yml (cwd) or --config
//! 3. HARBOR_* env vars
//! 4. CLI overrides (--set, --working-dir, --jobs)
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! HARBOR_GLOBAL__WORKERS=4                   → global.workers = 4
//! HARBOR_GLOBAL__COMPOSE_COMMAND="docker compose"
//!                                            → global.compose_command = [docker, compose]
//! HARBOR_APPS__WEB__BRANCH=staging           → apps.web.branch = "staging"
//! ```

pub mod app;
pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::deploy::model::Application;
use crate::deploy::orchestrator::OrchestratorSettings;
use crate::error::{ConfigError, Result};

pub use app::{AppConfig, AppsConfig};
pub use loader::ConfigLoader;
pub use types::GlobalConfig;

/// Default configuration file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "harbor.yml";

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "HARBOR";

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Applications, in configured order.
    pub apps: AppsConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use harbor_rs::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_file("harbor.yml")
    ///     .with_env_prefix("HARBOR")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, cannot be parsed, or does
    /// not validate.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_file(path).build()
    }

    /// Load configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid YAML or does not validate.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_yaml_str(content).build()
    }

    /// Validate global options and every application.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            section: "global".to_string(),
            key: key.to_string(),
            message: message.to_string(),
        };

        if self.global.workers == 0 {
            return Err(invalid("workers", "must be at least 1"));
        }
        if self
            .global
            .compose_command
            .first()
            .is_none_or(|program| program.trim().is_empty())
        {
            return Err(invalid("compose_command", "must name an executable"));
        }
        if self.global.working_dir.as_os_str().is_empty() {
            return Err(invalid("working_dir", "must not be empty"));
        }

        for (id, app) in self.apps.iter() {
            app.validate(id)?;
        }
        Ok(())
    }

    /// Applications in configured order.
    #[must_use]
    pub fn applications(&self) -> Vec<Application> {
        self.apps
            .iter()
            .map(|(id, app)| app.to_application(id))
            .collect()
    }

    /// Orchestrator settings derived from the global section.
    #[must_use]
    pub fn orchestrator_settings(&self, forced: bool) -> OrchestratorSettings {
        OrchestratorSettings::builder()
            .working_root(self.global.working_dir.clone())
            .compose_command(self.global.compose_command.clone())
            .workers(self.global.workers)
            .maybe_timeout(self.global.command_timeout())
            .forced(forced)
            .build()
    }

    /// Format configuration options for display.
    ///
    /// Returns one `key = value` line per option that is set, keys sorted.
    /// Application environment values are hidden with a `[hidden]` marker.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_app_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        let global = &self.global;
        options.insert(
            "global.working_dir".into(),
            global.working_dir.display().to_string(),
        );
        options.insert("global.workers".into(), global.workers.to_string());
        if let Some(secs) = global.command_timeout_secs {
            options.insert("global.command_timeout_secs".into(), secs.to_string());
        }
        options.insert(
            "global.compose_command".into(),
            global.compose_command.join(" "),
        );
        options.insert(
            "global.output_log_level".into(),
            global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            global.file_log_level.as_u8().to_string(),
        );
        if let Some(log_file) = &global.log_file {
            options.insert("global.log_file".into(), log_file.display().to_string());
        }
        if global.log_json {
            options.insert("global.log_json".into(), "true".into());
        }
    }

    fn format_app_options(&self, options: &mut BTreeMap<String, String>) {
        for (id, app) in self.apps.iter() {
            options.insert(format!("apps.{id}.url"), app.url.clone());
            if let Some(branch) = &app.branch {
                options.insert(format!("apps.{id}.branch"), branch.clone());
            }
            options.insert(format!("apps.{id}.enabled"), app.enabled.to_string());
            options.insert(format!("apps.{id}.compose_file"), app.compose_file.clone());
            if let Some(dir) = &app.compose_dir {
                options.insert(format!("apps.{id}.compose_dir"), dir.display().to_string());
            }
            for name in app.environment.keys() {
                options.insert(format!("apps.{id}.environment.{name}"), "[hidden]".into());
            }
        }
    }
}
