// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Application table.
//!
//! ```text
//! apps:
//!   <id>:                 order of appearance is preserved
//!     url                 required
//!     branch              optional branch, tag or commit
//!     enabled             true
//!     compose_file        docker-compose.yml
//!     compose_dir         optional, relative to the repository
//!     environment         { NAME: value }
//! ```

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::deploy::model::{Application, DEFAULT_COMPOSE_FILE};
use crate::error::ConfigError;

/// One entry under `apps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Clone URL or local path.
    pub url: String,
    /// Revision pin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub enabled: bool,
    pub compose_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compose_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            branch: None,
            enabled: true,
            compose_file: DEFAULT_COMPOSE_FILE.to_string(),
            compose_dir: None,
            environment: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Checks this entry in isolation.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the offending key.
    pub fn validate(&self, id: &str) -> Result<(), ConfigError> {
        let section = format!("apps.{id}");
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            section: section.clone(),
            key: key.to_string(),
            message: message.to_string(),
        };

        validate_id(id)?;
        if self.url.trim().is_empty() {
            return Err(ConfigError::MissingKey {
                section: section.clone(),
                key: "url".to_string(),
            });
        }
        if self.compose_file.trim().is_empty() {
            return Err(invalid("compose_file", "must not be empty"));
        }
        if let Some(dir) = &self.compose_dir
            && !is_contained(dir)
        {
            return Err(invalid(
                "compose_dir",
                "must be a relative path inside the repository",
            ));
        }
        Ok(())
    }

    /// Converts to the runtime model.
    #[must_use]
    pub fn to_application(&self, id: &str) -> Application {
        Application::builder()
            .id(id)
            .source(self.url.trim())
            .maybe_revision_pin(self.branch.clone().filter(|pin| !pin.is_empty()))
            .environment(self.environment.clone())
            .maybe_compose_dir(self.compose_dir.clone())
            .compose_file(self.compose_file.clone())
            .enabled(self.enabled)
            .build()
    }
}

fn validate_id(id: &str) -> Result<(), ConfigError> {
    let message = if id.is_empty() {
        Some("identifier must not be empty")
    } else if id.contains(['/', '\\']) {
        Some("identifier must not contain path separators")
    } else if id.starts_with('.') {
        Some("identifier must not start with '.'")
    } else {
        None
    };
    message.map_or(Ok(()), |message| {
        Err(ConfigError::InvalidValue {
            section: "apps".to_string(),
            key: id.to_string(),
            message: message.to_string(),
        })
    })
}

fn is_contained(dir: &Path) -> bool {
    dir.components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

/// Applications in configured order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppsConfig(Vec<(String, AppConfig)>);

impl AppsConfig {
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AppConfig)> {
        self.0.iter().map(|(id, app)| (id.as_str(), app))
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&AppConfig> {
        self.iter().find(|(key, _)| *key == id).map(|(_, app)| app)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, AppConfig)> for AppsConfig {
    fn from_iter<I: IntoIterator<Item = (String, AppConfig)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for AppsConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, app) in &self.0 {
            map.serialize_entry(id, app)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AppsConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AppsVisitor;

        impl<'de> Visitor<'de> for AppsVisitor {
            type Value = AppsConfig;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of application id to settings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<AppsConfig, A::Error> {
                let mut apps: Vec<(String, AppConfig)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((id, app)) = access.next_entry::<String, AppConfig>()? {
                    if apps.iter().any(|(seen, _)| *seen == id) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate application '{id}'"
                        )));
                    }
                    apps.push((id, app));
                }
                Ok(AppsConfig(apps))
            }
        }

        deserializer.deserialize_map(AppsVisitor)
    }
}
