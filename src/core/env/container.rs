// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The environment handed to git and compose children.
//!
//! ```text
//! current_env() ──► Env (shared Arc)
//!                    │ overlay(app.environment)
//!                    ▼
//!                  Env (own copy, overrides applied)
//! ```

use super::types::EnvKey;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Environment variables with copy-on-write storage.
///
/// The runner keeps one captured snapshot for the whole run; every command
/// clones it, and only commands that carry application overrides pay for a
/// private copy.
#[derive(Debug, Clone, Default)]
pub struct Env {
    vars: Arc<BTreeMap<EnvKey, String>>,
}

impl Env {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_map(vars: BTreeMap<String, String>) -> Self {
        vars.into_iter().collect()
    }

    /// Inserts or replaces `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        Arc::make_mut(&mut self.vars).insert(EnvKey::new(key), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(&EnvKey::new(key)).map(String::as_str)
    }

    /// This environment with `overrides` applied; an override replaces a
    /// captured variable of the same name. `self` is left untouched.
    #[must_use]
    pub fn overlay<'a, I>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut overrides = overrides.into_iter().peekable();
        if overrides.peek().is_none() {
            return self.clone();
        }

        let mut vars = (*self.vars).clone();
        for (key, value) in overrides {
            vars.insert(EnvKey::new(key.as_str()), value.clone());
        }
        Self {
            vars: Arc::new(vars),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }
}

impl FromIterator<(String, String)> for Env {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            vars: Arc::new(iter.into_iter().map(|(k, v)| (EnvKey::new(k), v)).collect()),
        }
    }
}
