// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Variable names as the host OS compares them.
//!
//! ```text
//! "Path" on windows  -> folded "path"   (PATH, Path, path collide)
//! "Path" elsewhere   -> folded "Path"   (distinct from PATH)
//! ```

use std::cmp::Ordering;

/// A variable name that remembers its spelling but compares by its folded form.
///
/// An application's `environment:` block overlays the captured process
/// environment, so `Path: ...` in a config must replace `PATH` on Windows.
#[derive(Debug, Clone)]
pub(super) struct EnvKey {
    folded: String,
    name: String,
}

impl EnvKey {
    pub(super) fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            folded: fold(&name),
            name,
        }
    }

    pub(super) fn as_str(&self) -> &str {
        &self.name
    }
}

#[cfg(windows)]
fn fold(name: &str) -> String {
    name.to_ascii_lowercase()
}

#[cfg(not(windows))]
fn fold(name: &str) -> String {
    name.to_owned()
}

impl PartialEq for EnvKey {
    fn eq(&self, other: &Self) -> bool {
        self.folded == other.folded
    }
}

impl Eq for EnvKey {}

impl PartialOrd for EnvKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EnvKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded.cmp(&other.folded)
    }
}
