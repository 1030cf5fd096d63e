// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Last successfully deployed revision per application.
//!
//! ```text
//! <working_root>/.<id>.deployed    "0123456789ab\n"
//!
//! Succeeded   --> record(revision)
//! Stopped     --> clear()
//! Failed/...  --> untouched (next run retries)
//! ```
//!
//! The working copy HEAD moves as soon as a sync completes, before any
//! compose stage runs; this marker only moves once `up` has succeeded.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::FsError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedRevision {
    path: PathBuf,
}

impl DeployedRevision {
    #[must_use]
    pub fn path_for(working_root: &Path, id: &str) -> PathBuf {
        working_root.join(format!(".{id}.deployed"))
    }

    #[must_use]
    pub fn new(working_root: &Path, id: &str) -> Self {
        Self {
            path: Self::path_for(working_root, id),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The recorded revision, or `None` if nothing has been deployed yet.
    ///
    /// # Errors
    ///
    /// Returns `FsError::IoError` if the marker exists but cannot be read.
    pub async fn read(&self) -> Result<Option<String>, FsError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let revision = content.trim();
                Ok((!revision.is_empty()).then(|| revision.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// Records `revision` as deployed.
    ///
    /// # Errors
    ///
    /// Returns `FsError::IoError` if the marker cannot be written.
    pub async fn record(&self, revision: &str) -> Result<(), FsError> {
        tokio::fs::write(&self.path, format!("{revision}\n"))
            .await
            .map_err(|source| self.io_error(source))
    }

    /// Forgets the recorded revision. A missing marker is not an error.
    ///
    /// # Errors
    ///
    /// Returns `FsError::IoError` if the marker exists but cannot be removed.
    pub async fn clear(&self) -> Result<(), FsError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: io::Error) -> FsError {
        FsError::IoError {
            path: self.path.display().to_string(),
            source,
        }
    }
}
