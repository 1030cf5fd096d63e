// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Advisory per-application lock.
//!
//! `<working_root>/.<id>.lock` is held exclusively for the whole pipeline of
//! one application, so two orchestrator processes never touch the same
//! working copy at once. Released on drop.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::SyncError;

#[derive(Debug)]
pub struct WorkingCopyLock {
    file: File,
    path: PathBuf,
}

impl WorkingCopyLock {
    #[must_use]
    pub fn path_for(working_root: &Path, id: &str) -> PathBuf {
        working_root.join(format!(".{id}.lock"))
    }

    /// Blocks until the lock for `id` is held.
    ///
    /// Call from a blocking context.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Lock` if the lock file cannot be opened or locked.
    pub fn acquire(working_root: &Path, id: &str) -> Result<Self, SyncError> {
        let path = Self::path_for(working_root, id);
        let lock_err = |source| SyncError::Lock {
            path: path.display().to_string(),
            source,
        };

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(lock_err)?;
        FileExt::lock_exclusive(&file).map_err(lock_err)?;
        Ok(Self { file, path })
    }

    /// Acquires the lock without blocking the async runtime.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Lock` if locking fails or the blocking task panics.
    pub async fn acquire_async(working_root: &Path, id: &str) -> Result<Self, SyncError> {
        let root = working_root.to_path_buf();
        let owned_id = id.to_string();
        let path = Self::path_for(working_root, id);
        tokio::task::spawn_blocking(move || Self::acquire(&root, &owned_id))
            .await
            .map_err(|e| SyncError::Lock {
                path: path.display().to_string(),
                source: std::io::Error::other(e.to_string()),
            })?
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkingCopyLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
