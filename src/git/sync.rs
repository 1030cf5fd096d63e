// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Working copy synchronization.
//!
//! ```text
//! <working_root>/<id> missing?
//!   yes --> clone --> checkout pin (if any) --> HEAD    previous = None
//!   no  --> repo? --no--> NotARepository
//!            | yes
//!            v
//!          HEAD (previous) --> fetch --> resolve target
//!            target == previous --> unchanged
//!            dirty tracked files --> UncommittedChanges
//!            not a descendant of HEAD --> warn, still follow target
//!            else checkout --detach target --> changed
//! ```
//!
//! Target resolution: `origin/<pin>`, then `<pin>` (tag or commit), or
//! `origin/HEAD` when unpinned. Revisions are 12-digit abbreviated ids.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::backend::{GitQuery, GixBackend, ShellBackend};
use crate::core::process::{CommandResult, ProcessRunner};
use crate::deploy::model::Application;
use crate::error::{FsError, SyncError};

/// Directory under the working root holding working copies of disabled apps.
pub const ARCHIVE_DIR: &str = ".archive";

/// A local checkout of an application's repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingCopy {
    path: PathBuf,
    revision: String,
}

impl WorkingCopy {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Abbreviated commit id currently checked out.
    #[must_use]
    pub fn revision(&self) -> &str {
        &self.revision
    }
}

/// Result of bringing a working copy up to date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResult {
    pub working_copy: WorkingCopy,
    /// HEAD before this sync; `None` when the copy was just cloned.
    pub previous_revision: Option<String>,
    pub changed: bool,
}

/// Which half of the sync failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// Creating the working copy.
    Clone,
    /// Updating an existing working copy.
    Update,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clone => write!(f, "clone"),
            Self::Update => write!(f, "update"),
        }
    }
}

/// A failed sync, with the command result when one was produced.
#[derive(Debug, Error)]
#[error("{phase} failed: {error}")]
pub struct SyncFailure {
    pub phase: SyncPhase,
    #[source]
    pub error: SyncError,
    pub result: Option<CommandResult>,
}

impl SyncFailure {
    fn new(phase: SyncPhase, error: impl Into<SyncError>) -> Self {
        Self {
            phase,
            error: error.into(),
            result: None,
        }
    }

    fn with_result(mut self, result: CommandResult) -> Self {
        self.result = Some(result);
        self
    }
}

fn trimmed_stderr(result: &CommandResult) -> String {
    result.stderr_lossy().trim().to_string()
}

/// Clones and updates working copies under a single root.
pub struct RepositorySync<'a> {
    shell: ShellBackend<'a>,
    working_root: &'a Path,
}

impl<'a> RepositorySync<'a> {
    #[must_use]
    pub fn new(runner: &'a dyn ProcessRunner, working_root: &'a Path) -> Self {
        Self {
            shell: ShellBackend::new(runner),
            working_root,
        }
    }

    /// Path of `app`'s working copy.
    #[must_use]
    pub fn working_copy_path(&self, app: &Application) -> PathBuf {
        self.working_root.join(app.id())
    }

    /// Brings `app`'s working copy to its target revision.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncFailure`] naming the phase that failed. Remote access
    /// problems surface as `CloneFailed` or `FetchFailed`; local edits to
    /// tracked files as `UncommittedChanges`.
    pub async fn sync(&self, app: &Application) -> Result<SyncResult, SyncFailure> {
        let path = self.working_copy_path(app);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return self.clone_fresh(app, path).await;
        }
        if !GixBackend::is_git_repo(&path) {
            return Err(SyncFailure::new(
                SyncPhase::Clone,
                SyncError::NotARepository {
                    path: path.display().to_string(),
                },
            ));
        }
        self.update(app, path).await
    }

    async fn clone_fresh(&self, app: &Application, path: PathBuf) -> Result<SyncResult, SyncFailure> {
        const PHASE: SyncPhase = SyncPhase::Clone;

        info!(url = app.source(), path = %path.display(), "cloning");
        let result = self
            .shell
            .clone(app.source(), &path)
            .await
            .map_err(|e| SyncFailure::new(PHASE, e))?;
        if !result.success() {
            let error = SyncError::CloneFailed {
                url: app.source().to_string(),
                message: trimmed_stderr(&result),
            };
            return Err(SyncFailure::new(PHASE, error).with_result(result));
        }

        if let Some(pin) = app.revision_pin() {
            let target = self.resolve_target(&path, Some(pin), PHASE).await?;
            self.checkout(&path, &target, PHASE).await?;
        }

        let revision = self.head(&path, PHASE).await?;
        debug!(revision = %revision, "cloned");
        Ok(SyncResult {
            working_copy: WorkingCopy { path, revision },
            previous_revision: None,
            changed: true,
        })
    }

    /// Fetches and moves an existing working copy to its target revision.
    ///
    /// The move is a detached checkout, not a merge: when the target is not a
    /// descendant of HEAD (upstream history rewritten, or a pin moved to an
    /// older tag) the working copy still follows the target, and a warning
    /// names both revisions. Only local edits to tracked files stop an update.
    async fn update(&self, app: &Application, path: PathBuf) -> Result<SyncResult, SyncFailure> {
        const PHASE: SyncPhase = SyncPhase::Update;

        let previous = self.head(&path, PHASE).await?;

        debug!(path = %path.display(), "fetching");
        let result = self
            .shell
            .fetch(&path)
            .await
            .map_err(|e| SyncFailure::new(PHASE, e))?;
        if !result.success() {
            let error = SyncError::FetchFailed {
                path: path.display().to_string(),
                message: trimmed_stderr(&result),
            };
            return Err(SyncFailure::new(PHASE, error).with_result(result));
        }

        let target = self.resolve_target(&path, app.revision_pin(), PHASE).await?;
        if target == previous {
            debug!(revision = %previous, "already at target revision");
            return Ok(SyncResult {
                working_copy: WorkingCopy {
                    path,
                    revision: previous.clone(),
                },
                previous_revision: Some(previous),
                changed: false,
            });
        }

        let dirty = GixBackend::has_uncommitted_changes(&path)
            .map_err(|e| SyncFailure::new(PHASE, e))?;
        if dirty {
            return Err(SyncFailure::new(
                PHASE,
                SyncError::UncommittedChanges {
                    path: path.display().to_string(),
                },
            ));
        }

        let fast_forward = self
            .shell
            .is_ancestor(&path, &previous, &target)
            .await
            .map_err(|e| SyncFailure::new(PHASE, e))?;
        if !fast_forward {
            warn!(from = %previous, to = %target, "not a fast-forward, following target revision");
        }

        self.checkout(&path, &target, PHASE).await?;
        let revision = self.head(&path, PHASE).await?;
        info!(from = %previous, to = %revision, "working copy updated");
        Ok(SyncResult {
            working_copy: WorkingCopy { path, revision },
            previous_revision: Some(previous),
            changed: true,
        })
    }

    async fn resolve_target(
        &self,
        path: &Path,
        pin: Option<&str>,
        phase: SyncPhase,
    ) -> Result<String, SyncFailure> {
        let candidates = match pin {
            Some(pin) => vec![format!("refs/remotes/origin/{pin}"), pin.to_string()],
            None => vec!["refs/remotes/origin/HEAD".to_string()],
        };

        for candidate in &candidates {
            let resolved = self
                .shell
                .short_commit(path, candidate)
                .await
                .map_err(|e| SyncFailure::new(phase, e))?;
            if let Some(id) = resolved {
                return Ok(id);
            }
        }

        Err(SyncFailure::new(
            phase,
            SyncError::RevisionNotFound {
                path: path.display().to_string(),
                revision: pin.unwrap_or("origin/HEAD").to_string(),
            },
        ))
    }

    async fn checkout(&self, path: &Path, target: &str, phase: SyncPhase) -> Result<(), SyncFailure> {
        let result = self
            .shell
            .checkout_detached(path, target)
            .await
            .map_err(|e| SyncFailure::new(phase, e))?;
        if !result.success() {
            let error = SyncError::CheckoutFailed {
                what: target.to_string(),
                message: trimmed_stderr(&result),
            };
            return Err(SyncFailure::new(phase, error).with_result(result));
        }
        Ok(())
    }

    async fn head(&self, path: &Path, phase: SyncPhase) -> Result<String, SyncFailure> {
        self.shell
            .short_commit(path, "HEAD")
            .await
            .map_err(|e| SyncFailure::new(phase, e))?
            .ok_or_else(|| {
                SyncFailure::new(
                    phase,
                    SyncError::RevisionNotFound {
                        path: path.display().to_string(),
                        revision: "HEAD".to_string(),
                    },
                )
            })
    }
}

/// Moves a working copy to `<working_root>/.archive/<id>`, replacing any
/// earlier archive of the same application.
///
/// # Errors
///
/// Returns `FsError::NotFound` if there is no working copy, or an `FsError`
/// if the archive directory cannot be prepared or the rename fails.
pub async fn archive_working_copy(working_root: &Path, id: &str) -> Result<PathBuf, FsError> {
    let io_err = |path: &Path| {
        let path = path.display().to_string();
        move |source: io::Error| FsError::IoError { path, source }
    };

    let source = working_root.join(id);
    let is_dir = tokio::fs::metadata(&source)
        .await
        .is_ok_and(|meta| meta.is_dir());
    if !is_dir {
        return Err(FsError::NotFound(source.display().to_string()));
    }
    let archive_root = working_root.join(ARCHIVE_DIR);
    let dest = archive_root.join(id);

    tokio::fs::create_dir_all(&archive_root)
        .await
        .map_err(io_err(&archive_root))?;
    match tokio::fs::remove_dir_all(&dest).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(io_err(&dest)(e)),
    }
    tokio::fs::rename(&source, &dest)
        .await
        .map_err(io_err(&source))?;
    Ok(dest)
}
