// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!        RepositorySync (sync.rs)
//!         clone / fetch / checkout
//!               |
//!      ,--------+---------,
//!      v                  v
//!   GitQuery          ShellBackend
//!  (gix, read)     (git CLI, writes)
//!      |                  |
//!      v                  v
//!   GixBackend      ProcessRunner
//!   .is_repo         (injected)
//!   .uncommitted
//! ```
//!
//! **`GixBackend`** - pure Rust, no subprocess, read-only.
//! **`ShellBackend`** - git CLI for network access and work tree updates.

pub mod backend;
pub mod sync;
