// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!              HarborError (~24 bytes)
//!                     |
//!   +------+------+---+---+------+
//!   |      |      |       |      |
//!   v      v      v       v      v
//! Bail  Process  Sync  Compose  Cfg   Fs
//! Box<str> Box   Box     Box    Box   Box
//!
//! Sub-errors (unboxed internally):
//!   Process  ExecutableNotFound, SpawnFailed, InvalidWorkingDir, Timeout
//!   Sync     CloneFailed, FetchFailed, RevisionNotFound, CheckoutFailed,
//!            UncommittedChanges, NotARepository, Launch, Lock, Gix
//!   Compose  QueryFailed, Launch
//!   Config   ParseError, MissingKey, InvalidValue
//!   Fs       NotFound, IoError
//! ```
//!
//! A non-zero exit code is never an error at this level. It is carried by
//! [`CommandResult`](crate::core::process::CommandResult) and interpreted by
//! the caller.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`HarborError`].
pub type HarborResult<T> = std::result::Result<T, HarborError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum HarborError {
    /// Fatal error that should terminate the application.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// External process could not be run.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Repository synchronization failed.
    #[error("sync error: {0}")]
    Sync(#[from] Box<SyncError>),

    /// Compose invocation failed.
    #[error("compose error: {0}")]
    Compose(#[from] Box<ComposeError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

}

/// Create a fatal [`HarborError::Bailed`] that terminates the application.
pub fn bail_out(message: impl Into<String>) -> HarborError {
    HarborError::Bailed(message.into().into_boxed_str())
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for HarborError {
                fn from(err: $error) -> Self {
                    HarborError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ProcessError => Process,
    SyncError => Sync,
    ComposeError => Compose,
    ConfigError => Config,
    FsError => Fs,
}

// --- Process Errors ---

/// Failures to run an external process.
///
/// These are launch-level faults. An exit code, zero or not, is a normal
/// result and never produces one of these.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// The requested working directory does not exist or is not a directory.
    #[error("invalid working directory '{path}' for '{command}'")]
    InvalidWorkingDir { command: String, path: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed while waiting on or reading from the process.
    #[error("failed to collect output from process '{command}': {message}")]
    OutputError { command: String, message: String },

    /// Process timed out and was killed.
    #[error("process '{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
///
/// Large error types are boxed to keep enum size manageable.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to open repository.
    #[error("failed to open repository: {0}")]
    Open(#[from] Box<gix::open::Error>),

    /// Failed to compute repository status.
    #[error("failed to compute status: {0}")]
    Status(String),

    /// Repository has no worktree (bare repository).
    #[error("repository has no worktree (bare repository)")]
    BareRepository,
}

// --- Sync Errors ---

/// Repository synchronization errors.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Clone operation failed.
    #[error("failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },

    /// Fetch from the remote failed (unreachable remote, auth failure, ...).
    #[error("failed to fetch {path}: {message}")]
    FetchFailed { path: String, message: String },

    /// The target revision could not be resolved.
    #[error("revision '{revision}' not found in {path}")]
    RevisionNotFound { path: String, revision: String },

    /// Checkout operation failed.
    #[error("failed to checkout {what}: {message}")]
    CheckoutFailed { what: String, message: String },

    /// Tracked files were modified locally and would be clobbered.
    #[error("uncommitted changes in {path}")]
    UncommittedChanges { path: String },

    /// A directory exists where the working copy should be, but it is not a repository.
    #[error("{path} exists but is not a git repository")]
    NotARepository { path: String },

    /// Git could not be launched.
    #[error(transparent)]
    Launch(#[from] ProcessError),

    /// The working copy lock could not be acquired.
    #[error("failed to lock working copy {path}: {source}")]
    Lock {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error from the gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),
}

// --- Compose Errors ---

/// Compose invocation errors that are not tied to a single stage result.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// Listing running services exited non-zero.
    #[error("'{command}' exited with code {exit_code}: {stderr}")]
    QueryFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// The compose tool could not be launched.
    #[error(transparent)]
    Launch(#[from] ProcessError),
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path not found.
    #[error("path not found: {0}")]
    NotFound(String),

    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
