// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |             run / list / options
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              | YAML/TOML, HARBOR_* env   |
//!              '-------------+-------------'
//!                            v
//!                    deploy::Orchestrator
//!                 lock -> sync -> decide -> compose
//!                    |                  |
//!                    v                  v
//!                   git              compose
//!              gix / git CLI    ps / pull / up / down
//!
//!   +-----------------------------------------+
//!   |  core      process runner, env          |
//!   +-----------------------------------------+
//!   |  foundation   error, logging            |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod compose;
pub mod config;
pub mod core;
pub mod deploy;
pub mod error;
pub mod git;
pub mod logging;

#[cfg(test)]
mod test_utils;
