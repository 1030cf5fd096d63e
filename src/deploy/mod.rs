// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Deployment engine.
//!
//! ```text
//!   Vec<Application>
//!          |
//!          v
//!   Orchestrator::run ---- Semaphore(workers), lock per app
//!          |
//!   RepositorySync --> planner::decide --> ComposeController
//!          |                                 ps / pull / up
//!          v
//!      RunReport (config order)
//! ```

pub mod lock;
pub mod marker;
pub mod model;
pub mod orchestrator;
pub mod planner;
pub mod report;


pub use model::{
    Application, DeployReason, DeploymentDecision, DeploymentOutcome, SkipReason, Stage,
    StageFailure,
};
pub use orchestrator::{Orchestrator, OrchestratorSettings};
pub use report::{AppReport, RunReport, Summary};
