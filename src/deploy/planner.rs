// harbor-rs: Compose Deployment Orchestrator
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Deployment decision.
//!
//! ```text
//! forced            --> Deploy(ForcedByCaller)
//! previous == None  --> Deploy(NewCheckout)
//! previous != new   --> Deploy(RevisionChanged)
//! otherwise         --> NoAction
//! ```

use super::model::{DeployReason, DeploymentDecision};

/// Decides whether an application must be redeployed.
///
/// `previous` is the revision before this run's sync, `None` for a fresh
/// clone. Pure; performs no I/O.
#[must_use]
pub fn decide(previous: Option<&str>, new: &str, forced: bool) -> DeploymentDecision {
    if forced {
        return DeploymentDecision::Deploy(DeployReason::ForcedByCaller);
    }
    match previous {
        None => DeploymentDecision::Deploy(DeployReason::NewCheckout),
        Some(previous) if previous != new => {
            DeploymentDecision::Deploy(DeployReason::RevisionChanged)
        }
        Some(_) => DeploymentDecision::NoAction,
    }
}
