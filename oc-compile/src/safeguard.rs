//! Safe-removal planning for undeclared sessions.
//!
//! Installed neighbors whose address is no longer declared are candidates for
//! removal. Each candidate is checked against every safeguard rule whose
//! substring appears in the inspected field; the rule holds only if enough
//! matching sessions of the same address family stay up after the removal.
//!
//! Evaluation is greedy and sequential over the installed list. A candidate
//! accepted early counts as gone when later candidates are checked, so the
//! result depends on the order the device reported its neighbors in.

use std::collections::BTreeSet;
use std::net::IpAddr;

use netcfg_core::model::SafeguardRule;
use netcfg_core::InstalledNeighbor;
use serde::Serialize;
use tracing::{debug, info};

/// Outcome of removal planning, in installed order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemovalPlan {
    /// Undeclared sessions that may be removed.
    pub remove: Vec<InstalledNeighbor>,
    /// Undeclared sessions a safeguard rule protects.
    pub keep: Vec<InstalledNeighbor>,
}

/// Decide whether `candidate` may go without violating `rule`.
pub fn is_rule_respected(
    rule: &SafeguardRule,
    candidate: &InstalledNeighbor,
    installed: &[InstalledNeighbor],
    to_remove: &[InstalledNeighbor],
) -> bool {
    if !candidate.field(rule.field).contains(&rule.contains) {
        return true;
    }
    if rule.remove_down_only && candidate.is_up() {
        return false;
    }

    let survivors = installed
        .iter()
        .filter(|n| n.is_ipv6() == candidate.is_ipv6())
        .filter(|n| n.field(rule.field).contains(&rule.contains))
        .filter(|n| n.is_up())
        .filter(|n| n.remote_address != candidate.remote_address)
        .filter(|n| !to_remove.iter().any(|r| r.remote_address == n.remote_address))
        .count();
    survivors >= rule.minimum_up
}

/// True when every rule is respected. No rules means always safe.
pub fn is_safe_to_remove(
    rules: &[SafeguardRule],
    candidate: &InstalledNeighbor,
    installed: &[InstalledNeighbor],
    to_remove: &[InstalledNeighbor],
) -> bool {
    rules
        .iter()
        .all(|rule| is_rule_respected(rule, candidate, installed, to_remove))
}

/// Plan which undeclared sessions to remove.
pub fn plan_removals(
    installed: &[InstalledNeighbor],
    wanted: &BTreeSet<IpAddr>,
    rules: &[SafeguardRule],
) -> RemovalPlan {
    let mut plan = RemovalPlan::default();
    for neighbor in installed {
        if wanted.contains(&neighbor.remote_address) {
            continue;
        }
        if is_safe_to_remove(rules, neighbor, installed, &plan.remove) {
            debug!(neighbor = %neighbor.remote_address, "undeclared neighbor scheduled for removal");
            plan.remove.push(neighbor.clone());
        } else {
            info!(neighbor = %neighbor.remote_address, "undeclared neighbor kept by safeguard");
            plan.keep.push(neighbor.clone());
        }
    }
    plan
}
