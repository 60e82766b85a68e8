/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Hardware health polling.
//!
//! A secondary reconciliation pass that is fully independent of the primary
//! inventory path: it raises health alerts and updates hardware metadata,
//! and never touches the capacity fields the inventory sync owns.
//!
//! Two paths exist: a direct per-BMC Redfish poll ([`redfish`]) and an
//! aggregated poll through a centralized OpenManage-style service ([`ome`]).

pub mod ome;
pub mod redfish;

use muninn_models::models::alerts::{SEVERITY_CRITICAL, SEVERITY_WARNING};

/// Normalized hardware health as reported by a BMC or aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl HealthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthState::Ok => "OK",
            HealthState::Warning => "Warning",
            HealthState::Critical => "Critical",
            HealthState::Unknown => "Unknown",
        }
    }

    /// Alert severity for a degraded state. `None` for healthy/unknown.
    pub fn alert_severity(&self) -> Option<&'static str> {
        match self {
            HealthState::Warning => Some(SEVERITY_WARNING),
            HealthState::Critical => Some(SEVERITY_CRITICAL),
            HealthState::Ok | HealthState::Unknown => None,
        }
    }
}

/// Maps a reported Redfish health enumeration onto the normalized states.
pub fn map_health(raw: &str) -> HealthState {
    match raw {
        "OK" => HealthState::Ok,
        "Warning" => HealthState::Warning,
        "Critical" => HealthState::Critical,
        _ => HealthState::Unknown,
    }
}
