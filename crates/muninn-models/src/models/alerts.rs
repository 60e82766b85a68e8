/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Alert models for cluster and host health conditions.
//!
//! An alert targets either a cluster or a physical host (by convention never
//! both). Alerts are raised by the reconciliation engine and the hardware
//! pollers and are only deactivated by explicit operator action.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Constants
// =============================================================================

pub const SEVERITY_INFO: &str = "info";
pub const SEVERITY_WARNING: &str = "warning";
pub const SEVERITY_CRITICAL: &str = "critical";

pub const VALID_SEVERITIES: &[&str] = &[SEVERITY_INFO, SEVERITY_WARNING, SEVERITY_CRITICAL];

/// Alert source for the direct Redfish health poller.
pub const SOURCE_REDFISH: &str = "Redfish";
/// Alert source for the OpenManage aggregator.
pub const SOURCE_OPENMANAGE: &str = "OpenManage";

// =============================================================================
// Alert Models
// =============================================================================

#[derive(Queryable, Selectable, Identifiable, AsChangeset, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::alerts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Alert {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub source: String,
    pub target_host_id: Option<Uuid>,
    pub target_cluster_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub severity: String,
    pub is_active: bool,
    pub snoozed_until: Option<DateTime<Utc>>,
}

#[derive(Insertable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::alerts)]
pub struct NewAlert {
    pub source: String,
    pub target_host_id: Option<Uuid>,
    pub target_cluster_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub severity: String,
    pub is_active: bool,
}

impl NewAlert {
    /// Creates a new alert targeting a physical host.
    pub fn for_host(
        source: &str,
        host_id: Uuid,
        title: &str,
        description: &str,
        severity: &str,
    ) -> Result<Self, String> {
        Self::build(source, Some(host_id), None, title, description, severity)
    }

    /// Creates a new alert targeting a cluster.
    pub fn for_cluster(
        source: &str,
        cluster_id: Uuid,
        title: &str,
        description: &str,
        severity: &str,
    ) -> Result<Self, String> {
        Self::build(source, None, Some(cluster_id), title, description, severity)
    }

    fn build(
        source: &str,
        target_host_id: Option<Uuid>,
        target_cluster_id: Option<Uuid>,
        title: &str,
        description: &str,
        severity: &str,
    ) -> Result<Self, String> {
        if !VALID_SEVERITIES.contains(&severity) {
            return Err(format!(
                "Invalid severity '{}'. Must be one of: {:?}",
                severity, VALID_SEVERITIES
            ));
        }
        if title.trim().is_empty() {
            return Err("Title cannot be empty".to_string());
        }

        Ok(Self {
            source: source.to_string(),
            target_host_id,
            target_cluster_id,
            title: title.to_string(),
            description: description.to_string(),
            severity: severity.to_string(),
            is_active: true,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
