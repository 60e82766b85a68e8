/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Audit log models for tracking sync outcomes and operator actions.
//!
//! Audit logs are immutable, append-only records. The reconciliation engine
//! and the hardware pollers write one entry per job outcome; nothing in this
//! crate ever mutates or deletes an entry once written.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Constants
// =============================================================================

// Action constants - Inventory
pub const ACTION_INVENTORY_SYNC_SUCCESS: &str = "inventory.sync_success";
pub const ACTION_INVENTORY_SYNC_FAILED: &str = "inventory.sync_failed";

// Action constants - Flavors
pub const ACTION_FLAVOR_SYNC_SUCCESS: &str = "flavor.sync_success";
pub const ACTION_FLAVOR_SYNC_FAILED: &str = "flavor.sync_failed";

// Action constants - Hardware
pub const ACTION_HARDWARE_ISSUE_DETECTED: &str = "hardware.issue_detected";
pub const ACTION_OME_SYNC_SUCCESS: &str = "ome.sync_success";
pub const ACTION_OME_SYNC_FAILED: &str = "ome.sync_failed";

// Action constants - Operator
pub const ACTION_HOST_EVACUATED: &str = "host.evacuated";

// =============================================================================
// Audit Log Models
// =============================================================================

/// An audit log record from the database.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::audit_logs)]
pub struct AuditLog {
    /// Unique identifier for the log entry.
    pub id: Uuid,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// The action performed (e.g., "inventory.sync_success").
    pub action: String,
    /// The affected target (cluster name, hostname, ...).
    pub target: String,
    /// Free-form details.
    pub details: Option<String>,
}

/// A new audit log entry to be inserted.
#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::audit_logs)]
pub struct NewAuditLog {
    pub action: String,
    pub target: String,
    pub details: Option<String>,
}

impl NewAuditLog {
    /// Creates a new audit log entry.
    ///
    /// # Arguments
    /// * `action` - The action performed.
    /// * `target` - The affected target (cluster name, hostname, ...).
    pub fn new(action: &str, target: &str) -> Result<Self, String> {
        if action.trim().is_empty() {
            return Err("Action cannot be empty".to_string());
        }
        if target.trim().is_empty() {
            return Err("Target cannot be empty".to_string());
        }

        Ok(Self {
            action: action.to_string(),
            target: target.to_string(),
            details: None,
        })
    }

    /// Adds details to the audit log entry.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

// =============================================================================
// Tests
// =============================================================================
