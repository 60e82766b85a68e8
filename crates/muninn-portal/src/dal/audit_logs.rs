/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for AuditLog operations.
//!
//! Audit logs are immutable - only create, query and retention-cleanup
//! operations are supported.

use crate::dal::DAL;
use muninn_models::models::audit_logs::{AuditLog, NewAuditLog};
use muninn_models::schema::audit_logs;
use chrono::{Duration, Utc};
use diesel::prelude::*;

/// Data Access Layer for AuditLog operations.
pub struct AuditLogsDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl AuditLogsDAL<'_> {
    /// Creates a new audit log entry.
    pub fn create(&self, new_log: &NewAuditLog) -> Result<AuditLog, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");

        diesel::insert_into(audit_logs::table)
            .values(new_log)
            .get_result(conn)
    }

    /// Lists recent audit logs, newest first.
    pub fn list(&self, limit: i64) -> Result<Vec<AuditLog>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");

        audit_logs::table
            .order(audit_logs::created_at.desc())
            .limit(limit.clamp(1, 1000))
            .load(conn)
    }

    /// Lists recent audit logs for one target, newest first.
    pub fn get_target_history(
        &self,
        target: &str,
        limit: i64,
    ) -> Result<Vec<AuditLog>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");

        audit_logs::table
            .filter(audit_logs::target.eq(target))
            .order(audit_logs::created_at.desc())
            .limit(limit.clamp(1, 1000))
            .load(conn)
    }

    /// Deletes audit logs older than the specified retention period.
    ///
    /// # Arguments
    ///
    /// * `retention_days` - Number of days to retain logs.
    ///
    /// # Returns
    ///
    /// Returns the number of deleted rows.
    pub fn cleanup_old_logs(&self, retention_days: i64) -> Result<usize, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");

        let cutoff = Utc::now() - Duration::days(retention_days);

        diesel::delete(audit_logs::table.filter(audit_logs::created_at.lt(cutoff))).execute(conn)
    }
}
