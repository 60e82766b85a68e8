/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Background jobs for the Muninn portal.
//!
//! Each job is an interval loop that runs its work inline: a slow pass
//! delays the next tick instead of queuing a duplicate, so two passes for
//! the same cluster can never overlap.

use std::time::Duration;

use muninn_utils::logging::prelude::*;
use muninn_utils::Settings;
use tokio::time::interval;

use crate::connector::ConnectorBuilder;
use crate::dal::DAL;
use crate::hardware;
use crate::sync::{flavors, inventory};

/// Configuration for the flavor sync job.
pub struct FlavorSyncConfig {
    /// How often to sync flavor catalogs (in seconds).
    pub interval_seconds: u64,
}

impl Default for FlavorSyncConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600, // Hourly
        }
    }
}

/// Configuration for the direct Redfish poll job.
pub struct HardwarePollConfig {
    /// How often to poll BMC health (in seconds).
    pub interval_seconds: u64,
}

impl Default for HardwarePollConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 900, // 15 minutes
        }
    }
}

/// Configuration for the OME inventory sync job.
pub struct OmeSyncConfig {
    /// How often to sync from the aggregator (in seconds).
    pub interval_seconds: u64,
}

impl Default for OmeSyncConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 900, // 15 minutes
        }
    }
}

/// Configuration for audit log cleanup task.
pub struct AuditLogCleanupConfig {
    /// How often to run the cleanup (in seconds).
    pub interval_seconds: u64,
    /// Number of days to retain audit logs.
    pub retention_days: i64,
}

impl Default for AuditLogCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 86400, // Daily
            retention_days: 90,      // 90 days default
        }
    }
}

/// Starts the inventory sync loop.
///
/// The interval is re-read from the portal settings singleton after every
/// pass, so an operator change takes effect on the next cycle without a
/// restart.
pub fn start_inventory_sync_task<B>(dal: DAL, builder: B)
where
    B: ConnectorBuilder + 'static,
{
    info!("Starting inventory sync task");

    tokio::spawn(async move {
        loop {
            inventory::run_inventory_sync(&dal, &builder).await;

            let minutes = dal
                .portal_settings()
                .get_or_create()
                .map(|s| s.sync_interval_minutes.max(1) as u64)
                .unwrap_or(10);
            tokio::time::sleep(Duration::from_secs(minutes * 60)).await;
        }
    });
}

/// Starts the flavor catalog sync loop.
pub fn start_flavor_sync_task<B>(dal: DAL, builder: B, config: FlavorSyncConfig)
where
    B: ConnectorBuilder + 'static,
{
    info!(
        "Starting flavor sync task (interval: {}s)",
        config.interval_seconds
    );

    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(config.interval_seconds));

        loop {
            ticker.tick().await;
            flavors::run_flavor_sync(&dal, &builder).await;
        }
    });
}

/// Starts the direct Redfish hardware health poll loop.
pub fn start_hardware_poll_task(dal: DAL, settings: Settings, config: HardwarePollConfig) {
    info!(
        "Starting hardware health poll task (interval: {}s)",
        config.interval_seconds
    );

    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(config.interval_seconds));

        loop {
            ticker.tick().await;
            hardware::redfish::run_hardware_health_poll(&dal, &settings).await;
        }
    });
}

/// Starts the OME hardware inventory sync loop.
pub fn start_ome_sync_task(dal: DAL, settings: Settings, config: OmeSyncConfig) {
    info!(
        "Starting OME inventory sync task (interval: {}s)",
        config.interval_seconds
    );

    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(config.interval_seconds));

        loop {
            ticker.tick().await;
            hardware::ome::run_hardware_inventory_sync(&dal, &settings).await;
        }
    });
}

/// Starts the audit log cleanup background task.
///
/// This task periodically deletes old audit log entries based on
/// the configured retention policy.
pub fn start_audit_log_cleanup_task(dal: DAL, config: AuditLogCleanupConfig) {
    info!(
        "Starting audit log cleanup task (interval: {}s, retention: {}d)",
        config.interval_seconds, config.retention_days
    );

    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(config.interval_seconds));

        loop {
            ticker.tick().await;

            match dal.audit_logs().cleanup_old_logs(config.retention_days) {
                Ok(deleted) => {
                    if deleted > 0 {
                        info!(
                            "Cleaned up {} old audit logs (age > {}d)",
                            deleted, config.retention_days
                        );
                    }
                }
                Err(e) => {
                    error!("Failed to cleanup old audit logs: {:?}", e);
                }
            }
        }
    });
}

impl FlavorSyncConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            interval_seconds: settings.jobs.flavor_sync_interval_seconds,
        }
    }
}

impl HardwarePollConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            interval_seconds: settings.jobs.hardware_poll_interval_seconds,
        }
    }
}

impl OmeSyncConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            interval_seconds: settings.jobs.ome_sync_interval_seconds,
        }
    }
}

impl AuditLogCleanupConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            interval_seconds: settings.jobs.audit_cleanup_interval_seconds,
            retention_days: settings.jobs.audit_retention_days,
        }
    }
}
