/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Operator actions against live clusters.
//!
//! Thin connector-consuming operations the web layer invokes on demand:
//! console access, host evacuation and explicit utilization refresh. These
//! never run on a schedule; a not-found failure surfaces to the caller
//! without mutating inventory state.

use muninn_models::models::audit_logs::ACTION_HOST_EVACUATED;
use muninn_models::models::clusters::Cluster;
use muninn_models::models::instances::Instance;
use muninn_models::models::NewAuditLog;
use muninn_utils::logging::prelude::*;
use thiserror::Error;
use uuid::Uuid;

use crate::connector::{ClusterConnector, ConnectorBuilder, ConnectorError, ConsoleKind};
use crate::dal::DAL;

#[derive(Debug, Error)]
pub enum OpsError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("connector failure: {0}")]
    Connector(#[from] ConnectorError),
    #[error("database failure: {0}")]
    Database(#[from] diesel::result::Error),
}

/// Resolves the cluster an instance lives in, through its host row.
fn cluster_of_instance(dal: &DAL, instance: &Instance) -> Result<Cluster, OpsError> {
    let host_id = instance
        .host_id
        .ok_or_else(|| OpsError::NotFound(format!("instance {} has no host", instance.id)))?;
    let host = dal
        .physical_hosts()
        .get(host_id)?
        .ok_or_else(|| OpsError::NotFound(format!("host {} not found", host_id)))?;
    let cluster = dal
        .clusters()
        .get(host.cluster_id)?
        .ok_or_else(|| OpsError::NotFound(format!("cluster {} not found", host.cluster_id)))?;
    Ok(cluster)
}

/// Fetches a remote console URL for an instance.
pub async fn instance_console_url<B: ConnectorBuilder>(
    dal: &DAL,
    builder: &B,
    instance_id: Uuid,
    kind: ConsoleKind,
) -> Result<String, OpsError> {
    let instance = dal
        .instances()
        .get(instance_id)?
        .ok_or_else(|| OpsError::NotFound(format!("instance {} not found", instance_id)))?;
    let cluster = cluster_of_instance(dal, &instance)?;

    let connector = builder.open(&cluster).await?;
    Ok(connector.console_url(instance_id, kind).await?)
}

/// Live-migrates every instance off a host. Returns the number of migration
/// requests issued; the audit log records the action.
pub async fn evacuate_host<B: ConnectorBuilder>(
    dal: &DAL,
    builder: &B,
    host_id: Uuid,
) -> Result<usize, OpsError> {
    let host = dal
        .physical_hosts()
        .get(host_id)?
        .ok_or_else(|| OpsError::NotFound(format!("host {} not found", host_id)))?;
    let cluster = dal
        .clusters()
        .get(host.cluster_id)?
        .ok_or_else(|| OpsError::NotFound(format!("cluster {} not found", host.cluster_id)))?;

    let connector = builder.open(&cluster).await?;
    let instances = dal.instances().list_for_host(host_id)?;

    let mut migrated = 0usize;
    for instance in &instances {
        match connector.live_migrate(instance.id).await {
            Ok(()) => migrated += 1,
            Err(e) => warn!(
                "[{}] Live migration of {} failed: {}",
                host.hostname, instance.name, e
            ),
        }
    }

    if let Ok(entry) = NewAuditLog::new(ACTION_HOST_EVACUATED, &host.hostname) {
        let entry = entry.with_details(format!(
            "Requested live migration of {}/{} instances.",
            migrated,
            instances.len()
        ));
        if let Err(e) = dal.audit_logs().create(&entry) {
            error!("[{}] Failed to write audit entry: {:?}", host.hostname, e);
        }
    }

    Ok(migrated)
}

/// Fetches live diagnostics for one instance and stores the observed
/// utilization. This is the only path that writes the utilization fields.
pub async fn refresh_instance_usage<B: ConnectorBuilder>(
    dal: &DAL,
    builder: &B,
    instance_id: Uuid,
) -> Result<Instance, OpsError> {
    let instance = dal
        .instances()
        .get(instance_id)?
        .ok_or_else(|| OpsError::NotFound(format!("instance {} not found", instance_id)))?;
    let cluster = cluster_of_instance(dal, &instance)?;

    let connector = builder.open(&cluster).await?;
    let diagnostics = connector.server_diagnostics(instance_id).await?;

    Ok(dal.instances().update_usage(
        instance_id,
        diagnostics.cpu_usage_pct.unwrap_or(0.0),
        diagnostics.ram_usage_mb.unwrap_or(0.0),
    )?)
}
