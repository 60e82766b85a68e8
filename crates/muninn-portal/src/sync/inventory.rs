/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! The per-cluster inventory reconciliation pass.
//!
//! Runs unconditionally on every scheduled tick with no delta detection, so
//! every upsert must be idempotent: running the pass twice against unchanged
//! remote state produces identical rows (timestamps aside).

use std::time::Instant;

use muninn_models::models::audit_logs::{
    ACTION_INVENTORY_SYNC_FAILED, ACTION_INVENTORY_SYNC_SUCCESS,
};
use muninn_models::models::clusters::{Cluster, STATUS_OFFLINE, STATUS_ONLINE};
use muninn_models::models::NewAuditLog;
use muninn_utils::logging::prelude::*;

use super::extract;
use super::maps::BulkMaps;
use super::SyncError;
use crate::connector::{ClusterConnector, ConnectorBuilder};
use crate::dal::DAL;

/// Outcome of one successful cluster pass.
pub struct SyncSummary {
    pub host_count: usize,
    pub elapsed_secs: f64,
}

/// Runs one reconciliation pass over every stored cluster, in iteration
/// order. A failure inside one cluster's pass marks that cluster offline
/// and moves on; it never propagates to or blocks the other clusters.
pub async fn run_inventory_sync<B: ConnectorBuilder>(dal: &DAL, builder: &B) {
    info!(">>> Starting inventory sync");

    let clusters = match dal.clusters().list() {
        Ok(clusters) => clusters,
        Err(e) => {
            error!("Failed to list clusters: {:?}", e);
            return;
        }
    };

    for cluster in clusters {
        info!("--- Processing cluster: {} ---", cluster.name);

        // Connecting is the only fatal-per-cluster step before the pass
        // proper: connectivity and endpoint-not-found failures mark the
        // cluster offline and skip it for this tick.
        let connector = match builder.open(&cluster).await {
            Ok(connector) => connector,
            Err(e) => {
                warn!("[{}] Connect failed: {}", cluster.name, e);
                record_failure(dal, &cluster, &e.to_string());
                continue;
            }
        };

        match sync_cluster(dal, &connector, &cluster).await {
            Ok(summary) => {
                let entry = NewAuditLog::new(ACTION_INVENTORY_SYNC_SUCCESS, &cluster.name)
                    .map(|log| {
                        log.with_details(format!(
                            "Synced {} hosts in {:.1}s.",
                            summary.host_count, summary.elapsed_secs
                        ))
                    });
                if let Ok(entry) = entry {
                    if let Err(e) = dal.audit_logs().create(&entry) {
                        error!("[{}] Failed to write audit entry: {:?}", cluster.name, e);
                    }
                }
            }
            Err(e) => {
                error!("[{}] Sync failed: {}", cluster.name, e);
                record_failure(dal, &cluster, &e.to_string());
            }
        }
    }

    info!("<<< Finished inventory sync");
}

/// One complete fetch-merge-upsert cycle for a single cluster.
pub async fn sync_cluster<C: ClusterConnector>(
    dal: &DAL,
    connector: &C,
    cluster: &Cluster,
) -> Result<SyncSummary, SyncError> {
    let started = Instant::now();

    // Best-effort: failure yields "Unknown", never aborts.
    let release = connector.detect_release().await;

    // Flip online as soon as the connector answered.
    dal.clusters().set_status(cluster.id, STATUS_ONLINE)?;

    // Services, by (cluster, binary, host) natural key.
    let services = connector.list_services().await?;
    for svc in &services {
        dal.cluster_services()
            .upsert(cluster.id, &extract::service_record(svc, &release))?;
    }

    let maps = BulkMaps::build(connector, &cluster.name).await;

    debug!("[{}] Fetching hypervisors...", cluster.name);
    let hypervisors = connector.list_hypervisors().await?;
    debug!("[{}] Found {} hypervisors.", cluster.name, hypervisors.len());

    for hyp in &hypervisors {
        let existing = dal
            .physical_hosts()
            .find_by_hostname(cluster.id, &hyp.hostname)?;
        let record = extract::merge_host(
            hyp,
            maps.stats_map.get(&hyp.hostname),
            maps.bmc_for(&hyp.hostname, &hyp.id),
            existing.as_ref(),
            &release,
        );
        debug!(
            "    > Host: {} [CPUs: {}/{}, RAM: {}/{}]",
            record.hostname, record.vcpus_used, record.cpu_count, record.memory_mb_used,
            record.memory_mb
        );
        let host = dal.physical_hosts().upsert(cluster.id, &record)?;

        // Instances come from the bulk host-instance map, not a per-host call.
        for server in maps.instances_on(&hyp.hostname) {
            let instance = dal
                .instances()
                .upsert(Some(host.id), &extract::instance_record(server))?;

            // A volume failure degrades that instance's volumes only.
            for vol in maps.volumes_for(&server.id) {
                let record = extract::volume_record(vol, server.id);
                if let Err(e) = dal.volumes().upsert(instance.id, &record) {
                    warn!(
                        "[{}] Volume sync error for {}: {:?}",
                        cluster.name, server.name, e
                    );
                }
            }
        }
    }

    Ok(SyncSummary {
        host_count: hypervisors.len(),
        elapsed_secs: started.elapsed().as_secs_f64(),
    })
}

fn record_failure(dal: &DAL, cluster: &Cluster, details: &str) {
    if let Err(e) = dal.clusters().set_status(cluster.id, STATUS_OFFLINE) {
        error!("[{}] Failed to mark cluster offline: {:?}", cluster.name, e);
    }
    match NewAuditLog::new(ACTION_INVENTORY_SYNC_FAILED, &cluster.name) {
        Ok(entry) => {
            if let Err(e) = dal.audit_logs().create(&entry.with_details(details)) {
                error!("[{}] Failed to write audit entry: {:?}", cluster.name, e);
            }
        }
        Err(e) => error!("[{}] Failed to build audit entry: {}", cluster.name, e),
    }
}
