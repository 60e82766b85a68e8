/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Flavor catalog synchronization.
//!
//! Flavors sync independently of the inventory pass; the cost engine
//! resolves instance vCPU counts against this catalog by flavor name.
//! A failure here never changes cluster status.

use muninn_models::models::audit_logs::{ACTION_FLAVOR_SYNC_FAILED, ACTION_FLAVOR_SYNC_SUCCESS};
use muninn_models::models::{FlavorRecord, NewAuditLog};
use muninn_utils::logging::prelude::*;

use crate::connector::{ClusterConnector, ConnectorBuilder};
use crate::dal::DAL;

pub async fn run_flavor_sync<B: ConnectorBuilder>(dal: &DAL, builder: &B) {
    info!(">>> Starting flavor sync");

    let clusters = match dal.clusters().list() {
        Ok(clusters) => clusters,
        Err(e) => {
            error!("Failed to list clusters: {:?}", e);
            return;
        }
    };

    for cluster in clusters {
        debug!("[{}] Syncing flavors...", cluster.name);

        let outcome = async {
            let connector = builder.open(&cluster).await?;
            let flavors = connector.list_flavors().await?;
            Ok::<_, crate::connector::ConnectorError>(flavors)
        }
        .await;

        match outcome {
            Ok(flavors) => {
                let mut count = 0usize;
                let mut failed = false;
                for flavor in &flavors {
                    let record = FlavorRecord {
                        id: flavor.id.clone(),
                        name: flavor.name.clone(),
                        vcpus: flavor.vcpus,
                        ram_mb: flavor.ram_mb,
                        disk_gb: flavor.disk_gb,
                        is_public: flavor.is_public,
                    };
                    match dal.flavors().upsert(cluster.id, &record) {
                        Ok(_) => count += 1,
                        Err(e) => {
                            error!("[{}] Flavor upsert error: {:?}", cluster.name, e);
                            failed = true;
                        }
                    }
                }
                info!("[{}] Synced {} flavors.", cluster.name, count);
                let action = if failed {
                    ACTION_FLAVOR_SYNC_FAILED
                } else {
                    ACTION_FLAVOR_SYNC_SUCCESS
                };
                audit(dal, action, &cluster.name, format!("Synced {} flavors.", count));
            }
            Err(e) => {
                warn!("[{}] Flavor sync error: {}", cluster.name, e);
                audit(dal, ACTION_FLAVOR_SYNC_FAILED, &cluster.name, e.to_string());
            }
        }
    }
}

fn audit(dal: &DAL, action: &str, target: &str, details: String) {
    match NewAuditLog::new(action, target) {
        Ok(entry) => {
            if let Err(e) = dal.audit_logs().create(&entry.with_details(details)) {
                error!("[{}] Failed to write audit entry: {:?}", target, e);
            }
        }
        Err(e) => error!("[{}] Failed to build audit entry: {}", target, e),
    }
}
