/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Bulk map builder.
//!
//! Builds the in-memory indexes one reconciliation pass needs, in O(n)
//! passes over bulk query results instead of one remote call per entity.
//! Every map is best-effort: a failure fetching one category is logged and
//! yields an empty map, and the pass proceeds in degraded mode.

use std::collections::HashMap;

use muninn_utils::logging::prelude::*;
use uuid::Uuid;

use crate::connector::{
    ClusterConnector, HypervisorStats, RemoteNode, RemoteServer, RemoteVolume,
};

/// The four lookup indexes used by one cluster's reconciliation pass.
pub struct BulkMaps {
    /// host identifier (name, node id or instance id) -> BMC address
    pub bmc_map: HashMap<String, String>,
    /// hostname -> bulk capacity stats
    pub stats_map: HashMap<String, HypervisorStats>,
    /// hostname -> instances reported on that host
    pub host_instance_map: HashMap<String, Vec<RemoteServer>>,
    /// instance id -> volumes attached to it
    pub instance_volume_map: HashMap<Uuid, Vec<RemoteVolume>>,
}

impl BulkMaps {
    /// Fetches all four categories from the connector. Each category
    /// degrades to an empty map on failure; none aborts the others.
    pub async fn build<C: ClusterConnector>(connector: &C, cluster_name: &str) -> Self {
        let bmc_map = match connector.list_baremetal_nodes().await {
            Ok(nodes) => build_bmc_map(&nodes),
            Err(e) => {
                debug!("[{}] BMC mapping not available: {}", cluster_name, e);
                HashMap::new()
            }
        };

        let stats_map = match connector.hypervisor_details_bulk().await {
            Ok(stats) => build_stats_map(stats),
            Err(e) => {
                warn!("[{}] Failed to fetch bulk stats: {}", cluster_name, e);
                HashMap::new()
            }
        };

        let host_instance_map = match connector.list_servers_all_tenants().await {
            Ok(servers) => build_host_instance_map(servers),
            Err(e) => {
                warn!("[{}] Failed to bulk fetch instances: {}", cluster_name, e);
                HashMap::new()
            }
        };

        let instance_volume_map = match connector.list_volumes_all_tenants().await {
            Ok(volumes) => build_instance_volume_map(volumes),
            Err(e) => {
                warn!("[{}] Failed to bulk fetch volumes: {}", cluster_name, e);
                HashMap::new()
            }
        };

        BulkMaps {
            bmc_map,
            stats_map,
            host_instance_map,
            instance_volume_map,
        }
    }

    /// Looks up a BMC address by hypervisor hostname, falling back to the
    /// hypervisor's identifier.
    pub fn bmc_for(&self, hostname: &str, hypervisor_id: &str) -> Option<&str> {
        self.bmc_map
            .get(hostname)
            .or_else(|| self.bmc_map.get(hypervisor_id))
            .map(String::as_str)
    }

    pub fn instances_on(&self, hostname: &str) -> &[RemoteServer] {
        self.host_instance_map
            .get(hostname)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn volumes_for(&self, instance_id: &Uuid) -> &[RemoteVolume] {
        self.instance_volume_map
            .get(instance_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Strips the URL scheme and any path from a BMC address so that values like
/// "https://10.1.1.2/redfish/v1" and bare IPs index identically.
pub fn normalize_bmc_address(raw: &str) -> String {
    raw.trim_start_matches("https://")
        .trim_start_matches("http://")
        .split('/')
        .next()
        .unwrap_or("")
        .to_string()
}

/// Indexes BMC addresses by every identifier a node registers under: its
/// name, its node id and its associated instance id, so lookups succeed
/// regardless of which identifier the caller has.
pub fn build_bmc_map(nodes: &[RemoteNode]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for node in nodes {
        let address = match node.bmc_address.as_deref() {
            Some(raw) if !raw.is_empty() => normalize_bmc_address(raw),
            _ => continue,
        };
        if address.is_empty() {
            continue;
        }
        if let Some(name) = node.name.as_deref() {
            map.insert(name.to_string(), address.clone());
        }
        map.insert(node.id.clone(), address.clone());
        if let Some(instance_id) = node.instance_id.as_deref() {
            map.insert(instance_id.to_string(), address.clone());
        }
    }
    map
}

pub fn build_stats_map(stats: Vec<HypervisorStats>) -> HashMap<String, HypervisorStats> {
    stats.into_iter().map(|s| (s.hostname.clone(), s)).collect()
}

/// Groups instances by their reported hypervisor hostname, falling back to
/// the compute-host field when the former is absent. Instances reporting
/// neither are dropped.
pub fn build_host_instance_map(servers: Vec<RemoteServer>) -> HashMap<String, Vec<RemoteServer>> {
    let mut map: HashMap<String, Vec<RemoteServer>> = HashMap::new();
    for server in servers {
        let hostname = server
            .hypervisor_hostname
            .clone()
            .or_else(|| server.compute_host.clone());
        if let Some(hostname) = hostname {
            map.entry(hostname).or_default().push(server);
        }
    }
    map
}

/// Explodes each volume's attachment list; a volume attached to multiple
/// instances appears under each server id.
pub fn build_instance_volume_map(volumes: Vec<RemoteVolume>) -> HashMap<Uuid, Vec<RemoteVolume>> {
    let mut map: HashMap<Uuid, Vec<RemoteVolume>> = HashMap::new();
    for volume in volumes {
        for attachment in &volume.attachments {
            if let Some(server_id) = attachment.server_id {
                map.entry(server_id).or_default().push(volume.clone());
            }
        }
    }
    map
}
