/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Pure field extraction and merge rules for the reconciliation engine.
//!
//! Everything here is a total function over connector result types; a value
//! that cannot be interpreted yields an absent field, never an error, so a
//! single malformed field can never abort a cluster pass.

use chrono::{DateTime, NaiveDateTime, Utc};
use muninn_models::models::instances::IMAGE_REF_NONE;
use muninn_models::models::physical_hosts::PhysicalHost;
use muninn_models::models::{HostRecord, InstanceRecord, ServiceRecord, VolumeRecord};
use uuid::Uuid;

use crate::connector::types::{
    HypervisorStats, RemoteAddress, RemoteHypervisor, RemoteImageRef, RemoteServer, RemoteService,
    RemoteVolume,
};

/// Default network name stored when a server reports no usable address.
const DEFAULT_NETWORK: &str = "provider-net";

/// Finds the first IPv4 address while iterating the reported address groups
/// in their given order. Returns the address and its network name; first
/// match wins.
pub fn first_ipv4(addresses: &[(String, Vec<RemoteAddress>)]) -> Option<(String, String)> {
    for (network, group) in addresses {
        for addr in group {
            if addr.version == 4 {
                return Some((addr.addr.clone(), network.clone()));
            }
        }
    }
    None
}

/// Resolves a server's image reference to the stored string form: the bare
/// identifier, the identifier field of a structured reference, or the "N/A"
/// sentinel when there is no image at all.
pub fn image_ref_string(image: &RemoteImageRef) -> String {
    match image {
        RemoteImageRef::None => IMAGE_REF_NONE.to_string(),
        RemoteImageRef::Id(id) => id.clone(),
        RemoteImageRef::Reference { id: Some(id) } => id.clone(),
        RemoteImageRef::Reference { id: None } => "Unknown ID".to_string(),
    }
}

/// Parses a reported launch timestamp to absolute time. Naive timestamps are
/// taken as UTC; anything unparsable yields absent.
pub fn parse_launched_at(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    None
}

pub fn service_record(svc: &RemoteService, version: &str) -> ServiceRecord {
    ServiceRecord {
        binary: svc.binary.clone(),
        host: svc.host.clone(),
        zone: svc.zone.clone().unwrap_or_else(|| "nova".to_string()),
        status: svc.status.clone(),
        state: svc.state.clone(),
        version: version.to_string(),
    }
}

/// Merges one hypervisor's reported state into an upsert record.
///
/// Capacity merge precedence per field: bulk stats map value, then the
/// connector's own summary field, then the existing stored value, then zero.
/// The BMC address is carried forward from the stored row unless this pass
/// found a non-empty value, so a discovered address is never lost.
pub fn merge_host(
    hyp: &RemoteHypervisor,
    stats: Option<&HypervisorStats>,
    bmc: Option<&str>,
    existing: Option<&PhysicalHost>,
    release: &str,
) -> HostRecord {
    let cpu_count = stats
        .and_then(|s| s.vcpus)
        .or(hyp.vcpus)
        .unwrap_or_else(|| existing.map_or(0, |e| e.cpu_count));
    let vcpus_used = stats
        .and_then(|s| s.vcpus_used)
        .or(hyp.vcpus_used)
        .unwrap_or_else(|| existing.map_or(0, |e| e.vcpus_used));
    let memory_mb = stats
        .and_then(|s| s.memory_mb)
        .or(hyp.memory_mb)
        .unwrap_or_else(|| existing.map_or(0, |e| e.memory_mb));
    let memory_mb_used = stats
        .and_then(|s| s.memory_mb_used)
        .or(hyp.memory_mb_used)
        .unwrap_or_else(|| existing.map_or(0, |e| e.memory_mb_used));

    let ip_address = stats
        .and_then(|s| s.host_ip.clone())
        .filter(|ip| !ip.is_empty())
        .or_else(|| hyp.host_ip.clone().filter(|ip| !ip.is_empty()))
        .or_else(|| existing.map(|e| e.ip_address.clone()))
        .unwrap_or_else(|| "0.0.0.0".to_string());

    let idrac_ip = bmc
        .filter(|a| !a.is_empty())
        .map(String::from)
        .or_else(|| existing.and_then(|e| e.idrac_ip.clone()));

    HostRecord {
        hostname: hyp.hostname.clone(),
        ip_address,
        idrac_ip,
        state: hyp.state.clone(),
        status: hyp.status.clone(),
        cpu_count,
        vcpus_used,
        memory_mb,
        memory_mb_used,
        openstack_version: release.to_string(),
    }
}

pub fn instance_record(server: &RemoteServer) -> InstanceRecord {
    let (ip_address, network_name) = match first_ipv4(&server.addresses) {
        Some((ip, network)) => (Some(ip), network),
        None => (None, DEFAULT_NETWORK.to_string()),
    };

    InstanceRecord {
        id: server.id,
        name: server.name.clone(),
        status: server.status.clone(),
        flavor_name: server
            .flavor_name
            .clone()
            .unwrap_or_else(|| "unknown".to_string()),
        project_id: server.project_id.clone(),
        user_id: server.user_id.clone(),
        image_ref: image_ref_string(&server.image),
        key_name: server
            .key_name
            .clone()
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| "-".to_string()),
        launched_at: server.launched_at.as_deref().and_then(parse_launched_at),
        ip_address,
        network_name,
    }
}

/// Builds a volume upsert record for one instance. The device path comes
/// from the first attachment entry matching the instance.
pub fn volume_record(vol: &RemoteVolume, instance_id: Uuid) -> VolumeRecord {
    let device = vol
        .attachments
        .iter()
        .find(|a| a.server_id == Some(instance_id))
        .and_then(|a| a.device.clone())
        .unwrap_or_default();

    VolumeRecord {
        id: vol.id,
        name: vol.name.clone().unwrap_or_default(),
        size_gb: vol.size_gb.unwrap_or(0),
        device,
        status: vol
            .status
            .clone()
            .unwrap_or_else(|| "unknown".to_string()),
        is_bootable: vol.is_bootable,
    }
}
