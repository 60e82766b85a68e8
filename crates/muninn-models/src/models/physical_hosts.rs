// src/models/physical_hosts.rs

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A physical server providing compute capacity within a cluster.
///
/// Natural key is (cluster, hostname). Capacity and liveness fields are
/// owned by the reconciliation engine; `service_tag`, `server_model` and
/// `hardware_health` are owned by the hardware pollers; `is_maintenance`
/// and `cost_profile_id` are only ever set by operator action.
#[derive(Queryable, Selectable, Identifiable, AsChangeset, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::physical_hosts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PhysicalHost {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cluster_id: Uuid,
    pub hostname: String,
    pub ip_address: String,
    /// BMC address discovered from bare-metal driver metadata. Never cleared
    /// by sync once discovered; only overwritten by a new non-empty value.
    pub idrac_ip: Option<String>,
    pub is_maintenance: bool,
    pub state: String,
    pub status: String,
    pub cpu_count: i32,
    pub vcpus_used: i32,
    pub memory_mb: i32,
    pub memory_mb_used: i32,
    pub service_tag: String,
    pub server_model: String,
    pub hardware_health: String,
    pub openstack_version: String,
    pub cost_profile_id: Option<Uuid>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::physical_hosts)]
pub struct NewPhysicalHost {
    pub cluster_id: Uuid,
    pub hostname: String,
    pub ip_address: String,
    pub idrac_ip: Option<String>,
    pub state: String,
    pub status: String,
    pub cpu_count: i32,
    pub vcpus_used: i32,
    pub memory_mb: i32,
    pub memory_mb_used: i32,
    pub openstack_version: String,
}

/// Upsert payload produced by the reconciliation engine for one hypervisor.
///
/// `idrac_ip` is `Some` only when a non-empty BMC address was found during
/// this pass; the DAL leaves the stored value alone otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRecord {
    pub hostname: String,
    pub ip_address: String,
    pub idrac_ip: Option<String>,
    pub state: String,
    pub status: String,
    pub cpu_count: i32,
    pub vcpus_used: i32,
    pub memory_mb: i32,
    pub memory_mb_used: i32,
    pub openstack_version: String,
}

impl HostRecord {
    pub fn into_new(self, cluster_id: Uuid) -> NewPhysicalHost {
        NewPhysicalHost {
            cluster_id,
            hostname: self.hostname,
            ip_address: self.ip_address,
            idrac_ip: self.idrac_ip,
            state: self.state,
            status: self.status,
            cpu_count: self.cpu_count,
            vcpus_used: self.vcpus_used,
            memory_mb: self.memory_mb,
            memory_mb_used: self.memory_mb_used,
            openstack_version: self.openstack_version,
        }
    }
}
