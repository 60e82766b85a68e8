// src/models/instances.rs

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel stored when a server reports no usable image reference.
pub const IMAGE_REF_NONE: &str = "N/A";

/// A virtual machine running on a physical host.
///
/// The primary key is the identifier assigned by the remote cluster; it is
/// never regenerated locally. `host_id` is nullable so an instance can
/// outlive its host record. `flavor_name` is a denormalized string because
/// flavor catalogs and instances sync independently and may race.
#[derive(Queryable, Selectable, Identifiable, AsChangeset, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::instances)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Instance {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub host_id: Option<Uuid>,
    pub name: String,
    pub status: String,
    pub flavor_name: String,
    pub project_id: String,
    pub user_id: String,
    pub image_ref: String,
    pub key_name: String,
    pub launched_at: Option<DateTime<Utc>>,
    pub ip_address: Option<String>,
    pub network_name: String,
    /// Only updated by an explicit refresh, never by bulk sync.
    pub last_cpu_usage_pct: f64,
    /// Only updated by an explicit refresh, never by bulk sync.
    pub last_ram_usage_mb: f64,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::instances)]
pub struct NewInstance {
    pub id: Uuid,
    pub host_id: Option<Uuid>,
    pub name: String,
    pub status: String,
    pub flavor_name: String,
    pub project_id: String,
    pub user_id: String,
    pub image_ref: String,
    pub key_name: String,
    pub launched_at: Option<DateTime<Utc>>,
    pub ip_address: Option<String>,
    pub network_name: String,
}

/// Upsert payload produced by the reconciliation engine for one server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRecord {
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub flavor_name: String,
    pub project_id: String,
    pub user_id: String,
    pub image_ref: String,
    pub key_name: String,
    pub launched_at: Option<DateTime<Utc>>,
    pub ip_address: Option<String>,
    pub network_name: String,
}

impl InstanceRecord {
    pub fn into_new(self, host_id: Option<Uuid>) -> NewInstance {
        NewInstance {
            id: self.id,
            host_id,
            name: self.name,
            status: self.status,
            flavor_name: self.flavor_name,
            project_id: self.project_id,
            user_id: self.user_id,
            image_ref: self.image_ref,
            key_name: self.key_name,
            launched_at: self.launched_at,
            ip_address: self.ip_address,
            network_name: self.network_name,
        }
    }
}
