// src/models/flavors.rs

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A compute flavor definition synced from a cluster's catalog.
///
/// The primary key is the remote flavor identifier. The cost engine resolves
/// instance vCPU counts by matching `name` within the instance's cluster.
#[derive(Queryable, Selectable, Identifiable, AsChangeset, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::flavors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Flavor {
    pub id: String,
    pub cluster_id: Uuid,
    pub name: String,
    pub vcpus: i32,
    pub ram_mb: i32,
    pub disk_gb: i32,
    pub is_public: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::flavors)]
pub struct NewFlavor {
    pub id: String,
    pub cluster_id: Uuid,
    pub name: String,
    pub vcpus: i32,
    pub ram_mb: i32,
    pub disk_gb: i32,
    pub is_public: bool,
}

/// Upsert payload produced by the flavor sync for one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlavorRecord {
    pub id: String,
    pub name: String,
    pub vcpus: i32,
    pub ram_mb: i32,
    pub disk_gb: i32,
    pub is_public: bool,
}

impl FlavorRecord {
    pub fn into_new(self, cluster_id: Uuid) -> NewFlavor {
        NewFlavor {
            id: self.id,
            cluster_id,
            name: self.name,
            vcpus: self.vcpus,
            ram_mb: self.ram_mb,
            disk_gb: self.disk_gb,
            is_public: self.is_public,
        }
    }
}
