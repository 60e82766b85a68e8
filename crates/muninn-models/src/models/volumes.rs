// src/models/volumes.rs

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A block-storage volume attached to an instance.
///
/// The primary key is the identifier assigned by the remote cluster. The
/// instance reference always reflects the most recent sync pass; stale
/// attachments are not purged by sync.
#[derive(Queryable, Selectable, Identifiable, AsChangeset, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::volumes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Volume {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub instance_id: Uuid,
    pub name: String,
    pub size_gb: i32,
    pub device: String,
    pub status: String,
    pub is_bootable: bool,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::volumes)]
pub struct NewVolume {
    pub id: Uuid,
    pub instance_id: Uuid,
    pub name: String,
    pub size_gb: i32,
    pub device: String,
    pub status: String,
    pub is_bootable: bool,
}

/// Upsert payload produced by the reconciliation engine for one volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeRecord {
    pub id: Uuid,
    pub name: String,
    pub size_gb: i32,
    pub device: String,
    pub status: String,
    pub is_bootable: bool,
}

impl VolumeRecord {
    pub fn into_new(self, instance_id: Uuid) -> NewVolume {
        NewVolume {
            id: self.id,
            instance_id,
            name: self.name,
            size_gb: self.size_gb,
            device: self.device,
            status: self.status,
            is_bootable: self.is_bootable,
        }
    }
}
