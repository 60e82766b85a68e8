// src/models/cluster_services.rs

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named control-plane service's reported liveness.
///
/// Natural key is (cluster, binary, host); status/state/version are
/// last-write-wins on every reconciliation pass.
#[derive(Queryable, Selectable, Identifiable, AsChangeset, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::cluster_services)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ClusterService {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cluster_id: Uuid,
    pub binary: String,
    pub host: String,
    pub zone: String,
    pub status: String,
    pub state: String,
    pub version: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::cluster_services)]
pub struct NewClusterService {
    pub cluster_id: Uuid,
    pub binary: String,
    pub host: String,
    pub zone: String,
    pub status: String,
    pub state: String,
    pub version: String,
}

/// Upsert payload produced by the reconciliation engine for one reported service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord {
    pub binary: String,
    pub host: String,
    pub zone: String,
    pub status: String,
    pub state: String,
    pub version: String,
}

impl ServiceRecord {
    pub fn into_new(self, cluster_id: Uuid) -> NewClusterService {
        NewClusterService {
            cluster_id,
            binary: self.binary,
            host: self.host,
            zone: self.zone,
            status: self.status,
            state: self.state,
            version: self.version,
        }
    }
}
