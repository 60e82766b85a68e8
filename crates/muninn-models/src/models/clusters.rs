// src/models/clusters.rs

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cluster connectivity status: the cluster has never been reached.
pub const STATUS_UNKNOWN: &str = "unknown";
/// Cluster connectivity status: the last reconciliation pass succeeded.
pub const STATUS_ONLINE: &str = "online";
/// Cluster connectivity status: the last reconciliation pass failed.
pub const STATUS_OFFLINE: &str = "offline";

/// One independently managed private-cloud control plane.
///
/// Credentials are stored encrypted; the portal crate owns the cipher.
/// `status` is mutated only by the reconciliation engine.
#[derive(Queryable, Selectable, Identifiable, AsChangeset, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::clusters)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Cluster {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub auth_url: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_encrypted: Vec<u8>,
    pub project_name: String,
    pub region_name: String,
    pub user_domain_name: String,
    pub project_domain_name: String,
    pub status: String,
}

#[derive(Insertable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::clusters)]
pub struct NewCluster {
    pub name: String,
    pub auth_url: String,
    pub username: String,
    pub password_encrypted: Vec<u8>,
    pub project_name: String,
    pub region_name: String,
    pub user_domain_name: String,
    pub project_domain_name: String,
}

impl NewCluster {
    pub fn new(
        name: String,
        auth_url: String,
        username: String,
        password_encrypted: Vec<u8>,
        project_name: String,
        region_name: Option<String>,
    ) -> Result<Self, String> {
        if name.trim().is_empty() {
            return Err("Name cannot be empty".to_string());
        }
        if auth_url.trim().is_empty() {
            return Err("Auth URL cannot be empty".to_string());
        }
        if username.trim().is_empty() {
            return Err("Username cannot be empty".to_string());
        }
        if project_name.trim().is_empty() {
            return Err("Project name cannot be empty".to_string());
        }

        Ok(NewCluster {
            name,
            auth_url,
            username,
            password_encrypted,
            project_name,
            region_name: region_name.unwrap_or_else(|| "RegionOne".to_string()),
            user_domain_name: "Default".to_string(),
            project_domain_name: "Default".to_string(),
        })
    }
}
