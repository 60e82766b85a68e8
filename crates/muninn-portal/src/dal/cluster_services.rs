use crate::dal::DAL;
use muninn_models::models::cluster_services::{ClusterService, ServiceRecord};
use muninn_models::schema::cluster_services;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

/// Data Access Layer for ClusterService operations.
pub struct ClusterServicesDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl ClusterServicesDAL<'_> {
    /// Upserts a reported service by its (cluster, binary, host) natural
    /// key: find by key, else insert. Status, state and version fields are
    /// last-write-wins.
    pub fn upsert(
        &self,
        cluster_id: Uuid,
        record: &ServiceRecord,
    ) -> Result<ClusterService, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");

        let existing: Option<ClusterService> = cluster_services::table
            .filter(cluster_services::cluster_id.eq(cluster_id))
            .filter(cluster_services::binary.eq(&record.binary))
            .filter(cluster_services::host.eq(&record.host))
            .first(conn)
            .optional()?;

        match existing {
            Some(service) => diesel::update(
                cluster_services::table.filter(cluster_services::id.eq(service.id)),
            )
            .set((
                cluster_services::zone.eq(&record.zone),
                cluster_services::status.eq(&record.status),
                cluster_services::state.eq(&record.state),
                cluster_services::version.eq(&record.version),
                cluster_services::updated_at.eq(Utc::now()),
            ))
            .get_result(conn),
            None => diesel::insert_into(cluster_services::table)
                .values(record.clone().into_new(cluster_id))
                .get_result(conn),
        }
    }

    /// Lists all services reported by one cluster.
    pub fn list_for_cluster(
        &self,
        cluster_id: Uuid,
    ) -> Result<Vec<ClusterService>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        cluster_services::table
            .filter(cluster_services::cluster_id.eq(cluster_id))
            .order((cluster_services::binary.asc(), cluster_services::host.asc()))
            .load::<ClusterService>(conn)
    }
}
