use crate::dal::DAL;
use muninn_models::models::clusters::{Cluster, NewCluster};
use muninn_models::schema::clusters;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

/// Data Access Layer for Cluster operations.
pub struct ClustersDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl ClustersDAL<'_> {
    /// Creates a new cluster in the database.
    pub fn create(&self, new_cluster: &NewCluster) -> Result<Cluster, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        diesel::insert_into(clusters::table)
            .values(new_cluster)
            .get_result(conn)
    }

    /// Retrieves a cluster by its UUID.
    pub fn get(&self, cluster_id: Uuid) -> Result<Option<Cluster>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        clusters::table
            .filter(clusters::id.eq(cluster_id))
            .first(conn)
            .optional()
    }

    /// Lists all clusters ordered by region and name. This is the iteration
    /// order of a reconciliation run.
    pub fn list(&self) -> Result<Vec<Cluster>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        clusters::table
            .order((clusters::region_name.asc(), clusters::name.asc()))
            .load::<Cluster>(conn)
    }

    /// Updates an existing cluster.
    pub fn update(
        &self,
        cluster_id: Uuid,
        updated: &Cluster,
    ) -> Result<Cluster, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        diesel::update(clusters::table.filter(clusters::id.eq(cluster_id)))
            .set(updated)
            .get_result(conn)
    }

    /// Sets the connectivity status of a cluster, touching the row only when
    /// the status actually changes. Returns the number of affected rows.
    pub fn set_status(
        &self,
        cluster_id: Uuid,
        status: &str,
    ) -> Result<usize, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        diesel::update(
            clusters::table
                .filter(clusters::id.eq(cluster_id))
                .filter(clusters::status.ne(status)),
        )
        .set((clusters::status.eq(status), clusters::updated_at.eq(Utc::now())))
        .execute(conn)
    }

    /// Replaces the stored (encrypted) credentials of a cluster.
    pub fn set_password(
        &self,
        cluster_id: Uuid,
        password_encrypted: Vec<u8>,
    ) -> Result<usize, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        diesel::update(clusters::table.filter(clusters::id.eq(cluster_id)))
            .set((
                clusters::password_encrypted.eq(password_encrypted),
                clusters::updated_at.eq(Utc::now()),
            ))
            .execute(conn)
    }

    /// Hard deletes a cluster; hosts, instances and services cascade.
    pub fn delete(&self, cluster_id: Uuid) -> Result<usize, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        diesel::delete(clusters::table.filter(clusters::id.eq(cluster_id))).execute(conn)
    }
}
