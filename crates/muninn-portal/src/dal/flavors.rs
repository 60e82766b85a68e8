use crate::dal::DAL;
use muninn_models::models::flavors::{Flavor, FlavorRecord};
use muninn_models::schema::flavors;
use chrono::Utc;
use diesel::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;

/// Data Access Layer for Flavor operations.
pub struct FlavorsDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl FlavorsDAL<'_> {
    /// Upserts a flavor by its remote-assigned identifier: find by key,
    /// else insert.
    pub fn upsert(
        &self,
        cluster_id: Uuid,
        record: &FlavorRecord,
    ) -> Result<Flavor, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");

        let existing: Option<Flavor> = flavors::table
            .filter(flavors::id.eq(&record.id))
            .first(conn)
            .optional()?;

        match existing {
            Some(_) => diesel::update(flavors::table.filter(flavors::id.eq(&record.id)))
                .set((
                    flavors::cluster_id.eq(cluster_id),
                    flavors::name.eq(&record.name),
                    flavors::vcpus.eq(record.vcpus),
                    flavors::ram_mb.eq(record.ram_mb),
                    flavors::disk_gb.eq(record.disk_gb),
                    flavors::is_public.eq(record.is_public),
                    flavors::updated_at.eq(Utc::now()),
                ))
                .get_result(conn),
            None => diesel::insert_into(flavors::table)
                .values(record.clone().into_new(cluster_id))
                .get_result(conn),
        }
    }

    /// Lists the flavor catalog of one cluster.
    pub fn list_for_cluster(&self, cluster_id: Uuid) -> Result<Vec<Flavor>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        flavors::table
            .filter(flavors::cluster_id.eq(cluster_id))
            .order(flavors::name.asc())
            .load::<Flavor>(conn)
    }

    /// Finds a flavor by name within one cluster.
    pub fn find_by_name(
        &self,
        cluster_id: Uuid,
        name: &str,
    ) -> Result<Option<Flavor>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        flavors::table
            .filter(flavors::cluster_id.eq(cluster_id))
            .filter(flavors::name.eq(name))
            .first(conn)
            .optional()
    }

    /// Builds the (cluster, flavor name) -> vCPUs index the cost engine
    /// resolves instance sizes against.
    pub fn vcpu_index(&self) -> Result<HashMap<(Uuid, String), i32>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        let all: Vec<Flavor> = flavors::table.load(conn)?;
        Ok(all
            .into_iter()
            .map(|f| ((f.cluster_id, f.name), f.vcpus))
            .collect())
    }
}
