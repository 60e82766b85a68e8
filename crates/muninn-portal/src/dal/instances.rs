use crate::dal::DAL;
use muninn_models::models::instances::{Instance, InstanceRecord};
use muninn_models::schema::{instances, physical_hosts};
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

/// Data Access Layer for Instance operations.
pub struct InstancesDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl InstancesDAL<'_> {
    /// Retrieves an instance by its remote-assigned UUID.
    pub fn get(&self, instance_id: Uuid) -> Result<Option<Instance>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        instances::table
            .filter(instances::id.eq(instance_id))
            .first(conn)
            .optional()
    }

    /// Upserts an instance by its remote-assigned UUID: find by key, else
    /// insert. The key is immutable and never regenerated locally.
    ///
    /// The last observed CPU/RAM utilization is not touched here; it is only
    /// written by [`InstancesDAL::update_usage`] on explicit refresh.
    pub fn upsert(
        &self,
        host_id: Option<Uuid>,
        record: &InstanceRecord,
    ) -> Result<Instance, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");

        let existing: Option<Instance> = instances::table
            .filter(instances::id.eq(record.id))
            .first(conn)
            .optional()?;

        match existing {
            Some(_) => diesel::update(instances::table.filter(instances::id.eq(record.id)))
                .set((
                    instances::host_id.eq(host_id),
                    instances::name.eq(&record.name),
                    instances::status.eq(&record.status),
                    instances::flavor_name.eq(&record.flavor_name),
                    instances::project_id.eq(&record.project_id),
                    instances::user_id.eq(&record.user_id),
                    instances::image_ref.eq(&record.image_ref),
                    instances::key_name.eq(&record.key_name),
                    instances::launched_at.eq(record.launched_at),
                    instances::ip_address.eq(&record.ip_address),
                    instances::network_name.eq(&record.network_name),
                    instances::updated_at.eq(Utc::now()),
                ))
                .get_result(conn),
            None => diesel::insert_into(instances::table)
                .values(record.clone().into_new(host_id))
                .get_result(conn),
        }
    }

    /// Lists all instances.
    pub fn list(&self) -> Result<Vec<Instance>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        instances::table
            .order(instances::name.asc())
            .load::<Instance>(conn)
    }

    /// Lists all instances on one host.
    pub fn list_for_host(&self, host_id: Uuid) -> Result<Vec<Instance>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        instances::table
            .filter(instances::host_id.eq(host_id))
            .order(instances::name.asc())
            .load::<Instance>(conn)
    }

    /// Lists all instances hosted in one cluster.
    pub fn list_for_cluster(
        &self,
        cluster_id: Uuid,
    ) -> Result<Vec<Instance>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        instances::table
            .inner_join(physical_hosts::table)
            .filter(physical_hosts::cluster_id.eq(cluster_id))
            .select(instances::all_columns)
            .load::<Instance>(conn)
    }

    /// Writes the last observed utilization of an instance. Only called by
    /// the explicit refresh path.
    pub fn update_usage(
        &self,
        instance_id: Uuid,
        cpu_usage_pct: f64,
        ram_usage_mb: f64,
    ) -> Result<Instance, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        diesel::update(instances::table.filter(instances::id.eq(instance_id)))
            .set((
                instances::last_cpu_usage_pct.eq(cpu_usage_pct),
                instances::last_ram_usage_mb.eq(ram_usage_mb),
                instances::updated_at.eq(Utc::now()),
            ))
            .get_result(conn)
    }
}
