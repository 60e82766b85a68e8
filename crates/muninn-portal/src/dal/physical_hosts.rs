use crate::dal::DAL;
use muninn_models::models::physical_hosts::{HostRecord, PhysicalHost};
use muninn_models::schema::physical_hosts;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

/// Data Access Layer for PhysicalHost operations.
pub struct PhysicalHostsDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl PhysicalHostsDAL<'_> {
    /// Retrieves a host by its UUID.
    pub fn get(&self, host_id: Uuid) -> Result<Option<PhysicalHost>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        physical_hosts::table
            .filter(physical_hosts::id.eq(host_id))
            .first(conn)
            .optional()
    }

    /// Retrieves a host by its (cluster, hostname) natural key.
    pub fn find_by_hostname(
        &self,
        cluster_id: Uuid,
        hostname: &str,
    ) -> Result<Option<PhysicalHost>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        physical_hosts::table
            .filter(physical_hosts::cluster_id.eq(cluster_id))
            .filter(physical_hosts::hostname.eq(hostname))
            .first(conn)
            .optional()
    }

    /// Upserts a host by its (cluster, hostname) natural key: find by key,
    /// else insert.
    ///
    /// Sync-owned fields are overwritten; `is_maintenance`, the cost profile
    /// reference and the hardware metadata fields are never touched here.
    /// The stored BMC address is only overwritten when the record carries a
    /// value for it.
    pub fn upsert(
        &self,
        cluster_id: Uuid,
        record: &HostRecord,
    ) -> Result<PhysicalHost, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");

        let existing: Option<PhysicalHost> = physical_hosts::table
            .filter(physical_hosts::cluster_id.eq(cluster_id))
            .filter(physical_hosts::hostname.eq(&record.hostname))
            .first(conn)
            .optional()?;

        match existing {
            Some(host) => {
                let updated: PhysicalHost = diesel::update(
                    physical_hosts::table.filter(physical_hosts::id.eq(host.id)),
                )
                .set((
                    physical_hosts::ip_address.eq(&record.ip_address),
                    physical_hosts::state.eq(&record.state),
                    physical_hosts::status.eq(&record.status),
                    physical_hosts::cpu_count.eq(record.cpu_count),
                    physical_hosts::vcpus_used.eq(record.vcpus_used),
                    physical_hosts::memory_mb.eq(record.memory_mb),
                    physical_hosts::memory_mb_used.eq(record.memory_mb_used),
                    physical_hosts::openstack_version.eq(&record.openstack_version),
                    physical_hosts::updated_at.eq(Utc::now()),
                ))
                .get_result(conn)?;

                if let Some(idrac_ip) = record.idrac_ip.as_deref() {
                    diesel::update(physical_hosts::table.filter(physical_hosts::id.eq(host.id)))
                        .set(physical_hosts::idrac_ip.eq(idrac_ip))
                        .get_result(conn)
                } else {
                    Ok(updated)
                }
            }
            None => diesel::insert_into(physical_hosts::table)
                .values(record.clone().into_new(cluster_id))
                .get_result(conn),
        }
    }

    /// Lists all hosts.
    pub fn list(&self) -> Result<Vec<PhysicalHost>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        physical_hosts::table
            .order(physical_hosts::hostname.asc())
            .load::<PhysicalHost>(conn)
    }

    /// Lists all hosts of one cluster.
    pub fn list_for_cluster(
        &self,
        cluster_id: Uuid,
    ) -> Result<Vec<PhysicalHost>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        physical_hosts::table
            .filter(physical_hosts::cluster_id.eq(cluster_id))
            .order(physical_hosts::hostname.asc())
            .load::<PhysicalHost>(conn)
    }

    /// Lists all hosts with a known BMC address, i.e. the hardware health
    /// poller's working set.
    pub fn list_with_bmc(&self) -> Result<Vec<PhysicalHost>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        physical_hosts::table
            .filter(physical_hosts::idrac_ip.is_not_null())
            .filter(physical_hosts::idrac_ip.ne(""))
            .order(physical_hosts::hostname.asc())
            .load::<PhysicalHost>(conn)
    }

    /// Counts the hosts of one cluster.
    pub fn count_for_cluster(&self, cluster_id: Uuid) -> Result<i64, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        physical_hosts::table
            .filter(physical_hosts::cluster_id.eq(cluster_id))
            .count()
            .get_result(conn)
    }

    /// Sets the operator-owned maintenance flag.
    pub fn set_maintenance(
        &self,
        host_id: Uuid,
        is_maintenance: bool,
    ) -> Result<usize, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        diesel::update(physical_hosts::table.filter(physical_hosts::id.eq(host_id)))
            .set((
                physical_hosts::is_maintenance.eq(is_maintenance),
                physical_hosts::updated_at.eq(Utc::now()),
            ))
            .execute(conn)
    }

    /// Assigns or clears the operator-owned cost profile reference.
    pub fn set_cost_profile(
        &self,
        host_id: Uuid,
        cost_profile_id: Option<Uuid>,
    ) -> Result<usize, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        diesel::update(physical_hosts::table.filter(physical_hosts::id.eq(host_id)))
            .set((
                physical_hosts::cost_profile_id.eq(cost_profile_id),
                physical_hosts::updated_at.eq(Utc::now()),
            ))
            .execute(conn)
    }

    /// Updates the hardware metadata fields owned by the hardware pollers.
    /// Capacity fields owned by the primary reconciliation path are never
    /// touched here.
    pub fn update_hardware_info(
        &self,
        host_id: Uuid,
        service_tag: &str,
        server_model: &str,
        hardware_health: &str,
    ) -> Result<usize, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        diesel::update(physical_hosts::table.filter(physical_hosts::id.eq(host_id)))
            .set((
                physical_hosts::service_tag.eq(service_tag),
                physical_hosts::server_model.eq(server_model),
                physical_hosts::hardware_health.eq(hardware_health),
                physical_hosts::updated_at.eq(Utc::now()),
            ))
            .execute(conn)
    }
}
