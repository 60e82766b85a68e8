use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;

mod alerts;
mod audit_logs;
mod cluster_services;
mod clusters;
mod cost_profiles;
mod flavors;
mod instances;
mod physical_hosts;
mod portal_settings;
mod volumes;

pub use alerts::AlertsDAL;
pub use audit_logs::AuditLogsDAL;
pub use cluster_services::ClusterServicesDAL;
pub use clusters::ClustersDAL;
pub use cost_profiles::CostProfilesDAL;
pub use flavors::FlavorsDAL;
pub use instances::InstancesDAL;
pub use physical_hosts::PhysicalHostsDAL;
pub use portal_settings::PortalSettingsDAL;
pub use volumes::VolumesDAL;

/// Data Access Layer for the inventory store.
#[derive(Clone)]
pub struct DAL {
    pub pool: Pool<ConnectionManager<PgConnection>>,
}

impl DAL {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        DAL { pool }
    }

    pub fn alerts(&self) -> AlertsDAL {
        AlertsDAL { dal: self }
    }

    pub fn audit_logs(&self) -> AuditLogsDAL {
        AuditLogsDAL { dal: self }
    }

    pub fn cluster_services(&self) -> ClusterServicesDAL {
        ClusterServicesDAL { dal: self }
    }

    pub fn clusters(&self) -> ClustersDAL {
        ClustersDAL { dal: self }
    }

    pub fn cost_profiles(&self) -> CostProfilesDAL {
        CostProfilesDAL { dal: self }
    }

    pub fn flavors(&self) -> FlavorsDAL {
        FlavorsDAL { dal: self }
    }

    pub fn instances(&self) -> InstancesDAL {
        InstancesDAL { dal: self }
    }

    pub fn physical_hosts(&self) -> PhysicalHostsDAL {
        PhysicalHostsDAL { dal: self }
    }

    pub fn portal_settings(&self) -> PortalSettingsDAL {
        PortalSettingsDAL { dal: self }
    }

    pub fn volumes(&self) -> VolumesDAL {
        VolumesDAL { dal: self }
    }
}
