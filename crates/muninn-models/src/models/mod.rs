//! Data models for the inventory store
pub mod alerts;
pub mod audit_logs;
pub mod cluster_services;
pub mod clusters;
pub mod cost_profiles;
pub mod flavors;
pub mod instances;
pub mod physical_hosts;
pub mod portal_settings;
pub mod volumes;

pub use alerts::{Alert, NewAlert};
pub use audit_logs::{AuditLog, NewAuditLog};
pub use cluster_services::{ClusterService, NewClusterService, ServiceRecord};
pub use clusters::{Cluster, NewCluster};
pub use cost_profiles::{CostProfile, NewCostProfile};
pub use flavors::{Flavor, FlavorRecord, NewFlavor};
pub use instances::{Instance, InstanceRecord, NewInstance};
pub use physical_hosts::{HostRecord, NewPhysicalHost, PhysicalHost};
pub use portal_settings::PortalSettings;
pub use volumes::{NewVolume, Volume, VolumeRecord};
