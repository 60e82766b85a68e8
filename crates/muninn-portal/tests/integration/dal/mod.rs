mod alerts;
mod audit_logs;
mod cluster_services;
mod clusters;
mod flavors;
mod instances;
mod physical_hosts;
mod portal_settings;
mod volumes;
