/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Cluster connector boundary.
//!
//! The reconciliation engine never talks to a cluster's management API
//! directly: it consumes the [`ClusterConnector`] trait, which exposes the
//! bulk operations the engine needs and returns fixed-shape result types.
//! Loosely structured API payloads are mapped to these types exactly once,
//! at the connector boundary, and never passed as untyped data deeper into
//! the engine.

pub mod openstack;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use muninn_models::models::clusters::Cluster;
use muninn_utils::logging::prelude::*;
use muninn_utils::Settings;
use thiserror::Error;
use uuid::Uuid;

pub use openstack::{OpenStackConnector, OpenStackConnectorBuilder};
pub use types::{
    ConsoleKind, HypervisorStats, RemoteAddress, RemoteDiagnostics, RemoteFlavor,
    RemoteHypervisor, RemoteImageRef, RemoteNode, RemoteServer, RemoteService, RemoteVolume,
};

/// Error taxonomy for remote management API calls.
///
/// The engine maps these onto its failure-handling rules: `Transient` is
/// retried with bounded backoff, `NotFound` surfaces to the caller without
/// state mutation, and everything else fails the cluster pass (the cluster
/// is marked offline for this tick).
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The cluster or one of its control-plane endpoints is unreachable.
    #[error("connectivity failure: {0}")]
    Connectivity(String),

    /// A required service endpoint is missing from the cluster's catalog.
    /// Never retried.
    #[error("endpoint not found: {0}")]
    EndpointNotFound(String),

    /// Authentication against the cluster was rejected. Never retried.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Timeouts, connection failures and 5xx-class responses. Retried with
    /// bounded backoff before being treated as a connectivity failure.
    #[error("transient remote failure: {0}")]
    Transient(String),

    /// The requested resource does not exist on the remote side.
    #[error("not found: {0}")]
    NotFound(String),

    /// The remote answered with something we could not interpret.
    #[error("malformed remote response: {0}")]
    Protocol(String),
}

impl ConnectorError {
    pub fn is_transient(&self) -> bool {
        matches!(self, ConnectorError::Transient(_))
    }
}

/// Bounded exponential backoff for transient remote failures.
///
/// Mirrors the retry behavior applied to every management API call: a capped
/// number of attempts with an exponentially growing, capped delay, logging
/// each retry before sleeping. Non-transient errors are returned immediately.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_attempts: settings.connector.max_retries.max(1),
            base_delay: Duration::from_secs(settings.connector.retry_base_delay_seconds),
            max_delay: Duration::from_secs(settings.connector.retry_max_delay_seconds),
        }
    }

    /// Runs `op`, retrying transient failures until the attempt budget is
    /// exhausted. The last error is returned unchanged.
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T, ConnectorError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, ConnectorError>>,
    {
        let mut delay = self.base_delay;
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    warn!(
                        "{} failed, retrying in {}s... (attempt {}/{}): {}",
                        what,
                        delay.as_secs(),
                        attempt,
                        self.max_attempts,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(self.max_delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Bulk operations against one cluster's management APIs.
#[async_trait]
pub trait ClusterConnector: Send + Sync {
    /// Best-effort control-plane release detection. Never fails; returns
    /// "Unknown" when the version cannot be determined.
    async fn detect_release(&self) -> String;

    /// Lists the cluster's reported control-plane services.
    async fn list_services(&self) -> Result<Vec<RemoteService>, ConnectorError>;

    /// Lists hypervisor summaries.
    async fn list_hypervisors(&self) -> Result<Vec<RemoteHypervisor>, ConnectorError>;

    /// One bulk capacity-detail call instead of one call per host.
    async fn hypervisor_details_bulk(&self) -> Result<Vec<HypervisorStats>, ConnectorError>;

    /// Lists all instances across all tenants in one call.
    async fn list_servers_all_tenants(&self) -> Result<Vec<RemoteServer>, ConnectorError>;

    /// Lists all volumes across all tenants in one call.
    async fn list_volumes_all_tenants(&self) -> Result<Vec<RemoteVolume>, ConnectorError>;

    /// Lists bare-metal nodes with their driver metadata.
    async fn list_baremetal_nodes(&self) -> Result<Vec<RemoteNode>, ConnectorError>;

    /// Lists the cluster's flavor catalog.
    async fn list_flavors(&self) -> Result<Vec<RemoteFlavor>, ConnectorError>;

    /// Resolves a remote console URL for an instance.
    async fn console_url(&self, server_id: Uuid, kind: ConsoleKind)
        -> Result<String, ConnectorError>;

    /// Live-migrates an instance off its current host.
    async fn live_migrate(&self, server_id: Uuid) -> Result<(), ConnectorError>;

    /// Fetches point-in-time utilization for an instance.
    async fn server_diagnostics(&self, server_id: Uuid)
        -> Result<RemoteDiagnostics, ConnectorError>;
}

/// Opens a [`ClusterConnector`] for a stored cluster row.
#[async_trait]
pub trait ConnectorBuilder: Send + Sync {
    type Connector: ClusterConnector;

    /// Authenticates against the cluster and resolves its service endpoints.
    /// Failure here is the only fatal-per-cluster outcome of a sync pass.
    async fn open(&self, cluster: &Cluster) -> Result<Self::Connector, ConnectorError>;
}
