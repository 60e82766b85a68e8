// Fixed-shape result types for remote management API calls.
//
// These are the only shapes the engine ever sees; raw payload mapping
// happens once, inside the connector implementation.

use uuid::Uuid;

/// A reported control-plane service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteService {
    pub binary: String,
    pub host: String,
    pub zone: Option<String>,
    pub status: String,
    pub state: String,
}

/// A hypervisor summary as reported by the compute API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteHypervisor {
    pub id: String,
    pub hostname: String,
    pub state: String,
    pub status: String,
    pub host_ip: Option<String>,
    pub vcpus: Option<i32>,
    pub vcpus_used: Option<i32>,
    pub memory_mb: Option<i32>,
    pub memory_mb_used: Option<i32>,
}

/// One entry of the bulk hypervisor capacity-detail call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HypervisorStats {
    pub hostname: String,
    pub vcpus: Option<i32>,
    pub vcpus_used: Option<i32>,
    pub memory_mb: Option<i32>,
    pub memory_mb_used: Option<i32>,
    pub host_ip: Option<String>,
}

/// One address within a server's reported network attachment group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAddress {
    pub version: i32,
    pub addr: String,
}

/// A server's image reference, which remotes report in three shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteImageRef {
    /// No image (e.g. boot-from-volume).
    None,
    /// A bare image identifier string.
    Id(String),
    /// A structured reference; the identifier may itself be missing.
    Reference { id: Option<String> },
}

/// A server (instance) as reported by the compute API.
///
/// `addresses` preserves the order the remote reported; the engine's
/// first-IPv4-wins rule depends on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteServer {
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub flavor_name: Option<String>,
    pub project_id: String,
    pub user_id: String,
    pub hypervisor_hostname: Option<String>,
    pub compute_host: Option<String>,
    pub addresses: Vec<(String, Vec<RemoteAddress>)>,
    pub image: RemoteImageRef,
    pub key_name: Option<String>,
    pub launched_at: Option<String>,
}

/// One attachment entry of a reported volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAttachment {
    pub server_id: Option<Uuid>,
    pub device: Option<String>,
}

/// A block-storage volume as reported by the storage API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteVolume {
    pub id: Uuid,
    pub name: Option<String>,
    pub size_gb: Option<i32>,
    pub status: Option<String>,
    pub is_bootable: bool,
    pub attachments: Vec<RemoteAttachment>,
}

/// A bare-metal node with its out-of-band management address.
///
/// `bmc_address` carries the raw driver metadata value (redfish, ipmi or
/// drac address, in that precedence); normalization is left to the map
/// builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteNode {
    pub id: String,
    pub name: Option<String>,
    pub instance_id: Option<String>,
    pub bmc_address: Option<String>,
}

/// A flavor catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFlavor {
    pub id: String,
    pub name: String,
    pub vcpus: i32,
    pub ram_mb: i32,
    pub disk_gb: i32,
    pub is_public: bool,
}

/// Point-in-time utilization for one instance.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteDiagnostics {
    pub cpu_usage_pct: Option<f64>,
    pub ram_usage_mb: Option<f64>,
}

/// Remote console flavors the portal can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleKind {
    Novnc,
    Spice,
}
