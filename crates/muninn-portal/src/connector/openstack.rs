/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! OpenStack-style management API connector.
//!
//! Authenticates against Keystone v3 with the cluster's stored credentials,
//! resolves service endpoints from the catalog and issues the bulk queries
//! the reconciliation engine needs. Raw payloads are mapped to the fixed
//! result types here and nowhere else.
//!
//! Clusters commonly run with self-signed certificates, so TLS verification
//! is configurable and off by default.

use async_trait::async_trait;
use muninn_models::models::clusters::Cluster;
use muninn_utils::Settings;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::types::*;
use super::{ClusterConnector, ConnectorBuilder, ConnectorError, RetryPolicy};
use crate::utils::encryption;

/// Service catalog types accepted for each endpoint the portal consumes.
const COMPUTE_TYPES: &[&str] = &["compute"];
const VOLUME_TYPES: &[&str] = &["volumev3", "block-storage", "volume"];
const BAREMETAL_TYPES: &[&str] = &["baremetal"];

/// Builds [`OpenStackConnector`] instances from stored cluster rows.
#[derive(Clone)]
pub struct OpenStackConnectorBuilder {
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl OpenStackConnectorBuilder {
    pub fn new(settings: &Settings) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(
                settings.connector.connect_timeout_seconds,
            ))
            .timeout(std::time::Duration::from_secs(
                settings.connector.read_timeout_seconds,
            ))
            .danger_accept_invalid_certs(!settings.connector.verify_tls)
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            retry: RetryPolicy::from_settings(settings),
        })
    }

    async fn authenticate(
        &self,
        auth_url: &str,
        body: &Value,
    ) -> Result<(String, Vec<WireCatalogEntry>), ConnectorError> {
        let url = format!("{}/auth/tokens", auth_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ConnectorError::Auth(format!(
                "identity service rejected credentials ({})",
                status
            )));
        }
        if !status.is_success() {
            return Err(classify_status(status, "authentication"));
        }

        let token = resp
            .headers()
            .get("x-subject-token")
            .and_then(|v| v.to_str().ok())
            .map(String::from)
            .ok_or_else(|| {
                ConnectorError::Protocol("auth response missing X-Subject-Token".to_string())
            })?;

        let auth: AuthResponse = resp
            .json()
            .await
            .map_err(|e| ConnectorError::Protocol(format!("auth response body: {}", e)))?;

        Ok((token, auth.token.catalog))
    }
}

#[async_trait]
impl ConnectorBuilder for OpenStackConnectorBuilder {
    type Connector = OpenStackConnector;

    async fn open(&self, cluster: &Cluster) -> Result<OpenStackConnector, ConnectorError> {
        let password = encryption::decrypt_string(&cluster.password_encrypted)
            .map_err(ConnectorError::Auth)?;

        let body = json!({
            "auth": {
                "identity": {
                    "methods": ["password"],
                    "password": {
                        "user": {
                            "name": cluster.username,
                            "domain": { "name": cluster.user_domain_name },
                            "password": password,
                        }
                    }
                },
                "scope": {
                    "project": {
                        "name": cluster.project_name,
                        "domain": { "name": cluster.project_domain_name },
                    }
                }
            }
        });

        let auth_url = cluster.auth_url.clone();
        let (token, catalog) = self
            .retry
            .run("keystone authentication", || {
                self.authenticate(&auth_url, &body)
            })
            .await?;

        let compute = resolve_endpoint(&catalog, COMPUTE_TYPES, &cluster.region_name)
            .ok_or_else(|| {
                ConnectorError::EndpointNotFound(format!(
                    "no public compute endpoint in region {}",
                    cluster.region_name
                ))
            })?;
        let volume = resolve_endpoint(&catalog, VOLUME_TYPES, &cluster.region_name);
        let baremetal = resolve_endpoint(&catalog, BAREMETAL_TYPES, &cluster.region_name);

        Ok(OpenStackConnector {
            client: self.client.clone(),
            retry: self.retry.clone(),
            token,
            compute,
            volume,
            baremetal,
        })
    }
}

/// A connector bound to one cluster's token and resolved endpoints.
pub struct OpenStackConnector {
    client: reqwest::Client,
    retry: RetryPolicy,
    token: String,
    compute: String,
    volume: Option<String>,
    baremetal: Option<String>,
}

impl OpenStackConnector {
    async fn get_json(&self, url: &str, context: &str) -> Result<Value, ConnectorError> {
        let resp = self
            .client
            .get(url)
            .header("X-Auth-Token", &self.token)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(classify_status(status, context));
        }

        resp.json()
            .await
            .map_err(|e| ConnectorError::Protocol(format!("{}: {}", context, e)))
    }

    async fn post_json(
        &self,
        url: &str,
        body: &Value,
        microversion: Option<&str>,
    ) -> Result<(StatusCode, Value), ConnectorError> {
        let mut req = self
            .client
            .post(url)
            .header("X-Auth-Token", &self.token)
            .json(body);
        if let Some(mv) = microversion {
            req = req.header("OpenStack-API-Version", format!("compute {}", mv));
        }

        let resp = req.send().await.map_err(classify_request_error)?;
        let status = resp.status();
        let value = resp.json().await.unwrap_or(Value::Null);

        Ok((status, value))
    }

    fn volume_endpoint(&self) -> Result<&str, ConnectorError> {
        self.volume.as_deref().ok_or_else(|| {
            ConnectorError::EndpointNotFound("no public block-storage endpoint".to_string())
        })
    }

    fn baremetal_endpoint(&self) -> Result<&str, ConnectorError> {
        self.baremetal.as_deref().ok_or_else(|| {
            ConnectorError::EndpointNotFound("no public bare-metal endpoint".to_string())
        })
    }
}

#[async_trait]
impl ClusterConnector for OpenStackConnector {
    async fn detect_release(&self) -> String {
        let url = format!("{}/", self.compute);
        match self.get_json(&url, "compute versions").await {
            Ok(value) => match max_microversion(&value) {
                Some(max) => release_name(max),
                None => "Unknown".to_string(),
            },
            Err(_) => "Unknown".to_string(),
        }
    }

    async fn list_services(&self) -> Result<Vec<RemoteService>, ConnectorError> {
        let url = format!("{}/os-services", self.compute);
        let value = self
            .retry
            .run("listing services", || self.get_json(&url, "os-services"))
            .await?;
        let resp: ServicesResponse = parse(value, "os-services")?;
        Ok(resp.services.into_iter().map(map_service).collect())
    }

    async fn list_hypervisors(&self) -> Result<Vec<RemoteHypervisor>, ConnectorError> {
        let url = format!("{}/os-hypervisors", self.compute);
        let value = self
            .retry
            .run("listing hypervisors", || self.get_json(&url, "os-hypervisors"))
            .await?;
        let resp: HypervisorsResponse = parse(value, "os-hypervisors")?;
        Ok(resp.hypervisors.into_iter().map(map_hypervisor).collect())
    }

    async fn hypervisor_details_bulk(&self) -> Result<Vec<HypervisorStats>, ConnectorError> {
        let url = format!("{}/os-hypervisors/detail", self.compute);
        let value = self
            .retry
            .run("fetching hypervisor details", || {
                self.get_json(&url, "os-hypervisors/detail")
            })
            .await?;
        let resp: HypervisorsResponse = parse(value, "os-hypervisors/detail")?;
        Ok(resp
            .hypervisors
            .into_iter()
            .map(map_hypervisor_stats)
            .collect())
    }

    async fn list_servers_all_tenants(&self) -> Result<Vec<RemoteServer>, ConnectorError> {
        let url = format!("{}/servers/detail?all_tenants=1", self.compute);
        let value = self
            .retry
            .run("listing servers", || self.get_json(&url, "servers/detail"))
            .await?;
        let resp: ServersResponse = parse(value, "servers/detail")?;
        Ok(resp.servers.into_iter().map(map_server).collect())
    }

    async fn list_volumes_all_tenants(&self) -> Result<Vec<RemoteVolume>, ConnectorError> {
        let endpoint = self.volume_endpoint()?;
        let url = format!("{}/volumes/detail?all_tenants=True", endpoint);
        let value = self
            .retry
            .run("listing volumes", || self.get_json(&url, "volumes/detail"))
            .await?;
        let resp: VolumesResponse = parse(value, "volumes/detail")?;
        Ok(resp.volumes.into_iter().map(map_volume).collect())
    }

    async fn list_baremetal_nodes(&self) -> Result<Vec<RemoteNode>, ConnectorError> {
        let endpoint = self.baremetal_endpoint()?;
        let url = format!("{}/v1/nodes/detail", endpoint.trim_end_matches('/'));
        let value = self
            .retry
            .run("listing bare-metal nodes", || self.get_json(&url, "nodes/detail"))
            .await?;
        let resp: NodesResponse = parse(value, "nodes/detail")?;
        Ok(resp.nodes.into_iter().map(map_node).collect())
    }

    async fn list_flavors(&self) -> Result<Vec<RemoteFlavor>, ConnectorError> {
        let url = format!("{}/flavors/detail?is_public=None", self.compute);
        let value = self
            .retry
            .run("listing flavors", || self.get_json(&url, "flavors/detail"))
            .await?;
        let resp: FlavorsResponse = parse(value, "flavors/detail")?;
        Ok(resp.flavors.into_iter().map(map_flavor).collect())
    }

    async fn console_url(
        &self,
        server_id: Uuid,
        kind: ConsoleKind,
    ) -> Result<String, ConnectorError> {
        let (protocol, console_type) = match kind {
            ConsoleKind::Novnc => ("vnc", "novnc"),
            ConsoleKind::Spice => ("spice", "spice-html5"),
        };

        // Modern remote-console endpoint (compute API 2.6+)
        let url = format!("{}/servers/{}/remote-console", self.compute, server_id);
        let body = json!({"remote_console": {"protocol": protocol, "type": console_type}});
        let (status, value) = self
            .post_json(&url, &body, Some("2.6"))
            .await?;
        if status.is_success() {
            if let Some(u) = value["remote_console"]["url"].as_str() {
                return Ok(u.to_string());
            }
        }

        // Legacy console action fallback
        let action = match kind {
            ConsoleKind::Novnc => json!({"os-getVNCConsole": {"type": "novnc"}}),
            ConsoleKind::Spice => json!({"os-getSPICEConsole": {"type": "spice-html5"}}),
        };
        let url = format!("{}/servers/{}/action", self.compute, server_id);
        let (status, value) = self.post_json(&url, &action, None).await?;
        if status.is_success() {
            if let Some(u) = value["console"]["url"].as_str() {
                return Ok(u.to_string());
            }
            return Err(ConnectorError::Protocol(
                "console response missing url".to_string(),
            ));
        }

        Err(classify_status(status, "console"))
    }

    async fn live_migrate(&self, server_id: Uuid) -> Result<(), ConnectorError> {
        let url = format!("{}/servers/{}/action", self.compute, server_id);
        let body = json!({"os-migrateLive": {"host": Value::Null, "block_migration": "auto"}});
        let (status, _) = self.post_json(&url, &body, None).await?;
        if status.is_success() {
            Ok(())
        } else {
            Err(classify_status(status, "live migration"))
        }
    }

    async fn server_diagnostics(
        &self,
        server_id: Uuid,
    ) -> Result<RemoteDiagnostics, ConnectorError> {
        let url = format!("{}/servers/{}/diagnostics", self.compute, server_id);
        let value = self.get_json(&url, "server diagnostics").await?;
        Ok(RemoteDiagnostics {
            cpu_usage_pct: value["cpu_util"].as_f64(),
            ram_usage_mb: value["memory_usage"].as_f64(),
        })
    }
}

// =============================================================================
// Error classification
// =============================================================================

fn classify_request_error(e: reqwest::Error) -> ConnectorError {
    if e.is_timeout() || e.is_connect() {
        ConnectorError::Transient(e.to_string())
    } else {
        ConnectorError::Connectivity(e.to_string())
    }
}

fn classify_status(status: StatusCode, context: &str) -> ConnectorError {
    match status.as_u16() {
        401 | 403 => ConnectorError::Auth(format!("{}: HTTP {}", context, status)),
        404 => ConnectorError::NotFound(format!("{}: HTTP {}", context, status)),
        500..=599 => ConnectorError::Transient(format!("{}: HTTP {}", context, status)),
        _ => ConnectorError::Protocol(format!("{}: HTTP {}", context, status)),
    }
}

fn parse<T: serde::de::DeserializeOwned>(value: Value, context: &str) -> Result<T, ConnectorError> {
    serde_json::from_value(value)
        .map_err(|e| ConnectorError::Protocol(format!("{}: {}", context, e)))
}

// =============================================================================
// Wire formats and boundary mapping
// =============================================================================

#[derive(Deserialize)]
struct AuthResponse {
    token: WireToken,
}

#[derive(Deserialize)]
struct WireToken {
    #[serde(default)]
    catalog: Vec<WireCatalogEntry>,
}

#[derive(Deserialize)]
pub(crate) struct WireCatalogEntry {
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    endpoints: Vec<WireEndpoint>,
}

#[derive(Deserialize)]
pub(crate) struct WireEndpoint {
    #[serde(default)]
    interface: Option<String>,
    #[serde(default)]
    region: Option<String>,
    url: String,
}

/// Picks the public endpoint of the first matching service type, preferring
/// an exact region match and falling back to any public endpoint.
fn resolve_endpoint(
    catalog: &[WireCatalogEntry],
    service_types: &[&str],
    region: &str,
) -> Option<String> {
    let entries: Vec<&WireCatalogEntry> = catalog
        .iter()
        .filter(|e| service_types.contains(&e.service_type.as_str()))
        .collect();

    fn public<'a>(e: &&'a WireCatalogEntry) -> Vec<&'a WireEndpoint> {
        e.endpoints
            .iter()
            .filter(|ep| ep.interface.as_deref().unwrap_or("public") == "public")
            .collect::<Vec<_>>()
    }

    for entry in &entries {
        if let Some(ep) = public(entry)
            .into_iter()
            .find(|ep| ep.region.as_deref() == Some(region))
        {
            return Some(ep.url.trim_end_matches('/').to_string());
        }
    }
    for entry in &entries {
        if let Some(ep) = public(entry).into_iter().next() {
            return Some(ep.url.trim_end_matches('/').to_string());
        }
    }
    None
}

#[derive(Deserialize)]
struct ServicesResponse {
    #[serde(default)]
    services: Vec<WireService>,
}

#[derive(Deserialize)]
struct WireService {
    binary: String,
    host: String,
    #[serde(default)]
    zone: Option<String>,
    status: String,
    state: String,
}

fn map_service(w: WireService) -> RemoteService {
    RemoteService {
        binary: w.binary,
        host: w.host,
        zone: w.zone,
        status: w.status,
        state: w.state,
    }
}

#[derive(Deserialize)]
struct HypervisorsResponse {
    #[serde(default)]
    hypervisors: Vec<WireHypervisor>,
}

#[derive(Deserialize)]
struct WireHypervisor {
    #[serde(default)]
    id: Value,
    #[serde(rename = "hypervisor_hostname")]
    hostname: String,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    host_ip: Option<String>,
    #[serde(default)]
    vcpus: Option<i32>,
    #[serde(default)]
    vcpus_used: Option<i32>,
    #[serde(default)]
    memory_mb: Option<i32>,
    #[serde(default)]
    memory_mb_used: Option<i32>,
}

/// Hypervisor ids are integers on older compute APIs and UUID strings on
/// newer ones; both are carried as strings.
fn value_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn map_hypervisor(w: WireHypervisor) -> RemoteHypervisor {
    RemoteHypervisor {
        id: value_to_string(&w.id),
        hostname: w.hostname,
        state: w.state.unwrap_or_else(|| "up".to_string()),
        status: w.status.unwrap_or_else(|| "enabled".to_string()),
        host_ip: w.host_ip,
        vcpus: w.vcpus,
        vcpus_used: w.vcpus_used,
        memory_mb: w.memory_mb,
        memory_mb_used: w.memory_mb_used,
    }
}

fn map_hypervisor_stats(w: WireHypervisor) -> HypervisorStats {
    HypervisorStats {
        hostname: w.hostname,
        vcpus: w.vcpus,
        vcpus_used: w.vcpus_used,
        memory_mb: w.memory_mb,
        memory_mb_used: w.memory_mb_used,
        host_ip: w.host_ip,
    }
}

#[derive(Deserialize)]
struct ServersResponse {
    #[serde(default)]
    servers: Vec<WireServer>,
}

#[derive(Deserialize)]
struct WireServer {
    id: Uuid,
    name: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    flavor: Option<Value>,
    #[serde(default)]
    tenant_id: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    key_name: Option<String>,
    #[serde(default)]
    addresses: Option<serde_json::Map<String, Value>>,
    #[serde(default)]
    image: Option<Value>,
    #[serde(default, rename = "OS-SRV-USG:launched_at")]
    launched_at: Option<String>,
    #[serde(default, rename = "OS-EXT-SRV-ATTR:hypervisor_hostname")]
    hypervisor_hostname: Option<String>,
    #[serde(default, rename = "OS-EXT-SRV-ATTR:host")]
    compute_host: Option<String>,
}

fn map_server(w: WireServer) -> RemoteServer {
    let addresses = w
        .addresses
        .unwrap_or_default()
        .into_iter()
        .map(|(network, addrs)| {
            let group = addrs
                .as_array()
                .map(|list| {
                    list.iter()
                        .filter_map(|a| {
                            let addr = a.get("addr")?.as_str()?.to_string();
                            let version = a.get("version").and_then(Value::as_i64).unwrap_or(0);
                            Some(RemoteAddress {
                                version: version as i32,
                                addr,
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();
            (network, group)
        })
        .collect();

    let image = match w.image {
        None | Some(Value::Null) => RemoteImageRef::None,
        Some(Value::String(s)) if s.is_empty() => RemoteImageRef::None,
        Some(Value::String(s)) => RemoteImageRef::Id(s),
        Some(Value::Object(o)) => RemoteImageRef::Reference {
            id: o.get("id").and_then(Value::as_str).map(String::from),
        },
        Some(_) => RemoteImageRef::None,
    };

    RemoteServer {
        id: w.id,
        name: w.name,
        status: w.status.unwrap_or_else(|| "unknown".to_string()),
        flavor_name: w
            .flavor
            .as_ref()
            .and_then(|f| f.get("original_name"))
            .and_then(Value::as_str)
            .map(String::from),
        project_id: w.tenant_id.unwrap_or_default(),
        user_id: w.user_id.unwrap_or_default(),
        hypervisor_hostname: w.hypervisor_hostname,
        compute_host: w.compute_host,
        addresses,
        image,
        key_name: w.key_name,
        launched_at: w.launched_at,
    }
}

#[derive(Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    volumes: Vec<WireVolume>,
}

#[derive(Deserialize)]
struct WireVolume {
    id: Uuid,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    size: Option<i32>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    bootable: Option<Value>,
    #[serde(default)]
    attachments: Vec<WireAttachment>,
}

#[derive(Deserialize)]
struct WireAttachment {
    #[serde(default)]
    server_id: Option<Uuid>,
    #[serde(default)]
    device: Option<String>,
}

/// The storage API reports `bootable` as the strings "true"/"false".
fn truthy(v: Option<&Value>) -> bool {
    match v {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn map_volume(w: WireVolume) -> RemoteVolume {
    RemoteVolume {
        id: w.id,
        name: w.name,
        size_gb: w.size,
        status: w.status,
        is_bootable: truthy(w.bootable.as_ref()),
        attachments: w
            .attachments
            .into_iter()
            .map(|a| RemoteAttachment {
                server_id: a.server_id,
                device: a.device,
            })
            .collect(),
    }
}

#[derive(Deserialize)]
struct NodesResponse {
    #[serde(default)]
    nodes: Vec<WireNode>,
}

#[derive(Deserialize)]
struct WireNode {
    uuid: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    instance_uuid: Option<String>,
    #[serde(default)]
    driver_info: Option<serde_json::Map<String, Value>>,
}

fn map_node(w: WireNode) -> RemoteNode {
    let bmc_address = w.driver_info.as_ref().and_then(|info| {
        ["redfish_address", "ipmi_address", "drac_address"]
            .iter()
            .find_map(|key| info.get(*key).and_then(Value::as_str))
            .map(String::from)
    });

    RemoteNode {
        id: w.uuid,
        name: w.name,
        instance_id: w.instance_uuid,
        bmc_address,
    }
}

#[derive(Deserialize)]
struct FlavorsResponse {
    #[serde(default)]
    flavors: Vec<WireFlavor>,
}

#[derive(Deserialize)]
struct WireFlavor {
    #[serde(default)]
    id: Value,
    name: String,
    #[serde(default)]
    vcpus: Option<i32>,
    #[serde(default)]
    ram: Option<i32>,
    #[serde(default)]
    disk: Option<i32>,
    #[serde(default, rename = "os-flavor-access:is_public")]
    is_public: Option<bool>,
}

fn map_flavor(w: WireFlavor) -> RemoteFlavor {
    RemoteFlavor {
        id: value_to_string(&w.id),
        name: w.name,
        vcpus: w.vcpus.unwrap_or(1),
        ram_mb: w.ram.unwrap_or(0),
        disk_gb: w.disk.unwrap_or(0),
        is_public: w.is_public.unwrap_or(true),
    }
}

// =============================================================================
// Release detection
// =============================================================================

/// Extracts the highest compute microversion from either shape of the
/// versions document (a `versions` list or a single `version` object).
fn max_microversion(value: &Value) -> Option<f64> {
    let candidates: Vec<&Value> = match value.get("versions").and_then(Value::as_array) {
        Some(list) => list.iter().collect(),
        None => value.get("version").into_iter().collect(),
    };

    candidates
        .iter()
        .filter_map(|v| v.get("version").and_then(Value::as_str))
        .filter_map(|s| s.parse::<f64>().ok())
        .fold(None, |max, v| match max {
            Some(m) if m >= v => Some(m),
            _ => Some(v),
        })
}

fn release_name(max_version: f64) -> String {
    if max_version >= 2.95 {
        "2023.2 (Bobcat)".to_string()
    } else if max_version >= 2.93 {
        "2023.1 (Antelope)".to_string()
    } else if max_version >= 2.90 {
        "Zed".to_string()
    } else {
        format!("Unknown (API v{})", max_version)
    }
}

// =============================================================================
// Tests
// =============================================================================
