//! Reconciliation engine tests against a mocked connector.

use std::collections::HashMap;

use async_trait::async_trait;
use muninn_models::models::clusters::{Cluster, STATUS_OFFLINE, STATUS_ONLINE};
use muninn_models::models::audit_logs::{
    ACTION_INVENTORY_SYNC_FAILED, ACTION_INVENTORY_SYNC_SUCCESS,
};
use muninn_portal::connector::types::RemoteAttachment;
use muninn_portal::connector::{
    ClusterConnector, ConnectorBuilder, ConnectorError, ConsoleKind, HypervisorStats,
    RemoteAddress, RemoteDiagnostics, RemoteFlavor, RemoteHypervisor, RemoteImageRef, RemoteNode,
    RemoteServer, RemoteService, RemoteVolume,
};
use muninn_portal::sync::inventory::{run_inventory_sync, sync_cluster};
use serial_test::serial;
use uuid::Uuid;

use crate::fixtures::TestFixture;

#[derive(Clone, Default)]
struct MockData {
    services: Vec<RemoteService>,
    hypervisors: Vec<RemoteHypervisor>,
    stats: Vec<HypervisorStats>,
    servers: Vec<RemoteServer>,
    volumes: Vec<RemoteVolume>,
    nodes: Vec<RemoteNode>,
    flavors: Vec<RemoteFlavor>,
}

struct MockConnector {
    data: MockData,
}

#[async_trait]
impl ClusterConnector for MockConnector {
    async fn detect_release(&self) -> String {
        "Zed".to_string()
    }

    async fn list_services(&self) -> Result<Vec<RemoteService>, ConnectorError> {
        Ok(self.data.services.clone())
    }

    async fn list_hypervisors(&self) -> Result<Vec<RemoteHypervisor>, ConnectorError> {
        Ok(self.data.hypervisors.clone())
    }

    async fn hypervisor_details_bulk(&self) -> Result<Vec<HypervisorStats>, ConnectorError> {
        Ok(self.data.stats.clone())
    }

    async fn list_servers_all_tenants(&self) -> Result<Vec<RemoteServer>, ConnectorError> {
        Ok(self.data.servers.clone())
    }

    async fn list_volumes_all_tenants(&self) -> Result<Vec<RemoteVolume>, ConnectorError> {
        Ok(self.data.volumes.clone())
    }

    async fn list_baremetal_nodes(&self) -> Result<Vec<RemoteNode>, ConnectorError> {
        Ok(self.data.nodes.clone())
    }

    async fn list_flavors(&self) -> Result<Vec<RemoteFlavor>, ConnectorError> {
        Ok(self.data.flavors.clone())
    }

    async fn console_url(
        &self,
        _server_id: Uuid,
        _kind: ConsoleKind,
    ) -> Result<String, ConnectorError> {
        Ok("https://console.test.local/vnc?token=t".to_string())
    }

    async fn live_migrate(&self, _server_id: Uuid) -> Result<(), ConnectorError> {
        Ok(())
    }

    async fn server_diagnostics(
        &self,
        _server_id: Uuid,
    ) -> Result<RemoteDiagnostics, ConnectorError> {
        Ok(RemoteDiagnostics {
            cpu_usage_pct: Some(12.5),
            ram_usage_mb: Some(1024.0),
        })
    }
}

/// Serves canned data per cluster id; clusters it does not know are
/// unreachable.
struct MockBuilder {
    data: HashMap<Uuid, MockData>,
}

#[async_trait]
impl ConnectorBuilder for MockBuilder {
    type Connector = MockConnector;

    async fn open(&self, cluster: &Cluster) -> Result<MockConnector, ConnectorError> {
        match self.data.get(&cluster.id) {
            Some(data) => Ok(MockConnector { data: data.clone() }),
            None => Err(ConnectorError::Connectivity(
                "cluster unreachable".to_string(),
            )),
        }
    }
}

fn hypervisor(hostname: &str) -> RemoteHypervisor {
    RemoteHypervisor {
        id: "1".to_string(),
        hostname: hostname.to_string(),
        state: "up".to_string(),
        status: "enabled".to_string(),
        host_ip: Some("10.0.0.11".to_string()),
        vcpus: Some(48),
        vcpus_used: Some(4),
        memory_mb: Some(128_000),
        memory_mb_used: Some(16_000),
    }
}

fn server(id: Uuid, name: &str, hostname: &str) -> RemoteServer {
    RemoteServer {
        id,
        name: name.to_string(),
        status: "ACTIVE".to_string(),
        flavor_name: Some("m1.small".to_string()),
        project_id: "project-a".to_string(),
        user_id: "user-1".to_string(),
        hypervisor_hostname: Some(hostname.to_string()),
        compute_host: None,
        addresses: vec![
            (
                "internal-net".to_string(),
                vec![RemoteAddress {
                    version: 6,
                    addr: "fd00::5".to_string(),
                }],
            ),
            (
                "provider-net".to_string(),
                vec![RemoteAddress {
                    version: 4,
                    addr: "192.168.1.5".to_string(),
                }],
            ),
        ],
        image: RemoteImageRef::Reference {
            id: Some("img-1".to_string()),
        },
        key_name: Some("ops".to_string()),
        launched_at: Some("2024-03-01T12:00:00Z".to_string()),
    }
}

fn healthy_data(hostname: &str, instance_id: Uuid, volume_id: Uuid) -> MockData {
    MockData {
        services: vec![RemoteService {
            binary: "nova-compute".to_string(),
            host: hostname.to_string(),
            zone: Some("nova".to_string()),
            status: "enabled".to_string(),
            state: "up".to_string(),
        }],
        hypervisors: vec![hypervisor(hostname)],
        stats: vec![HypervisorStats {
            hostname: hostname.to_string(),
            vcpus: Some(64),
            vcpus_used: Some(8),
            memory_mb: Some(256_000),
            memory_mb_used: Some(32_000),
            host_ip: Some("10.0.0.12".to_string()),
        }],
        servers: vec![server(instance_id, "vm-1", hostname)],
        volumes: vec![RemoteVolume {
            id: volume_id,
            name: Some("root-disk".to_string()),
            size_gb: Some(40),
            status: Some("in-use".to_string()),
            is_bootable: true,
            attachments: vec![RemoteAttachment {
                server_id: Some(instance_id),
                device: Some("/dev/vda".to_string()),
            }],
        }],
        nodes: vec![RemoteNode {
            id: "node-1".to_string(),
            name: Some(hostname.to_string()),
            instance_id: None,
            bmc_address: Some("https://10.250.0.1/redfish/v1".to_string()),
        }],
        flavors: vec![],
    }
}

#[tokio::test]
#[serial]
async fn test_sync_cluster_full_pass() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("Sync");
    let instance_id = Uuid::new_v4();
    let volume_id = Uuid::new_v4();
    let hostname = format!("compute-{}", Uuid::new_v4());

    let connector = MockConnector {
        data: healthy_data(&hostname, instance_id, volume_id),
    };

    let summary = sync_cluster(&fixture.dal, &connector, &cluster)
        .await
        .expect("Sync pass failed");
    assert_eq!(summary.host_count, 1);

    // cluster flipped online
    let cluster = fixture.dal.clusters().get(cluster.id).unwrap().unwrap();
    assert_eq!(cluster.status, STATUS_ONLINE);

    // host upserted with bulk stats taking precedence over the summary
    let host = fixture
        .dal
        .physical_hosts()
        .find_by_hostname(cluster.id, &hostname)
        .unwrap()
        .unwrap();
    assert_eq!(host.cpu_count, 64);
    assert_eq!(host.memory_mb, 256_000);
    assert_eq!(host.ip_address, "10.0.0.12");
    assert_eq!(host.idrac_ip.as_deref(), Some("10.250.0.1"));
    assert_eq!(host.openstack_version, "Zed");

    // instance upserted under the host with extracted fields
    let instance = fixture.dal.instances().get(instance_id).unwrap().unwrap();
    assert_eq!(instance.host_id, Some(host.id));
    assert_eq!(instance.ip_address.as_deref(), Some("192.168.1.5"));
    assert_eq!(instance.network_name, "provider-net");
    assert_eq!(instance.image_ref, "img-1");
    assert!(instance.launched_at.is_some());

    // volume attached with its device path
    let volume = fixture.dal.volumes().get(volume_id).unwrap().unwrap();
    assert_eq!(volume.instance_id, instance_id);
    assert_eq!(volume.device, "/dev/vda");
    assert!(volume.is_bootable);

    // service row present
    let services = fixture
        .dal
        .cluster_services()
        .list_for_cluster(cluster.id)
        .unwrap();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].version, "Zed");
}

#[tokio::test]
#[serial]
async fn test_sync_cluster_is_idempotent() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("Sync");
    let instance_id = Uuid::new_v4();
    let volume_id = Uuid::new_v4();
    let hostname = format!("compute-{}", Uuid::new_v4());

    let connector = MockConnector {
        data: healthy_data(&hostname, instance_id, volume_id),
    };

    sync_cluster(&fixture.dal, &connector, &cluster)
        .await
        .expect("First pass failed");
    let host_first = fixture
        .dal
        .physical_hosts()
        .find_by_hostname(cluster.id, &hostname)
        .unwrap()
        .unwrap();
    let instance_first = fixture.dal.instances().get(instance_id).unwrap().unwrap();

    sync_cluster(&fixture.dal, &connector, &cluster)
        .await
        .expect("Second pass failed");

    // identical row counts
    assert_eq!(
        fixture
            .dal
            .physical_hosts()
            .count_for_cluster(cluster.id)
            .unwrap(),
        1
    );
    assert_eq!(fixture.dal.instances().list_for_cluster(cluster.id).unwrap().len(), 1);
    assert_eq!(fixture.dal.volumes().list_for_instance(instance_id).unwrap().len(), 1);

    // identical field values (timestamps aside)
    let host_second = fixture
        .dal
        .physical_hosts()
        .find_by_hostname(cluster.id, &hostname)
        .unwrap()
        .unwrap();
    assert_eq!(host_second.id, host_first.id);
    assert_eq!(host_second.cpu_count, host_first.cpu_count);
    assert_eq!(host_second.vcpus_used, host_first.vcpus_used);
    assert_eq!(host_second.ip_address, host_first.ip_address);
    assert_eq!(host_second.idrac_ip, host_first.idrac_ip);

    let instance_second = fixture.dal.instances().get(instance_id).unwrap().unwrap();
    assert_eq!(instance_second.name, instance_first.name);
    assert_eq!(instance_second.ip_address, instance_first.ip_address);
    assert_eq!(instance_second.launched_at, instance_first.launched_at);
}

#[tokio::test]
#[serial]
async fn test_failing_cluster_does_not_block_others() {
    let fixture = TestFixture::new();
    let healthy = fixture.insert_test_cluster("Healthy");
    let broken = fixture.insert_test_cluster("Broken");

    let healthy_hostname = format!("compute-{}", Uuid::new_v4());
    let broken_hostname = format!("compute-{}", Uuid::new_v4());

    // The broken cluster fails partway through host sync: its host row
    // commits, then an oversized instance name blows up the instance upsert.
    let mut broken_data = healthy_data(&broken_hostname, Uuid::new_v4(), Uuid::new_v4());
    broken_data.servers = vec![server(Uuid::new_v4(), &"x".repeat(300), &broken_hostname)];

    let builder = MockBuilder {
        data: HashMap::from([
            (
                healthy.id,
                healthy_data(&healthy_hostname, Uuid::new_v4(), Uuid::new_v4()),
            ),
            (broken.id, broken_data),
        ]),
    };

    run_inventory_sync(&fixture.dal, &builder).await;

    // the healthy cluster is online with its inventory in place
    let healthy_row = fixture.dal.clusters().get(healthy.id).unwrap().unwrap();
    assert_eq!(healthy_row.status, STATUS_ONLINE);
    assert_eq!(
        fixture
            .dal
            .physical_hosts()
            .count_for_cluster(healthy.id)
            .unwrap(),
        1
    );

    // the broken cluster is offline, but the host committed before the
    // failure is intact
    let broken_row = fixture.dal.clusters().get(broken.id).unwrap().unwrap();
    assert_eq!(broken_row.status, STATUS_OFFLINE);
    assert!(fixture
        .dal
        .physical_hosts()
        .find_by_hostname(broken.id, &broken_hostname)
        .unwrap()
        .is_some());

    // audit entries reflect both outcomes
    let healthy_history = fixture
        .dal
        .audit_logs()
        .get_target_history(&healthy.name, 10)
        .unwrap();
    assert!(healthy_history
        .iter()
        .any(|e| e.action == ACTION_INVENTORY_SYNC_SUCCESS));

    let broken_history = fixture
        .dal
        .audit_logs()
        .get_target_history(&broken.name, 10)
        .unwrap();
    assert!(broken_history
        .iter()
        .any(|e| e.action == ACTION_INVENTORY_SYNC_FAILED));
}

#[tokio::test]
#[serial]
async fn test_unreachable_cluster_marked_offline() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("Unreachable");

    let builder = MockBuilder {
        data: HashMap::new(),
    };

    run_inventory_sync(&fixture.dal, &builder).await;

    let row = fixture.dal.clusters().get(cluster.id).unwrap().unwrap();
    assert_eq!(row.status, STATUS_OFFLINE);

    let history = fixture
        .dal
        .audit_logs()
        .get_target_history(&cluster.name, 10)
        .unwrap();
    assert!(history
        .iter()
        .any(|e| e.action == ACTION_INVENTORY_SYNC_FAILED));
}

#[tokio::test]
#[serial]
async fn test_evacuate_host_migrates_instances() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("Ops");
    let instance_id = Uuid::new_v4();
    let volume_id = Uuid::new_v4();
    let hostname = format!("compute-{}", Uuid::new_v4());

    let data = healthy_data(&hostname, instance_id, volume_id);
    let connector = MockConnector { data: data.clone() };
    sync_cluster(&fixture.dal, &connector, &cluster)
        .await
        .expect("Seed pass failed");

    let host = fixture
        .dal
        .physical_hosts()
        .find_by_hostname(cluster.id, &hostname)
        .unwrap()
        .unwrap();

    let builder = MockBuilder {
        data: HashMap::from([(cluster.id, data)]),
    };
    let migrated = muninn_portal::ops::evacuate_host(&fixture.dal, &builder, host.id)
        .await
        .expect("Evacuation failed");
    assert_eq!(migrated, 1);

    let history = fixture
        .dal
        .audit_logs()
        .get_target_history(&hostname, 10)
        .unwrap();
    assert!(history
        .iter()
        .any(|e| e.action == muninn_models::models::audit_logs::ACTION_HOST_EVACUATED));
}

#[tokio::test]
#[serial]
async fn test_refresh_instance_usage() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("Ops");
    let instance_id = Uuid::new_v4();
    let volume_id = Uuid::new_v4();
    let hostname = format!("compute-{}", Uuid::new_v4());

    let data = healthy_data(&hostname, instance_id, volume_id);
    let connector = MockConnector { data: data.clone() };
    sync_cluster(&fixture.dal, &connector, &cluster)
        .await
        .expect("Seed pass failed");

    // the bulk pass leaves utilization at its defaults
    let before = fixture.dal.instances().get(instance_id).unwrap().unwrap();
    assert_eq!(before.last_cpu_usage_pct, 0.0);

    let builder = MockBuilder {
        data: HashMap::from([(cluster.id, data)]),
    };
    let refreshed =
        muninn_portal::ops::refresh_instance_usage(&fixture.dal, &builder, instance_id)
            .await
            .expect("Refresh failed");

    assert_eq!(refreshed.last_cpu_usage_pct, 12.5);
    assert_eq!(refreshed.last_ram_usage_mb, 1024.0);
}

#[tokio::test]
#[serial]
async fn test_console_url_for_missing_instance() {
    let fixture = TestFixture::new();

    let builder = MockBuilder {
        data: HashMap::new(),
    };
    let result = muninn_portal::ops::instance_console_url(
        &fixture.dal,
        &builder,
        Uuid::new_v4(),
        ConsoleKind::Novnc,
    )
    .await;

    assert!(matches!(result, Err(muninn_portal::ops::OpsError::NotFound(_))));
}

#[tokio::test]
#[serial]
async fn test_degraded_maps_still_sync_hosts() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("Degraded");
    let hostname = format!("compute-{}", Uuid::new_v4());

    // only hypervisor summaries are available; every bulk map is empty
    let connector = MockConnector {
        data: MockData {
            hypervisors: vec![hypervisor(&hostname)],
            ..Default::default()
        },
    };

    let summary = sync_cluster(&fixture.dal, &connector, &cluster)
        .await
        .expect("Degraded pass failed");
    assert_eq!(summary.host_count, 1);

    // host capacity comes from the summary fields, nothing else synced
    let host = fixture
        .dal
        .physical_hosts()
        .find_by_hostname(cluster.id, &hostname)
        .unwrap()
        .unwrap();
    assert_eq!(host.cpu_count, 48);
    assert!(host.idrac_ip.is_none());
    assert!(fixture.dal.instances().list_for_host(host.id).unwrap().is_empty());
}
