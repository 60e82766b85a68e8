use crate::fixtures::TestFixture;
use muninn_models::models::HostRecord;

fn record(hostname: &str) -> HostRecord {
    HostRecord {
        hostname: hostname.to_string(),
        ip_address: "10.0.0.10".to_string(),
        idrac_ip: None,
        state: "up".to_string(),
        status: "enabled".to_string(),
        cpu_count: 64,
        vcpus_used: 8,
        memory_mb: 256_000,
        memory_mb_used: 64_000,
        openstack_version: "Zed".to_string(),
    }
}

#[test]
fn test_upsert_creates_then_updates_by_natural_key() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("East");

    let created = fixture
        .dal
        .physical_hosts()
        .upsert(cluster.id, &record("compute-01"))
        .expect("Failed to upsert host");
    assert_eq!(created.cpu_count, 64);

    let mut changed = record("compute-01");
    changed.cpu_count = 96;
    changed.vcpus_used = 40;
    let updated = fixture
        .dal
        .physical_hosts()
        .upsert(cluster.id, &changed)
        .expect("Failed to upsert host");

    // same row, updated in place
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.cpu_count, 96);
    assert_eq!(updated.vcpus_used, 40);

    let count = fixture
        .dal
        .physical_hosts()
        .count_for_cluster(cluster.id)
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_upsert_same_hostname_in_two_clusters() {
    let fixture = TestFixture::new();
    let cluster_a = fixture.insert_test_cluster("East");
    let cluster_b = fixture.insert_test_cluster("West");

    let host_a = fixture
        .dal
        .physical_hosts()
        .upsert(cluster_a.id, &record("compute-01"))
        .unwrap();
    let host_b = fixture
        .dal
        .physical_hosts()
        .upsert(cluster_b.id, &record("compute-01"))
        .unwrap();

    // the natural key is (cluster, hostname), not hostname alone
    assert_ne!(host_a.id, host_b.id);
}

#[test]
fn test_upsert_never_clears_bmc_address() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("East");

    let mut with_bmc = record("compute-01");
    with_bmc.idrac_ip = Some("10.1.1.1".to_string());
    fixture
        .dal
        .physical_hosts()
        .upsert(cluster.id, &with_bmc)
        .unwrap();

    // a later pass without a BMC discovery leaves the stored value alone
    let updated = fixture
        .dal
        .physical_hosts()
        .upsert(cluster.id, &record("compute-01"))
        .unwrap();
    assert_eq!(updated.idrac_ip.as_deref(), Some("10.1.1.1"));
}

#[test]
fn test_upsert_preserves_operator_owned_fields() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("East");
    let profile = fixture.insert_test_cost_profile(200.0, 400);

    let host = fixture
        .dal
        .physical_hosts()
        .upsert(cluster.id, &record("compute-01"))
        .unwrap();
    fixture
        .dal
        .physical_hosts()
        .set_maintenance(host.id, true)
        .unwrap();
    fixture
        .dal
        .physical_hosts()
        .set_cost_profile(host.id, Some(profile.id))
        .unwrap();

    let resynced = fixture
        .dal
        .physical_hosts()
        .upsert(cluster.id, &record("compute-01"))
        .unwrap();

    assert!(resynced.is_maintenance);
    assert_eq!(resynced.cost_profile_id, Some(profile.id));
}

#[test]
fn test_update_hardware_info_leaves_capacity_alone() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("East");
    let host = fixture.insert_test_host(cluster.id, "compute-01");

    fixture
        .dal
        .physical_hosts()
        .update_hardware_info(host.id, "ABC1234", "PowerEdge R740", "OK")
        .expect("Failed to update hardware info");

    let updated = fixture.dal.physical_hosts().get(host.id).unwrap().unwrap();
    assert_eq!(updated.service_tag, "ABC1234");
    assert_eq!(updated.server_model, "PowerEdge R740");
    assert_eq!(updated.hardware_health, "OK");
    // capacity fields owned by the sync path are untouched
    assert_eq!(updated.cpu_count, host.cpu_count);
    assert_eq!(updated.memory_mb, host.memory_mb);
}

#[test]
fn test_list_with_bmc() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("East");

    let mut with_bmc = record("compute-01");
    with_bmc.idrac_ip = Some("10.250.0.1".to_string());
    let host = fixture
        .dal
        .physical_hosts()
        .upsert(cluster.id, &with_bmc)
        .unwrap();
    fixture
        .dal
        .physical_hosts()
        .upsert(cluster.id, &record("compute-02"))
        .unwrap();

    let polled = fixture.dal.physical_hosts().list_with_bmc().unwrap();
    assert!(polled.iter().any(|h| h.id == host.id));
    assert!(polled.iter().all(|h| h.idrac_ip.as_deref().unwrap_or("") != ""));
}
