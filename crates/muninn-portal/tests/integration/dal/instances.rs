use crate::fixtures::TestFixture;
use chrono::{TimeZone, Utc};
use muninn_models::models::InstanceRecord;
use uuid::Uuid;

fn record(id: Uuid, name: &str) -> InstanceRecord {
    InstanceRecord {
        id,
        name: name.to_string(),
        status: "ACTIVE".to_string(),
        flavor_name: "m1.small".to_string(),
        project_id: "project-a".to_string(),
        user_id: "user-1".to_string(),
        image_ref: "img-1".to_string(),
        key_name: "ops".to_string(),
        launched_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
        ip_address: Some("192.168.1.5".to_string()),
        network_name: "provider-net".to_string(),
    }
}

#[test]
fn test_upsert_keeps_remote_id() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("East");
    let host = fixture.insert_test_host(cluster.id, "compute-01");
    let remote_id = Uuid::new_v4();

    let created = fixture
        .dal
        .instances()
        .upsert(Some(host.id), &record(remote_id, "vm-1"))
        .expect("Failed to upsert instance");
    assert_eq!(created.id, remote_id);

    let mut renamed = record(remote_id, "vm-1-renamed");
    renamed.status = "SHUTOFF".to_string();
    let updated = fixture
        .dal
        .instances()
        .upsert(Some(host.id), &renamed)
        .expect("Failed to upsert instance");

    assert_eq!(updated.id, remote_id);
    assert_eq!(updated.name, "vm-1-renamed");
    assert_eq!(updated.status, "SHUTOFF");
}

#[test]
fn test_bulk_upsert_does_not_touch_usage() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("East");
    let host = fixture.insert_test_host(cluster.id, "compute-01");
    let remote_id = Uuid::new_v4();

    fixture
        .dal
        .instances()
        .upsert(Some(host.id), &record(remote_id, "vm-1"))
        .unwrap();
    fixture
        .dal
        .instances()
        .update_usage(remote_id, 42.5, 2048.0)
        .expect("Failed to update usage");

    // a later bulk sync pass leaves the refreshed usage in place
    let resynced = fixture
        .dal
        .instances()
        .upsert(Some(host.id), &record(remote_id, "vm-1"))
        .unwrap();

    assert_eq!(resynced.last_cpu_usage_pct, 42.5);
    assert_eq!(resynced.last_ram_usage_mb, 2048.0);
}

#[test]
fn test_instance_orphaned_when_host_deleted() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("East");
    let host = fixture.insert_test_host(cluster.id, "compute-01");
    let remote_id = Uuid::new_v4();

    fixture
        .dal
        .instances()
        .upsert(Some(host.id), &record(remote_id, "vm-1"))
        .unwrap();

    // deleting the cluster cascades to the host; the instance survives with
    // its remote identity and a null host reference
    fixture.dal.clusters().delete(cluster.id).unwrap();

    let orphan = fixture.dal.instances().get(remote_id).unwrap().unwrap();
    assert!(orphan.host_id.is_none());
}

#[test]
fn test_list_for_cluster() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("East");
    let other = fixture.insert_test_cluster("West");
    let host = fixture.insert_test_host(cluster.id, "compute-01");
    let other_host = fixture.insert_test_host(other.id, "compute-01");

    fixture
        .dal
        .instances()
        .upsert(Some(host.id), &record(Uuid::new_v4(), "vm-1"))
        .unwrap();
    fixture
        .dal
        .instances()
        .upsert(Some(other_host.id), &record(Uuid::new_v4(), "vm-2"))
        .unwrap();

    let instances = fixture.dal.instances().list_for_cluster(cluster.id).unwrap();
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].name, "vm-1");
}
