use crate::fixtures::TestFixture;
use muninn_models::models::clusters::{STATUS_OFFLINE, STATUS_ONLINE, STATUS_UNKNOWN};
use serial_test::serial;

#[test]
#[serial]
fn test_create_and_get_cluster() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("East");

    let retrieved = fixture
        .dal
        .clusters()
        .get(cluster.id)
        .expect("Failed to get cluster")
        .unwrap();

    assert_eq!(retrieved.id, cluster.id);
    assert_eq!(retrieved.name, cluster.name);
    assert_eq!(retrieved.status, STATUS_UNKNOWN);
    assert_eq!(retrieved.region_name, "RegionOne");
}

#[test]
#[serial]
fn test_set_status_only_touches_changed_rows() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("East");

    // unknown -> online changes the row
    let affected = fixture
        .dal
        .clusters()
        .set_status(cluster.id, STATUS_ONLINE)
        .expect("Failed to set status");
    assert_eq!(affected, 1);

    // online -> online is a no-op
    let affected = fixture
        .dal
        .clusters()
        .set_status(cluster.id, STATUS_ONLINE)
        .expect("Failed to set status");
    assert_eq!(affected, 0);

    let affected = fixture
        .dal
        .clusters()
        .set_status(cluster.id, STATUS_OFFLINE)
        .expect("Failed to set status");
    assert_eq!(affected, 1);

    let retrieved = fixture.dal.clusters().get(cluster.id).unwrap().unwrap();
    assert_eq!(retrieved.status, STATUS_OFFLINE);
}

#[test]
fn test_delete_cluster_cascades_to_hosts() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("East");
    let host = fixture.insert_test_host(cluster.id, "compute-01");

    fixture
        .dal
        .clusters()
        .delete(cluster.id)
        .expect("Failed to delete cluster");

    assert!(fixture.dal.clusters().get(cluster.id).unwrap().is_none());
    assert!(fixture.dal.physical_hosts().get(host.id).unwrap().is_none());
}
