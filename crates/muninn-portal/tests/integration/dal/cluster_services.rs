use crate::fixtures::TestFixture;
use muninn_models::models::ServiceRecord;

fn record(binary: &str, host: &str, state: &str) -> ServiceRecord {
    ServiceRecord {
        binary: binary.to_string(),
        host: host.to_string(),
        zone: "nova".to_string(),
        status: "enabled".to_string(),
        state: state.to_string(),
        version: "Zed".to_string(),
    }
}

#[test]
fn test_upsert_by_composite_key() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("East");

    let created = fixture
        .dal
        .cluster_services()
        .upsert(cluster.id, &record("nova-compute", "compute-01", "up"))
        .expect("Failed to upsert service");

    // same (cluster, binary, host) updates in place, last write wins
    let updated = fixture
        .dal
        .cluster_services()
        .upsert(cluster.id, &record("nova-compute", "compute-01", "down"))
        .expect("Failed to upsert service");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.state, "down");

    // a different host is a different row
    fixture
        .dal
        .cluster_services()
        .upsert(cluster.id, &record("nova-compute", "compute-02", "up"))
        .unwrap();

    let services = fixture
        .dal
        .cluster_services()
        .list_for_cluster(cluster.id)
        .unwrap();
    assert_eq!(services.len(), 2);
}
