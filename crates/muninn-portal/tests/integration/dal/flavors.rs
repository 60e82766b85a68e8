use crate::fixtures::TestFixture;
use muninn_models::models::FlavorRecord;

#[test]
fn test_upsert_by_remote_id() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("East");

    let record = FlavorRecord {
        id: format!("flavor-{}", uuid::Uuid::new_v4()),
        name: "m1.small".to_string(),
        vcpus: 2,
        ram_mb: 4096,
        disk_gb: 40,
        is_public: true,
    };

    let created = fixture
        .dal
        .flavors()
        .upsert(cluster.id, &record)
        .expect("Failed to upsert flavor");
    assert_eq!(created.vcpus, 2);

    let mut resized = record.clone();
    resized.vcpus = 4;
    let updated = fixture
        .dal
        .flavors()
        .upsert(cluster.id, &resized)
        .expect("Failed to upsert flavor");

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.vcpus, 4);
}

#[test]
fn test_find_by_name_is_cluster_scoped() {
    let fixture = TestFixture::new();
    let cluster_a = fixture.insert_test_cluster("East");
    let cluster_b = fixture.insert_test_cluster("West");

    fixture.insert_test_flavor(cluster_a.id, "m1.large", 8);

    assert!(fixture
        .dal
        .flavors()
        .find_by_name(cluster_a.id, "m1.large")
        .unwrap()
        .is_some());
    assert!(fixture
        .dal
        .flavors()
        .find_by_name(cluster_b.id, "m1.large")
        .unwrap()
        .is_none());
}

#[test]
fn test_vcpu_index() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("East");

    fixture.insert_test_flavor(cluster.id, "m1.medium", 4);

    let index = fixture.dal.flavors().vcpu_index().expect("Failed to build index");
    assert_eq!(index.get(&(cluster.id, "m1.medium".to_string())), Some(&4));
}
