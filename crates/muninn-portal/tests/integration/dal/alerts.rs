use crate::fixtures::TestFixture;
use muninn_models::models::alerts::{NewAlert, SEVERITY_CRITICAL, SOURCE_REDFISH};

#[test]
fn test_create_or_get_never_duplicates() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("East");
    let host = fixture.insert_test_host(cluster.id, "compute-01");

    let alert = NewAlert::for_host(
        SOURCE_REDFISH,
        host.id,
        "System Health: Critical",
        "Global system status reported as Critical",
        SEVERITY_CRITICAL,
    )
    .unwrap();

    let first = fixture
        .dal
        .alerts()
        .create_or_get(&alert)
        .expect("Failed to create alert");
    let second = fixture
        .dal
        .alerts()
        .create_or_get(&alert)
        .expect("Failed to create alert");

    assert_eq!(first.id, second.id);
    assert_eq!(
        fixture.dal.alerts().list_active_for_host(host.id).unwrap().len(),
        1
    );
}

#[test]
fn test_different_titles_raise_separate_alerts() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("East");
    let host = fixture.insert_test_host(cluster.id, "compute-01");

    for title in ["System Health: Warning", "System Health: Critical"] {
        let alert =
            NewAlert::for_host(SOURCE_REDFISH, host.id, title, "", SEVERITY_CRITICAL).unwrap();
        fixture.dal.alerts().create_or_get(&alert).unwrap();
    }

    assert_eq!(
        fixture.dal.alerts().list_active_for_host(host.id).unwrap().len(),
        2
    );
}

#[test]
fn test_deactivate() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("East");
    let host = fixture.insert_test_host(cluster.id, "compute-01");

    let alert = NewAlert::for_host(SOURCE_REDFISH, host.id, "Fan failure", "", SEVERITY_CRITICAL)
        .unwrap();
    let created = fixture.dal.alerts().create_or_get(&alert).unwrap();

    fixture
        .dal
        .alerts()
        .deactivate(created.id)
        .expect("Failed to deactivate alert");

    assert!(fixture
        .dal
        .alerts()
        .list_active_for_host(host.id)
        .unwrap()
        .is_empty());
}
