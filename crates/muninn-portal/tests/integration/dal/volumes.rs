use crate::fixtures::TestFixture;
use muninn_models::models::{InstanceRecord, VolumeRecord};
use uuid::Uuid;

fn instance_record(id: Uuid) -> InstanceRecord {
    InstanceRecord {
        id,
        name: "vm".to_string(),
        status: "ACTIVE".to_string(),
        flavor_name: "m1.small".to_string(),
        project_id: "p".to_string(),
        user_id: "u".to_string(),
        image_ref: "N/A".to_string(),
        key_name: "-".to_string(),
        launched_at: None,
        ip_address: None,
        network_name: "provider-net".to_string(),
    }
}

fn volume_record(id: Uuid) -> VolumeRecord {
    VolumeRecord {
        id,
        name: "data".to_string(),
        size_gb: 100,
        device: "/dev/vdb".to_string(),
        status: "in-use".to_string(),
        is_bootable: false,
    }
}

#[test]
fn test_upsert_and_reattach() {
    let fixture = TestFixture::new();
    let cluster = fixture.insert_test_cluster("East");
    let host = fixture.insert_test_host(cluster.id, "compute-01");

    let inst_a = Uuid::new_v4();
    let inst_b = Uuid::new_v4();
    fixture
        .dal
        .instances()
        .upsert(Some(host.id), &instance_record(inst_a))
        .unwrap();
    fixture
        .dal
        .instances()
        .upsert(Some(host.id), &instance_record(inst_b))
        .unwrap();

    let vol_id = Uuid::new_v4();
    let created = fixture
        .dal
        .volumes()
        .upsert(inst_a, &volume_record(vol_id))
        .expect("Failed to upsert volume");
    assert_eq!(created.instance_id, inst_a);

    // the instance reference always reflects the most recent pass
    let moved = fixture
        .dal
        .volumes()
        .upsert(inst_b, &volume_record(vol_id))
        .expect("Failed to upsert volume");
    assert_eq!(moved.id, vol_id);
    assert_eq!(moved.instance_id, inst_b);

    assert!(fixture
        .dal
        .volumes()
        .list_for_instance(inst_a)
        .unwrap()
        .is_empty());
    assert_eq!(fixture.dal.volumes().list_for_instance(inst_b).unwrap().len(), 1);
}
