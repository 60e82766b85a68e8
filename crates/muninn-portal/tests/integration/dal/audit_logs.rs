use crate::fixtures::TestFixture;
use muninn_models::models::audit_logs::{ACTION_INVENTORY_SYNC_SUCCESS, NewAuditLog};
use uuid::Uuid;

#[test]
fn test_create_and_target_history() {
    let fixture = TestFixture::new();
    let target = format!("cluster-{}", Uuid::new_v4());

    let entry = NewAuditLog::new(ACTION_INVENTORY_SYNC_SUCCESS, &target)
        .unwrap()
        .with_details("Synced 3 hosts in 1.2s.");
    fixture
        .dal
        .audit_logs()
        .create(&entry)
        .expect("Failed to create audit log");

    let history = fixture
        .dal
        .audit_logs()
        .get_target_history(&target, 10)
        .expect("Failed to list audit logs");

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, ACTION_INVENTORY_SYNC_SUCCESS);
    assert_eq!(history[0].details.as_deref(), Some("Synced 3 hosts in 1.2s."));
}

#[test]
fn test_cleanup_keeps_recent_logs() {
    let fixture = TestFixture::new();
    let target = format!("cluster-{}", Uuid::new_v4());

    let entry = NewAuditLog::new(ACTION_INVENTORY_SYNC_SUCCESS, &target).unwrap();
    fixture.dal.audit_logs().create(&entry).unwrap();

    // freshly written entries survive a retention sweep
    fixture
        .dal
        .audit_logs()
        .cleanup_old_logs(90)
        .expect("Failed to cleanup audit logs");

    let history = fixture.dal.audit_logs().get_target_history(&target, 10).unwrap();
    assert_eq!(history.len(), 1);
}
