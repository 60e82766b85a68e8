use crate::fixtures::TestFixture;
use muninn_models::models::portal_settings::SETTINGS_ROW_ID;
use serial_test::serial;

#[test]
#[serial]
fn test_get_or_create_is_singleton() {
    let fixture = TestFixture::new();

    let first = fixture
        .dal
        .portal_settings()
        .get_or_create()
        .expect("Failed to get settings");
    let second = fixture
        .dal
        .portal_settings()
        .get_or_create()
        .expect("Failed to get settings");

    assert_eq!(first.id, SETTINGS_ROW_ID);
    assert_eq!(second.id, SETTINGS_ROW_ID);
    assert_eq!(first.created_at, second.created_at);
}

#[test]
#[serial]
fn test_defaults_and_update() {
    let fixture = TestFixture::new();

    let settings = fixture.dal.portal_settings().get_or_create().unwrap();
    assert!(settings.sync_interval_minutes > 0);

    let mut changed = settings.clone();
    changed.electricity_cost = 0.2;
    changed.pue = 1.8;
    let updated = fixture
        .dal
        .portal_settings()
        .update(&changed)
        .expect("Failed to update settings");

    assert_eq!(updated.id, SETTINGS_ROW_ID);
    assert_eq!(updated.electricity_cost, 0.2);
    assert_eq!(updated.pue, 1.8);

    // restore so other tests see sane values
    let _ = fixture.dal.portal_settings().update(&settings);
}
