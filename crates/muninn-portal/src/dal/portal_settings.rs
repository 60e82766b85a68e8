use crate::dal::DAL;
use muninn_models::models::portal_settings::{PortalSettings, SETTINGS_ROW_ID};
use muninn_models::schema::portal_settings;
use chrono::Utc;
use diesel::prelude::*;

/// Data Access Layer for the PortalSettings singleton.
pub struct PortalSettingsDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl PortalSettingsDAL<'_> {
    /// Returns the settings singleton, creating the row with its defaults on
    /// first access. Concurrent first accesses race on the fixed primary
    /// key: the insert is on-conflict-do-nothing, so exactly one row ever
    /// exists and every caller reads the same one.
    pub fn get_or_create(&self) -> Result<PortalSettings, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");

        diesel::insert_into(portal_settings::table)
            .values(portal_settings::id.eq(SETTINGS_ROW_ID))
            .on_conflict(portal_settings::id)
            .do_nothing()
            .execute(conn)?;

        portal_settings::table
            .filter(portal_settings::id.eq(SETTINGS_ROW_ID))
            .first(conn)
    }

    /// Updates the settings singleton.
    pub fn update(&self, updated: &PortalSettings) -> Result<PortalSettings, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        let mut updated = updated.clone();
        updated.updated_at = Utc::now();
        diesel::update(portal_settings::table.filter(portal_settings::id.eq(SETTINGS_ROW_ID)))
            .set(updated)
            .get_result(conn)
    }
}
