// src/models/portal_settings.rs

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Fixed identity key for the settings singleton row.
pub const SETTINGS_ROW_ID: i32 = 1;

/// Process-wide portal configuration singleton.
///
/// Exactly one row exists at any time; the DAL's get-or-create accessor
/// inserts the row with `SETTINGS_ROW_ID` on first access and relies on the
/// primary key to stay single-row under concurrent first access.
#[derive(Queryable, Selectable, Identifiable, AsChangeset, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::portal_settings)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PortalSettings {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Inventory collection frequency in minutes
    pub sync_interval_minutes: i32,
    pub ome_url: Option<String>,
    pub ome_username: Option<String>,
    #[serde(skip_serializing)]
    pub ome_password_encrypted: Option<Vec<u8>>,
    /// Cost per kWh
    pub electricity_cost: f64,
    /// Power Usage Effectiveness
    pub pue: f64,
}

impl PortalSettings {
    /// True when an OME endpoint is configured well enough to poll.
    pub fn ome_configured(&self) -> bool {
        self.ome_url.as_deref().map(|u| !u.trim().is_empty()).unwrap_or(false)
            && self
                .ome_username
                .as_deref()
                .map(|u| !u.trim().is_empty())
                .unwrap_or(false)
    }
}
