use crate::dal::DAL;
use muninn_models::models::alerts::{Alert, NewAlert};
use muninn_models::schema::alerts;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Data Access Layer for Alert operations.
pub struct AlertsDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl AlertsDAL<'_> {
    /// Creates a new alert.
    pub fn create(&self, new_alert: &NewAlert) -> Result<Alert, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        diesel::insert_into(alerts::table)
            .values(new_alert)
            .get_result(conn)
    }

    /// Creates an alert unless one with the same (target host, title) key
    /// already exists; the existing alert is returned unchanged. This is how
    /// the pollers avoid raising duplicates on every tick.
    pub fn create_or_get(&self, new_alert: &NewAlert) -> Result<Alert, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");

        let mut query = alerts::table
            .filter(alerts::title.eq(&new_alert.title))
            .into_boxed();
        query = match new_alert.target_host_id {
            Some(host_id) => query.filter(alerts::target_host_id.eq(host_id)),
            None => query.filter(alerts::target_host_id.is_null()),
        };
        query = match new_alert.target_cluster_id {
            Some(cluster_id) => query.filter(alerts::target_cluster_id.eq(cluster_id)),
            None => query.filter(alerts::target_cluster_id.is_null()),
        };

        let existing: Option<Alert> = query.first(conn).optional()?;
        match existing {
            Some(alert) => Ok(alert),
            None => diesel::insert_into(alerts::table)
                .values(new_alert)
                .get_result(conn),
        }
    }

    /// Retrieves an alert by its UUID.
    pub fn get(&self, alert_id: Uuid) -> Result<Option<Alert>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        alerts::table
            .filter(alerts::id.eq(alert_id))
            .first(conn)
            .optional()
    }

    /// Lists all active alerts, newest first.
    pub fn list_active(&self) -> Result<Vec<Alert>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        alerts::table
            .filter(alerts::is_active.eq(true))
            .order(alerts::created_at.desc())
            .load::<Alert>(conn)
    }

    /// Lists active alerts targeting one host.
    pub fn list_active_for_host(&self, host_id: Uuid) -> Result<Vec<Alert>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        alerts::table
            .filter(alerts::is_active.eq(true))
            .filter(alerts::target_host_id.eq(host_id))
            .order(alerts::created_at.desc())
            .load::<Alert>(conn)
    }

    /// Deactivates an alert. Operator action only; sync never calls this.
    pub fn deactivate(&self, alert_id: Uuid) -> Result<usize, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        diesel::update(alerts::table.filter(alerts::id.eq(alert_id)))
            .set(alerts::is_active.eq(false))
            .execute(conn)
    }

    /// Snoozes an alert until the given time.
    pub fn snooze(
        &self,
        alert_id: Uuid,
        until: DateTime<Utc>,
    ) -> Result<usize, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        diesel::update(alerts::table.filter(alerts::id.eq(alert_id)))
            .set(alerts::snoozed_until.eq(until))
            .execute(conn)
    }
}
