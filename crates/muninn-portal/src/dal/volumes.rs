use crate::dal::DAL;
use muninn_models::models::volumes::{Volume, VolumeRecord};
use muninn_models::schema::volumes;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

/// Data Access Layer for Volume operations.
pub struct VolumesDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl VolumesDAL<'_> {
    /// Retrieves a volume by its remote-assigned UUID.
    pub fn get(&self, volume_id: Uuid) -> Result<Option<Volume>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        volumes::table
            .filter(volumes::id.eq(volume_id))
            .first(conn)
            .optional()
    }

    /// Upserts a volume by its remote-assigned UUID: find by key, else
    /// insert. The instance reference always reflects the most recent pass.
    pub fn upsert(
        &self,
        instance_id: Uuid,
        record: &VolumeRecord,
    ) -> Result<Volume, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");

        let existing: Option<Volume> = volumes::table
            .filter(volumes::id.eq(record.id))
            .first(conn)
            .optional()?;

        match existing {
            Some(_) => diesel::update(volumes::table.filter(volumes::id.eq(record.id)))
                .set((
                    volumes::instance_id.eq(instance_id),
                    volumes::name.eq(&record.name),
                    volumes::size_gb.eq(record.size_gb),
                    volumes::device.eq(&record.device),
                    volumes::status.eq(&record.status),
                    volumes::is_bootable.eq(record.is_bootable),
                    volumes::updated_at.eq(Utc::now()),
                ))
                .get_result(conn),
            None => diesel::insert_into(volumes::table)
                .values(record.clone().into_new(instance_id))
                .get_result(conn),
        }
    }

    /// Lists all volumes attached to one instance.
    pub fn list_for_instance(
        &self,
        instance_id: Uuid,
    ) -> Result<Vec<Volume>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        volumes::table
            .filter(volumes::instance_id.eq(instance_id))
            .order(volumes::device.asc())
            .load::<Volume>(conn)
    }
}
