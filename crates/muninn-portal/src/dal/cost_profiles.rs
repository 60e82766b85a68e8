use crate::dal::DAL;
use muninn_models::models::cost_profiles::{CostProfile, NewCostProfile};
use muninn_models::schema::cost_profiles;
use diesel::prelude::*;
use uuid::Uuid;

/// Data Access Layer for CostProfile operations.
pub struct CostProfilesDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl CostProfilesDAL<'_> {
    /// Creates a new cost profile.
    pub fn create(&self, new_profile: &NewCostProfile) -> Result<CostProfile, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        diesel::insert_into(cost_profiles::table)
            .values(new_profile)
            .get_result(conn)
    }

    /// Retrieves a cost profile by its UUID.
    pub fn get(&self, profile_id: Uuid) -> Result<Option<CostProfile>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        cost_profiles::table
            .filter(cost_profiles::id.eq(profile_id))
            .first(conn)
            .optional()
    }

    /// Finds a cost profile by its unique name.
    pub fn find_by_name(&self, name: &str) -> Result<Option<CostProfile>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        cost_profiles::table
            .filter(cost_profiles::name.eq(name))
            .first(conn)
            .optional()
    }

    /// Lists all cost profiles.
    pub fn list(&self) -> Result<Vec<CostProfile>, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        cost_profiles::table
            .order(cost_profiles::name.asc())
            .load::<CostProfile>(conn)
    }

    /// Hard deletes a cost profile; referencing hosts fall back to NULL.
    pub fn delete(&self, profile_id: Uuid) -> Result<usize, diesel::result::Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        diesel::delete(cost_profiles::table.filter(cost_profiles::id.eq(profile_id))).execute(conn)
    }
}
