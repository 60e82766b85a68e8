// src/models/cost_profiles.rs

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Financial profile for a specific hardware model, e.g. "Dell PowerEdge R740".
///
/// Managed by administrators; referenced by physical hosts, never owned by them.
#[derive(Queryable, Selectable, Identifiable, AsChangeset, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::cost_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CostProfile {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    /// Monthly hardware cost (CAPEX/Lease)
    pub monthly_amortization: f64,
    /// Average power consumption in Watts
    pub average_watts: i32,
}

#[derive(Insertable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::cost_profiles)]
pub struct NewCostProfile {
    pub name: String,
    pub monthly_amortization: f64,
    pub average_watts: i32,
}

impl NewCostProfile {
    pub fn new(name: String, monthly_amortization: f64, average_watts: i32) -> Result<Self, String> {
        if name.trim().is_empty() {
            return Err("Name cannot be empty".to_string());
        }
        if monthly_amortization < 0.0 {
            return Err("Monthly amortization cannot be negative".to_string());
        }
        if average_watts < 0 {
            return Err("Average watts cannot be negative".to_string());
        }

        Ok(NewCostProfile {
            name,
            monthly_amortization,
            average_watts,
        })
    }
}
