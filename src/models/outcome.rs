//! Outcome record model (medal tallies of one entity)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Outcome record database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub event_id: Uuid,
    pub entity_code: String,
    pub gold: i32,
    pub silver: i32,
    pub bronze: i32,
    /// Always `gold*3 + silver*2 + bronze`
    pub points: i32,
    pub updated_at: DateTime<Utc>,
}

/// Medal table row with the entity's display name
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OutcomeListing {
    pub entity_code: String,
    pub entity_name: String,
    pub gold: i32,
    pub silver: i32,
    pub bronze: i32,
    pub points: i32,
    pub updated_at: DateTime<Utc>,
}
