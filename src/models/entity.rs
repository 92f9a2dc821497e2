//! Entity model (a country that can be drafted)

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Entity database model, scoped to an event
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Entity {
    pub event_id: Uuid,
    pub code: String,
    pub name: String,
    pub cost: i32,
    /// Advisory projection shown to drafters, never used in scoring
    pub reference_score: i32,
    pub is_active: bool,
}

/// Cost lookup row for a batch of selected codes
#[derive(Debug, Clone, FromRow)]
pub struct EntityCost {
    pub code: String,
    pub cost: i32,
}

/// Incoming entity row for a bulk import
#[derive(Debug, Clone)]
pub struct NewEntity {
    pub code: String,
    pub name: String,
    pub cost: i32,
    pub reference_score: i32,
    pub is_active: bool,
}
