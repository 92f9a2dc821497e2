//! Pick model

use sqlx::FromRow;
use uuid::Uuid;

/// A pick joined with its entity and (possibly missing) outcome record.
///
/// Missing outcome records come back as zero tallies.
#[derive(Debug, Clone, FromRow)]
pub struct PickedEntity {
    pub user_id: Uuid,
    pub code: String,
    pub name: String,
    pub cost: i32,
    pub gold: i32,
    pub silver: i32,
    pub bronze: i32,
    pub points: i32,
}
