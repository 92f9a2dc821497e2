//! Admin response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    handlers::contests::{ContestResponse, ContestSummary},
    models::{CascadeCounts, ContestState, OutcomeRecord},
};

/// Rows removed by a cascading delete
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub id: Uuid,
    pub deleted: CascadeCounts,
}

/// Result of a state transition
#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub previous_state: ContestState,
    pub contest: ContestResponse,
}

/// Result of an entity import
#[derive(Debug, Serialize)]
pub struct ImportEntitiesResponse {
    pub event_id: Uuid,
    pub imported: u64,
}

/// Stored outcome record
#[derive(Debug, Serialize)]
pub struct OutcomeResponse {
    pub event_id: Uuid,
    pub entity_code: String,
    pub gold: i32,
    pub silver: i32,
    pub bronze: i32,
    pub points: i32,
    pub updated_at: DateTime<Utc>,
}

impl From<OutcomeRecord> for OutcomeResponse {
    fn from(record: OutcomeRecord) -> Self {
        Self {
            event_id: record.event_id,
            entity_code: record.entity_code,
            gold: record.gold,
            silver: record.silver,
            bronze: record.bronze,
            points: record.points,
            updated_at: record.updated_at,
        }
    }
}

/// Table totals
#[derive(Debug, Serialize)]
pub struct OverviewTotals {
    pub events: i64,
    pub contests: i64,
    pub memberships: i64,
    pub entities: i64,
    pub picks: i64,
}

/// Admin dashboard overview
#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub totals: OverviewTotals,
    pub contests: Vec<ContestSummary>,
}
