//! Membership model: a user's team in one contest

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::ContestState;

/// Membership database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Membership {
    pub id: Uuid,
    pub contest_id: Uuid,
    pub user_id: Uuid,
    pub team_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A contest the caller has joined, as shown in "my contests"
#[derive(Debug, Clone, FromRow)]
pub struct JoinedContest {
    pub contest_id: Uuid,
    pub contest_slug: String,
    pub contest_name: String,
    pub event_id: Uuid,
    pub event_slug: String,
    pub event_name: String,
    #[sqlx(try_from = "String")]
    pub state: ContestState,
    pub team_name: String,
    pub pick_count: i64,
    pub joined_at: DateTime<Utc>,
}
