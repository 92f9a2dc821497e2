//! Event model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Event database model: the real-world competition contests are played on
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Rows removed by a cascading event or contest delete
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct CascadeCounts {
    pub contests: i64,
    pub memberships: i64,
    pub picks: i64,
    pub entities: i64,
}

/// Event with the number of contests played on it
#[derive(Debug, Clone, FromRow)]
pub struct EventListing {
    #[sqlx(flatten)]
    pub event: Event,
    pub contest_count: i64,
}
