//! Contest request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// List contests query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListContestsQuery {
    pub event_id: Option<Uuid>,
}

/// Join contest (or rename team) request
#[derive(Debug, Deserialize, Validate)]
pub struct JoinContestRequest {
    /// Trimmed to 1-64 characters by the service
    #[validate(length(min = 1, max = 256))]
    pub team_name: String,
}

/// Submit picks request; replaces the caller's whole selection
#[derive(Debug, Deserialize)]
pub struct SubmitPicksRequest {
    pub entity_codes: Vec<String>,
}

/// Leaderboard query parameters
#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    /// points, gold, silver, bronze or name
    pub sort: Option<String>,
    /// asc or desc
    pub dir: Option<String>,
}
