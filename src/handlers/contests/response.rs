//! Contest response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    models::{Contest, ContestListing, ContestState, JoinedContest, Membership, PickedEntity},
    scoring::{DisplayOrder, RankedTeam},
};

/// Contest response
#[derive(Debug, Serialize)]
pub struct ContestResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub state: ContestState,
    pub state_version: i64,
    pub budget: i32,
    pub max_entities: i32,
    pub deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Contest> for ContestResponse {
    fn from(contest: Contest) -> Self {
        Self {
            id: contest.id,
            event_id: contest.event_id,
            slug: contest.slug,
            name: contest.name,
            description: contest.description,
            state: contest.state,
            state_version: contest.state_version,
            budget: contest.budget,
            max_entities: contest.max_entities,
            deadline: contest.deadline,
            created_at: contest.created_at,
            updated_at: contest.updated_at,
        }
    }
}

/// Contest summary for list views
#[derive(Debug, Serialize)]
pub struct ContestSummary {
    pub id: Uuid,
    pub event_id: Uuid,
    pub event_slug: String,
    pub event_name: String,
    pub slug: String,
    pub name: String,
    pub state: ContestState,
    pub budget: i32,
    pub max_entities: i32,
    pub deadline: DateTime<Utc>,
    pub member_count: i64,
    pub pick_count: i64,
}

impl From<ContestListing> for ContestSummary {
    fn from(c: ContestListing) -> Self {
        Self {
            id: c.id,
            event_id: c.event_id,
            event_slug: c.event_slug,
            event_name: c.event_name,
            slug: c.slug,
            name: c.name,
            state: c.state,
            budget: c.budget,
            max_entities: c.max_entities,
            deadline: c.deadline,
            member_count: c.member_count,
            pick_count: c.pick_count,
        }
    }
}

/// Contest list response
#[derive(Debug, Serialize)]
pub struct ContestsListResponse {
    pub contests: Vec<ContestSummary>,
    pub total: usize,
}

/// Membership response
#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub contest_id: Uuid,
    pub user_id: Uuid,
    pub team_name: String,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Membership> for MembershipResponse {
    fn from(m: Membership) -> Self {
        Self {
            contest_id: m.contest_id,
            user_id: m.user_id,
            team_name: m.team_name,
            joined_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// A contest the caller belongs to
#[derive(Debug, Serialize)]
pub struct MyContestResponse {
    pub contest_id: Uuid,
    pub contest_slug: String,
    pub contest_name: String,
    pub event_id: Uuid,
    pub event_slug: String,
    pub event_name: String,
    pub state: ContestState,
    pub team_name: String,
    pub pick_count: i64,
    pub joined_at: DateTime<Utc>,
}

impl From<JoinedContest> for MyContestResponse {
    fn from(j: JoinedContest) -> Self {
        Self {
            contest_id: j.contest_id,
            contest_slug: j.contest_slug,
            contest_name: j.contest_name,
            event_id: j.event_id,
            event_slug: j.event_slug,
            event_name: j.event_name,
            state: j.state,
            team_name: j.team_name,
            pick_count: j.pick_count,
            joined_at: j.joined_at,
        }
    }
}

/// My contests response
#[derive(Debug, Serialize)]
pub struct MyContestsResponse {
    pub contests: Vec<MyContestResponse>,
}

/// A picked entity with its current medal tallies
#[derive(Debug, Clone, Serialize)]
pub struct PickedEntityResponse {
    pub code: String,
    pub name: String,
    pub cost: i32,
    pub gold: i32,
    pub silver: i32,
    pub bronze: i32,
    pub points: i32,
}

impl From<PickedEntity> for PickedEntityResponse {
    fn from(p: PickedEntity) -> Self {
        Self {
            code: p.code,
            name: p.name,
            cost: p.cost,
            gold: p.gold,
            silver: p.silver,
            bronze: p.bronze,
            points: p.points,
        }
    }
}

/// The caller's current selection in a contest
#[derive(Debug, Serialize)]
pub struct PicksResponse {
    pub contest_id: Uuid,
    pub user_id: Uuid,
    pub state: ContestState,
    pub entities: Vec<PickedEntityResponse>,
    pub total_cost: i64,
    pub total_points: i64,
    pub budget: i32,
    pub remaining_budget: i64,
    pub max_entities: i32,
}

/// One leaderboard row.
///
/// `entities` is omitted while standings are masked.
#[derive(Debug, Serialize)]
pub struct TeamRow {
    pub rank: u32,
    pub user_id: Uuid,
    pub team_name: String,
    pub points: i64,
    pub gold: i64,
    pub silver: i64,
    pub bronze: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<PickedEntityResponse>>,
}

impl TeamRow {
    pub fn new(team: RankedTeam, entities: Option<Vec<PickedEntityResponse>>) -> Self {
        Self {
            rank: team.rank,
            user_id: team.user_id,
            team_name: team.team_name,
            points: team.standing.points,
            gold: team.standing.gold,
            silver: team.standing.silver,
            bronze: team.standing.bronze,
            entities,
        }
    }
}

/// Leaderboard response
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub contest_id: Uuid,
    pub state: ContestState,
    pub masked: bool,
    pub order: DisplayOrder,
    pub teams: Vec<TeamRow>,
}

/// Single-team detail response
#[derive(Debug, Serialize)]
pub struct TeamDetailResponse {
    pub contest_id: Uuid,
    pub state: ContestState,
    pub masked: bool,
    pub team: TeamRow,
}
