//! Contest handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppErrorWithDetails, AppResult},
    middleware::auth::AuthenticatedUser,
    services::{ContestService, LeaderboardService, PickService},
    state::AppState,
};

use super::{
    request::{JoinContestRequest, LeaderboardQuery, ListContestsQuery, SubmitPicksRequest},
    response::{
        ContestResponse, ContestsListResponse, LeaderboardResponse, MembershipResponse,
        MyContestsResponse, PicksResponse, TeamDetailResponse,
    },
};

/// List contests, optionally for one event
pub async fn list_contests(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ListContestsQuery>,
) -> AppResult<Json<ContestsListResponse>> {
    let contests =
        ContestService::list_contests(state.db(), query.event_id.as_ref(), auth_user.is_admin)
            .await?;

    Ok(Json(ContestsListResponse {
        total: contests.len(),
        contests,
    }))
}

/// Contests the caller has joined
pub async fn list_my_contests(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<MyContestsResponse>> {
    let contests = ContestService::list_my_contests(state.db(), &auth_user.id).await?;
    Ok(Json(MyContestsResponse { contests }))
}

/// Get a specific contest
pub async fn get_contest(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ContestResponse>> {
    let contest = ContestService::get_contest(state.db(), &id).await?;
    Ok(Json(contest))
}

/// Look a contest up by event and contest slug
pub async fn get_contest_by_slug(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Path((event_slug, contest_slug)): Path<(String, String)>,
) -> AppResult<Json<ContestResponse>> {
    let contest =
        ContestService::get_contest_by_slugs(state.db(), &event_slug, &contest_slug).await?;
    Ok(Json(contest))
}

/// Join a contest, or rename the caller's team
pub async fn join_contest(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<JoinContestRequest>,
) -> AppResult<Json<MembershipResponse>> {
    payload.validate()?;

    let membership =
        ContestService::join_contest(state.db(), &id, &auth_user.id, &payload.team_name).await?;
    Ok(Json(membership))
}

/// Replace the caller's selection.
///
/// Rejections echo the submitted codes back under `details.entity_codes`.
pub async fn submit_picks(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitPicksRequest>,
) -> Result<Json<PicksResponse>, AppErrorWithDetails> {
    let picks = PickService::submit_picks(state.db(), &id, &auth_user.id, payload.entity_codes)
        .await?;
    Ok(Json(picks))
}

/// The caller's current selection
pub async fn get_my_picks(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PicksResponse>> {
    let picks = PickService::get_my_picks(state.db(), &id, &auth_user.id).await?;
    Ok(Json(picks))
}

/// Contest leaderboard
pub async fn get_leaderboard(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<LeaderboardQuery>,
) -> AppResult<Json<LeaderboardResponse>> {
    let leaderboard = LeaderboardService::get_leaderboard(
        state.db(),
        &id,
        query.sort.as_deref(),
        query.dir.as_deref(),
    )
    .await?;

    Ok(Json(leaderboard))
}

/// One team's row with its entities
pub async fn get_team_detail(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<TeamDetailResponse>> {
    let detail =
        LeaderboardService::get_team_detail(state.db(), &id, &user_id, &auth_user.id).await?;
    Ok(Json(detail))
}
