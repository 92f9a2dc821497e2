//! Admin handler implementations

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    handlers::{contests::ContestResponse, events::EventResponse},
    middleware::auth::AdminUser,
    services::{AdminService, ContestService, EntityService, EventService, OutcomeService},
    state::AppState,
};

use super::{
    request::{
        CreateContestRequest, CreateEventRequest, ImportEntitiesRequest, TransitionRequest,
        UpdateContestRequest, UpdateEventRequest, UpdateOutcomeRequest,
    },
    response::{
        DeleteResponse, ImportEntitiesResponse, OutcomeResponse, OverviewResponse,
        TransitionResponse,
    },
};

/// Dashboard totals and per-contest counts
pub async fn get_overview(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<OverviewResponse>> {
    let overview = AdminService::get_overview(state.db()).await?;
    Ok(Json(overview))
}

// ============================================================================
// Events
// ============================================================================

/// Create an event
pub async fn create_event(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<EventResponse>)> {
    payload.validate()?;

    let event = EventService::create_event(state.db(), payload).await?;
    info!(admin_id = %admin.id, event_id = %event.id, "Event created");

    Ok((StatusCode::CREATED, Json(event)))
}

/// Update an event
pub async fn update_event(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEventRequest>,
) -> AppResult<Json<EventResponse>> {
    payload.validate()?;

    let event = EventService::update_event(state.db(), &id, payload).await?;
    Ok(Json(event))
}

/// Delete an event and everything under it
pub async fn delete_event(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeleteResponse>> {
    let deleted = EventService::delete_event(state.db(), &id).await?;
    info!(admin_id = %admin.id, event_id = %id, ?deleted, "Event deleted");

    Ok(Json(DeleteResponse { id, deleted }))
}

/// Bulk insert or update the event's entities
pub async fn import_entities(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ImportEntitiesRequest>,
) -> AppResult<Json<ImportEntitiesResponse>> {
    let imported = EntityService::import_entities(state.db(), &id, payload).await?;
    Ok(Json(ImportEntitiesResponse {
        event_id: id,
        imported,
    }))
}

/// Record medal tallies for one entity
pub async fn update_outcome(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path((id, code)): Path<(Uuid, String)>,
    Json(payload): Json<UpdateOutcomeRequest>,
) -> AppResult<Json<OutcomeResponse>> {
    let tally = payload.tally()?;

    let record = OutcomeService::update_outcome(state.db(), &id, &code, tally).await?;
    Ok(Json(record))
}

// ============================================================================
// Contests
// ============================================================================

/// Create a contest under an event
pub async fn create_contest(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<CreateContestRequest>,
) -> AppResult<(StatusCode, Json<ContestResponse>)> {
    payload.validate()?;

    let contest = ContestService::create_contest(state.db(), &event_id, payload).await?;
    info!(admin_id = %admin.id, contest_id = %contest.id, "Contest created");

    Ok((StatusCode::CREATED, Json(contest)))
}

/// Update contest configuration
pub async fn update_contest(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateContestRequest>,
) -> AppResult<Json<ContestResponse>> {
    payload.validate()?;

    let contest = ContestService::update_contest(state.db(), &id, payload).await?;
    Ok(Json(contest))
}

/// Delete a contest with its memberships and picks
pub async fn delete_contest(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeleteResponse>> {
    let deleted = ContestService::delete_contest(state.db(), &id).await?;
    info!(admin_id = %admin.id, contest_id = %id, ?deleted, "Contest deleted");

    Ok(Json(DeleteResponse { id, deleted }))
}

/// Move a contest to its next phase
pub async fn transition_contest(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransitionRequest>,
) -> AppResult<Json<TransitionResponse>> {
    let transition = ContestService::transition_state(
        state.db(),
        &id,
        payload.target,
        payload.expected_version,
    )
    .await?;
    info!(
        admin_id = %admin.id,
        contest_id = %id,
        from = %transition.previous_state,
        to = %transition.contest.state,
        "Contest state changed"
    );

    Ok(Json(transition))
}
