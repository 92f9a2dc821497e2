//! Event handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    services::{EntityService, EventService, OutcomeService},
    state::AppState,
};

use super::{
    request::ListEventsQuery,
    response::{EntitiesListResponse, EventResponse, EventsListResponse, OutcomesListResponse},
};

/// List events
pub async fn list_events(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ListEventsQuery>,
) -> AppResult<Json<EventsListResponse>> {
    let include_inactive = auth_user.is_admin && query.include_inactive.unwrap_or(false);
    let events = EventService::list_events(state.db(), include_inactive).await?;

    Ok(Json(EventsListResponse {
        total: events.len(),
        events,
    }))
}

/// Get a specific event
pub async fn get_event(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EventResponse>> {
    let event = EventService::get_event(state.db(), &id, auth_user.is_admin).await?;
    Ok(Json(event))
}

/// List draftable entities of an event
pub async fn list_entities(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EntitiesListResponse>> {
    let entities = EntityService::list_entities(state.db(), &id, auth_user.is_admin).await?;
    Ok(Json(EntitiesListResponse {
        event_id: id,
        entities,
    }))
}

/// Medal table of an event
pub async fn list_outcomes(
    State(state): State<AppState>,
    _auth_user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OutcomesListResponse>> {
    let outcomes = OutcomeService::list_outcomes(state.db(), &id).await?;
    Ok(Json(OutcomesListResponse {
        event_id: id,
        outcomes,
    }))
}
