//! Event service

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    db::repositories::EventRepository,
    error::{AppError, AppResult},
    handlers::{
        admin::{CreateEventRequest, UpdateEventRequest},
        events::{EventResponse, EventSummary},
    },
    models::{CascadeCounts, Event},
    utils::validate_slug,
};

/// Event service for business logic
pub struct EventService;

impl EventService {
    /// Create a new event
    pub async fn create_event(
        pool: &PgPool,
        payload: CreateEventRequest,
    ) -> AppResult<EventResponse> {
        validate_slug(&payload.slug).map_err(|e| AppError::Validation(e.to_string()))?;
        if payload.end_date < payload.start_date {
            return Err(AppError::Validation(
                "End date must not be before start date".to_string(),
            ));
        }

        let event = EventRepository::create(
            pool,
            payload.name.trim(),
            &payload.slug,
            payload.description.as_deref(),
            payload.start_date,
            payload.end_date,
            payload.is_active.unwrap_or(true),
        )
        .await
        .map_err(|e| slug_taken(e, &payload.slug))?;

        info!(event_id = %event.id, slug = %event.slug, "Event created");
        Ok(event.into())
    }

    /// Get event by ID; inactive events are only visible to administrators
    pub async fn get_event(pool: &PgPool, id: &Uuid, is_admin: bool) -> AppResult<EventResponse> {
        let event = Self::find_visible(pool, id, is_admin).await?;
        Ok(event.into())
    }

    /// Update event
    pub async fn update_event(
        pool: &PgPool,
        id: &Uuid,
        payload: UpdateEventRequest,
    ) -> AppResult<EventResponse> {
        let existing = Self::find_visible(pool, id, true).await?;

        if let Some(slug) = &payload.slug {
            validate_slug(slug).map_err(|e| AppError::Validation(e.to_string()))?;
        }
        let start = payload.start_date.unwrap_or(existing.start_date);
        let end = payload.end_date.unwrap_or(existing.end_date);
        if end < start {
            return Err(AppError::Validation(
                "End date must not be before start date".to_string(),
            ));
        }

        let slug = payload.slug.as_deref().unwrap_or(&existing.slug);
        let event = EventRepository::update(
            pool,
            id,
            payload.name.as_deref().map(str::trim),
            payload.slug.as_deref(),
            payload.description.as_deref(),
            payload.start_date,
            payload.end_date,
            payload.is_active,
        )
        .await
        .map_err(|e| slug_taken(e, slug))?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        Ok(event.into())
    }

    /// List events with contest counts
    pub async fn list_events(pool: &PgPool, include_inactive: bool) -> AppResult<Vec<EventSummary>> {
        let events = EventRepository::list(pool, include_inactive).await?;
        Ok(events.into_iter().map(EventSummary::from).collect())
    }

    /// Delete event, cascading to everything played on it
    pub async fn delete_event(pool: &PgPool, id: &Uuid) -> AppResult<CascadeCounts> {
        let mut tx = pool.begin().await?;

        EventRepository::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
        let counts = EventRepository::delete(&mut *tx, id).await?;

        tx.commit().await?;

        info!(event_id = %id, ?counts, "Event deleted");
        Ok(counts)
    }

    pub(crate) async fn find_visible(pool: &PgPool, id: &Uuid, is_admin: bool) -> AppResult<Event> {
        EventRepository::find_by_id(pool, id)
            .await?
            .filter(|event| is_admin || event.is_active)
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
    }
}

fn slug_taken(err: AppError, slug: &str) -> AppError {
    match err {
        AppError::AlreadyExists(_) => {
            AppError::AlreadyExists(format!("Event slug '{}' is already taken", slug))
        }
        other => other,
    }
}
