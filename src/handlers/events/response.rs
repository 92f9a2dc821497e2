//! Event response DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Entity, Event, EventListing, OutcomeListing};

/// Event response
#[derive(Debug, Serialize)]
pub struct EventResponse {
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

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            slug: event.slug,
            description: event.description,
            start_date: event.start_date,
            end_date: event.end_date,
            is_active: event.is_active,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// Event summary for list views
#[derive(Debug, Serialize)]
pub struct EventSummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub contest_count: i64,
}

impl From<EventListing> for EventSummary {
    fn from(listing: EventListing) -> Self {
        let event = listing.event;
        Self {
            id: event.id,
            name: event.name,
            slug: event.slug,
            start_date: event.start_date,
            end_date: event.end_date,
            is_active: event.is_active,
            contest_count: listing.contest_count,
        }
    }
}

/// Event list response
#[derive(Debug, Serialize)]
pub struct EventsListResponse {
    pub events: Vec<EventSummary>,
    pub total: usize,
}

/// Draftable entity
#[derive(Debug, Serialize)]
pub struct EntityResponse {
    pub code: String,
    pub name: String,
    pub cost: i32,
    pub reference_score: i32,
    pub is_active: bool,
}

impl From<Entity> for EntityResponse {
    fn from(entity: Entity) -> Self {
        Self {
            code: entity.code,
            name: entity.name,
            cost: entity.cost,
            reference_score: entity.reference_score,
            is_active: entity.is_active,
        }
    }
}

/// Entity list response
#[derive(Debug, Serialize)]
pub struct EntitiesListResponse {
    pub event_id: Uuid,
    pub entities: Vec<EntityResponse>,
}

/// Medal table response
#[derive(Debug, Serialize)]
pub struct OutcomesListResponse {
    pub event_id: Uuid,
    pub outcomes: Vec<OutcomeListing>,
}
