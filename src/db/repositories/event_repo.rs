//! Event repository

use chrono::NaiveDate;
use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{CascadeCounts, Event, EventListing},
};

/// Repository for event database operations
pub struct EventRepository;

impl EventRepository {
    /// Create a new event
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        name: &str,
        slug: &str,
        description: Option<&str>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        is_active: bool,
    ) -> AppResult<Event> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (name, slug, description, start_date, end_date, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(start_date)
        .bind(end_date)
        .bind(is_active)
        .fetch_one(executor)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(executor: E, id: &Uuid) -> AppResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(r#"SELECT * FROM events WHERE id = $1"#)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(event)
    }

    /// Update event; `None` keeps the stored value
    pub async fn update<'e, E: PgExecutor<'e>>(
        executor: E,
        id: &Uuid,
        name: Option<&str>,
        slug: Option<&str>,
        description: Option<&str>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        is_active: Option<bool>,
    ) -> AppResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(start_date)
        .bind(end_date)
        .bind(is_active)
        .fetch_optional(executor)
        .await?;

        Ok(event)
    }

    /// List events newest first, with contest counts
    pub async fn list<'e, E: PgExecutor<'e>>(
        executor: E,
        include_inactive: bool,
    ) -> AppResult<Vec<EventListing>> {
        let events = sqlx::query_as::<_, EventListing>(
            r#"
            SELECT e.*, COUNT(c.id) AS contest_count
            FROM events e
            LEFT JOIN contests c ON c.event_id = e.id
            WHERE $1 OR e.is_active
            GROUP BY e.id
            ORDER BY e.start_date DESC, e.name
            "#,
        )
        .bind(include_inactive)
        .fetch_all(executor)
        .await?;

        Ok(events)
    }

    /// Delete an event and everything under it, returning what was removed
    pub async fn delete(conn: &mut PgConnection, id: &Uuid) -> AppResult<CascadeCounts> {
        let counts = sqlx::query_as::<_, CascadeCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM contests WHERE event_id = $1) AS contests,
                (SELECT COUNT(*) FROM memberships m
                    JOIN contests c ON c.id = m.contest_id
                    WHERE c.event_id = $1) AS memberships,
                (SELECT COUNT(*) FROM picks WHERE event_id = $1) AS picks,
                (SELECT COUNT(*) FROM entities WHERE event_id = $1) AS entities
            "#,
        )
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

        sqlx::query(r#"DELETE FROM events WHERE id = $1"#)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(counts)
    }

    /// Count total events
    pub async fn count<'e, E: PgExecutor<'e>>(executor: E) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM events"#)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }
}
