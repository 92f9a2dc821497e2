//! Contest repository

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{CascadeCounts, Contest, ContestListing, ContestState},
};

/// Largest spend and pick count held by any member of a contest
#[derive(Debug, Clone, Copy, Default, sqlx::FromRow)]
pub struct MemberUsage {
    pub max_spend: i64,
    pub max_picks: i64,
}

/// Repository for contest database operations
pub struct ContestRepository;

impl ContestRepository {
    /// Create a new contest in `setup`
    pub async fn create<'e, E: PgExecutor<'e>>(
        executor: E,
        event_id: &Uuid,
        slug: &str,
        name: &str,
        description: Option<&str>,
        budget: i32,
        max_entities: i32,
        deadline: DateTime<Utc>,
    ) -> AppResult<Contest> {
        let contest = sqlx::query_as::<_, Contest>(
            r#"
            INSERT INTO contests (event_id, slug, name, description, state, budget, max_entities, deadline)
            VALUES ($1, $2, $3, $4, 'setup', $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(event_id)
        .bind(slug)
        .bind(name)
        .bind(description)
        .bind(budget)
        .bind(max_entities)
        .bind(deadline)
        .fetch_one(executor)
        .await?;

        Ok(contest)
    }

    /// Find contest by ID
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(executor: E, id: &Uuid) -> AppResult<Option<Contest>> {
        let contest = sqlx::query_as::<_, Contest>(r#"SELECT * FROM contests WHERE id = $1"#)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(contest)
    }

    /// Find contest and hold a share lock on its row until the transaction ends.
    ///
    /// Blocks state transitions (which update the row) while a dependent
    /// write is in flight.
    pub async fn find_for_share<'e, E: PgExecutor<'e>>(
        executor: E,
        id: &Uuid,
    ) -> AppResult<Option<Contest>> {
        let contest =
            sqlx::query_as::<_, Contest>(r#"SELECT * FROM contests WHERE id = $1 FOR SHARE"#)
                .bind(id)
                .fetch_optional(executor)
                .await?;

        Ok(contest)
    }

    /// Find contest and lock its row for update
    pub async fn find_for_update<'e, E: PgExecutor<'e>>(
        executor: E,
        id: &Uuid,
    ) -> AppResult<Option<Contest>> {
        let contest =
            sqlx::query_as::<_, Contest>(r#"SELECT * FROM contests WHERE id = $1 FOR UPDATE"#)
                .bind(id)
                .fetch_optional(executor)
                .await?;

        Ok(contest)
    }

    /// Find contest by event and contest slugs
    pub async fn find_by_slugs<'e, E: PgExecutor<'e>>(
        executor: E,
        event_slug: &str,
        contest_slug: &str,
    ) -> AppResult<Option<Contest>> {
        let contest = sqlx::query_as::<_, Contest>(
            r#"
            SELECT c.* FROM contests c
            JOIN events e ON e.id = c.event_id
            WHERE e.slug = $1 AND c.slug = $2
            "#,
        )
        .bind(event_slug)
        .bind(contest_slug)
        .fetch_optional(executor)
        .await?;

        Ok(contest)
    }

    /// Update contest configuration; `None` keeps the stored value
    pub async fn update_config<'e, E: PgExecutor<'e>>(
        executor: E,
        id: &Uuid,
        slug: Option<&str>,
        name: Option<&str>,
        description: Option<&str>,
        budget: Option<i32>,
        max_entities: Option<i32>,
        deadline: Option<DateTime<Utc>>,
    ) -> AppResult<Contest> {
        let contest = sqlx::query_as::<_, Contest>(
            r#"
            UPDATE contests
            SET
                slug = COALESCE($2, slug),
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                budget = COALESCE($5, budget),
                max_entities = COALESCE($6, max_entities),
                deadline = COALESCE($7, deadline),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(slug)
        .bind(name)
        .bind(description)
        .bind(budget)
        .bind(max_entities)
        .bind(deadline)
        .fetch_one(executor)
        .await?;

        Ok(contest)
    }

    /// Move a contest to `state` if it is still at `observed_version`.
    ///
    /// Returns `None` when the version moved on underneath the caller.
    pub async fn set_state<'e, E: PgExecutor<'e>>(
        executor: E,
        id: &Uuid,
        state: ContestState,
        observed_version: i64,
    ) -> AppResult<Option<Contest>> {
        let contest = sqlx::query_as::<_, Contest>(
            r#"
            UPDATE contests
            SET state = $2, state_version = state_version + 1, updated_at = NOW()
            WHERE id = $1 AND state_version = $3
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(state.as_str())
        .bind(observed_version)
        .fetch_optional(executor)
        .await?;

        Ok(contest)
    }

    /// Current state version, read inside the caller's transaction
    pub async fn state_version<'e, E: PgExecutor<'e>>(executor: E, id: &Uuid) -> AppResult<Option<i64>> {
        let version: Option<i64> =
            sqlx::query_scalar(r#"SELECT state_version FROM contests WHERE id = $1"#)
                .bind(id)
                .fetch_optional(executor)
                .await?;

        Ok(version)
    }

    /// States of every contest of an event, share-locked
    pub async fn states_for_event<'e, E: PgExecutor<'e>>(
        executor: E,
        event_id: &Uuid,
    ) -> AppResult<Vec<ContestState>> {
        let raw: Vec<String> = sqlx::query_scalar(
            r#"SELECT state FROM contests WHERE event_id = $1 ORDER BY id FOR SHARE"#,
        )
        .bind(event_id)
        .fetch_all(executor)
        .await?;

        raw.into_iter()
            .map(|s| {
                s.parse::<ContestState>()
                    .map_err(|e| AppError::Internal(e.into()))
            })
            .collect()
    }

    /// Largest spend and pick count of any member
    pub async fn member_usage<'e, E: PgExecutor<'e>>(
        executor: E,
        contest_id: &Uuid,
    ) -> AppResult<MemberUsage> {
        let usage = sqlx::query_as::<_, MemberUsage>(
            r#"
            SELECT
                COALESCE(MAX(spend), 0)::BIGINT AS max_spend,
                COALESCE(MAX(picked), 0)::BIGINT AS max_picks
            FROM (
                SELECT SUM(e.cost) AS spend, COUNT(*) AS picked
                FROM picks p
                JOIN entities e ON e.event_id = p.event_id AND e.code = p.entity_code
                WHERE p.contest_id = $1
                GROUP BY p.user_id
            ) usage
            "#,
        )
        .bind(contest_id)
        .fetch_one(executor)
        .await?;

        Ok(usage)
    }

    /// List contests with member and pick counts in one query
    pub async fn list<'e, E: PgExecutor<'e>>(
        executor: E,
        event_id: Option<&Uuid>,
        include_inactive: bool,
    ) -> AppResult<Vec<ContestListing>> {
        let contests = sqlx::query_as::<_, ContestListing>(
            r#"
            SELECT
                c.id, c.event_id, e.slug AS event_slug, e.name AS event_name,
                c.slug, c.name, c.state, c.budget, c.max_entities, c.deadline,
                (SELECT COUNT(*) FROM memberships m WHERE m.contest_id = c.id) AS member_count,
                (SELECT COUNT(*) FROM picks p WHERE p.contest_id = c.id) AS pick_count
            FROM contests c
            JOIN events e ON e.id = c.event_id
            WHERE ($1::uuid IS NULL OR c.event_id = $1)
                AND ($2 OR e.is_active)
            ORDER BY e.start_date DESC, c.name
            "#,
        )
        .bind(event_id)
        .bind(include_inactive)
        .fetch_all(executor)
        .await?;

        Ok(contests)
    }

    /// Delete a contest with its memberships and picks
    pub async fn delete(conn: &mut PgConnection, id: &Uuid) -> AppResult<CascadeCounts> {
        let counts = sqlx::query_as::<_, CascadeCounts>(
            r#"
            SELECT
                1::BIGINT AS contests,
                (SELECT COUNT(*) FROM memberships WHERE contest_id = $1) AS memberships,
                (SELECT COUNT(*) FROM picks WHERE contest_id = $1) AS picks,
                0::BIGINT AS entities
            "#,
        )
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

        sqlx::query(r#"DELETE FROM contests WHERE id = $1"#)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(counts)
    }

    /// Count total contests
    pub async fn count<'e, E: PgExecutor<'e>>(executor: E) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM contests"#)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }
}
