//! Membership repository

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{JoinedContest, Membership},
};

/// Repository for membership database operations
pub struct MembershipRepository;

impl MembershipRepository {
    /// Join a contest, or rename the caller's team if already a member
    pub async fn upsert<'e, E: PgExecutor<'e>>(
        executor: E,
        contest_id: &Uuid,
        user_id: &Uuid,
        team_name: &str,
    ) -> AppResult<Membership> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (contest_id, user_id, team_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (contest_id, user_id) DO UPDATE
            SET team_name = EXCLUDED.team_name, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(contest_id)
        .bind(user_id)
        .bind(team_name)
        .fetch_one(executor)
        .await?;

        Ok(membership)
    }

    /// Find a user's membership in a contest
    pub async fn find<'e, E: PgExecutor<'e>>(
        executor: E,
        contest_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<Option<Membership>> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"SELECT * FROM memberships WHERE contest_id = $1 AND user_id = $2"#,
        )
        .bind(contest_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(membership)
    }

    /// Find a membership and lock its row until the transaction ends.
    ///
    /// Serializes selection replacements of one team.
    pub async fn find_for_update<'e, E: PgExecutor<'e>>(
        executor: E,
        contest_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<Option<Membership>> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"SELECT * FROM memberships WHERE contest_id = $1 AND user_id = $2 FOR UPDATE"#,
        )
        .bind(contest_id)
        .bind(user_id)
        .fetch_optional(executor)
        .await?;

        Ok(membership)
    }

    /// All memberships of a contest
    pub async fn list_for_contest<'e, E: PgExecutor<'e>>(
        executor: E,
        contest_id: &Uuid,
    ) -> AppResult<Vec<Membership>> {
        let memberships = sqlx::query_as::<_, Membership>(
            r#"SELECT * FROM memberships WHERE contest_id = $1 ORDER BY created_at, user_id"#,
        )
        .bind(contest_id)
        .fetch_all(executor)
        .await?;

        Ok(memberships)
    }

    /// Contests a user has joined, most recent event first
    pub async fn list_for_user<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: &Uuid,
    ) -> AppResult<Vec<JoinedContest>> {
        let contests = sqlx::query_as::<_, JoinedContest>(
            r#"
            SELECT
                c.id AS contest_id, c.slug AS contest_slug, c.name AS contest_name,
                e.id AS event_id, e.slug AS event_slug, e.name AS event_name,
                c.state, m.team_name,
                (SELECT COUNT(*) FROM picks p
                    WHERE p.contest_id = c.id AND p.user_id = m.user_id) AS pick_count,
                m.created_at AS joined_at
            FROM memberships m
            JOIN contests c ON c.id = m.contest_id
            JOIN events e ON e.id = c.event_id
            WHERE m.user_id = $1
            ORDER BY e.start_date DESC, c.name
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(contests)
    }

    /// Count total memberships
    pub async fn count<'e, E: PgExecutor<'e>>(executor: E) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM memberships"#)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }
}
