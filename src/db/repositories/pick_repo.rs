//! Pick repository

use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

use crate::{error::AppResult, models::PickedEntity};

/// Repository for pick database operations
pub struct PickRepository;

impl PickRepository {
    /// Replace a team's picks with `codes`.
    ///
    /// Must run inside the caller's transaction: the delete and insert are
    /// only atomic together.
    pub async fn replace(
        conn: &mut PgConnection,
        contest_id: &Uuid,
        event_id: &Uuid,
        user_id: &Uuid,
        codes: &[String],
    ) -> AppResult<u64> {
        sqlx::query(r#"DELETE FROM picks WHERE contest_id = $1 AND user_id = $2"#)
            .bind(contest_id)
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        let result = sqlx::query(
            r#"
            INSERT INTO picks (contest_id, event_id, user_id, entity_code)
            SELECT $1, $2, $3, code FROM UNNEST($4::text[]) AS selected(code)
            "#,
        )
        .bind(contest_id)
        .bind(event_id)
        .bind(user_id)
        .bind(codes)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Picks of the given teams joined with entities and outcomes.
    ///
    /// One query for the whole contest; entities without an outcome record
    /// score zero.
    pub async fn find_picked_entities<'e, E: PgExecutor<'e>>(
        executor: E,
        contest_id: &Uuid,
        user_ids: &[Uuid],
    ) -> AppResult<Vec<PickedEntity>> {
        let rows = sqlx::query_as::<_, PickedEntity>(
            r#"
            SELECT
                p.user_id, e.code, e.name, e.cost,
                COALESCE(o.gold, 0) AS gold,
                COALESCE(o.silver, 0) AS silver,
                COALESCE(o.bronze, 0) AS bronze,
                COALESCE(o.points, 0) AS points
            FROM picks p
            JOIN entities e ON e.event_id = p.event_id AND e.code = p.entity_code
            LEFT JOIN outcomes o ON o.event_id = p.event_id AND o.entity_code = p.entity_code
            WHERE p.contest_id = $1 AND p.user_id = ANY($2)
            ORDER BY p.user_id, e.cost DESC, e.code
            "#,
        )
        .bind(contest_id)
        .bind(user_ids)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }

    /// Count total picks
    pub async fn count<'e, E: PgExecutor<'e>>(executor: E) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM picks"#)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }
}
