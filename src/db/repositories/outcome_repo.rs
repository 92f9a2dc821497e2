//! Outcome record repository

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{OutcomeListing, OutcomeRecord},
    scoring::Tally,
};

/// Repository for outcome record database operations
pub struct OutcomeRepository;

impl OutcomeRepository {
    /// Create or overwrite an entity's tallies; points are derived here
    pub async fn upsert<'e, E: PgExecutor<'e>>(
        executor: E,
        event_id: &Uuid,
        entity_code: &str,
        tally: Tally,
    ) -> AppResult<OutcomeRecord> {
        let record = sqlx::query_as::<_, OutcomeRecord>(
            r#"
            INSERT INTO outcomes (event_id, entity_code, gold, silver, bronze, points)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (event_id, entity_code) DO UPDATE
            SET
                gold = EXCLUDED.gold,
                silver = EXCLUDED.silver,
                bronze = EXCLUDED.bronze,
                points = EXCLUDED.points,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(event_id)
        .bind(entity_code)
        .bind(tally.gold)
        .bind(tally.silver)
        .bind(tally.bronze)
        .bind(tally.points())
        .fetch_one(executor)
        .await?;

        Ok(record)
    }

    /// Medal table of an event, best first
    pub async fn list_for_event<'e, E: PgExecutor<'e>>(
        executor: E,
        event_id: &Uuid,
    ) -> AppResult<Vec<OutcomeListing>> {
        let rows = sqlx::query_as::<_, OutcomeListing>(
            r#"
            SELECT
                o.entity_code, e.name AS entity_name,
                o.gold, o.silver, o.bronze, o.points, o.updated_at
            FROM outcomes o
            JOIN entities e ON e.event_id = o.event_id AND e.code = o.entity_code
            WHERE o.event_id = $1
            ORDER BY o.points DESC, o.gold DESC, o.silver DESC, o.bronze DESC, e.name
            "#,
        )
        .bind(event_id)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }
}
