//! Entity repository

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Entity, EntityCost, NewEntity},
};

/// Repository for entity database operations
pub struct EntityRepository;

impl EntityRepository {
    /// Insert or update a batch of entities in one statement
    pub async fn upsert_many<'e, E: PgExecutor<'e>>(
        executor: E,
        event_id: &Uuid,
        entities: &[NewEntity],
    ) -> AppResult<u64> {
        let codes: Vec<&str> = entities.iter().map(|e| e.code.as_str()).collect();
        let names: Vec<&str> = entities.iter().map(|e| e.name.as_str()).collect();
        let costs: Vec<i32> = entities.iter().map(|e| e.cost).collect();
        let scores: Vec<i32> = entities.iter().map(|e| e.reference_score).collect();
        let active: Vec<bool> = entities.iter().map(|e| e.is_active).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO entities (event_id, code, name, cost, reference_score, is_active)
            SELECT $1, code, name, cost, reference_score, is_active
            FROM UNNEST($2::text[], $3::text[], $4::int4[], $5::int4[], $6::bool[])
                AS incoming(code, name, cost, reference_score, is_active)
            ON CONFLICT (event_id, code) DO UPDATE
            SET
                name = EXCLUDED.name,
                cost = EXCLUDED.cost,
                reference_score = EXCLUDED.reference_score,
                is_active = EXCLUDED.is_active
            "#,
        )
        .bind(event_id)
        .bind(&codes)
        .bind(&names)
        .bind(&costs)
        .bind(&scores)
        .bind(&active)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// List entities of an event, most expensive first
    pub async fn list_for_event<'e, E: PgExecutor<'e>>(
        executor: E,
        event_id: &Uuid,
        include_inactive: bool,
    ) -> AppResult<Vec<Entity>> {
        let entities = sqlx::query_as::<_, Entity>(
            r#"
            SELECT * FROM entities
            WHERE event_id = $1 AND ($2 OR is_active)
            ORDER BY cost DESC, name ASC
            "#,
        )
        .bind(event_id)
        .bind(include_inactive)
        .fetch_all(executor)
        .await?;

        Ok(entities)
    }

    /// Costs of the active entities among `codes`, in one round trip
    pub async fn find_active_costs<'e, E: PgExecutor<'e>>(
        executor: E,
        event_id: &Uuid,
        codes: &[String],
    ) -> AppResult<Vec<EntityCost>> {
        let costs = sqlx::query_as::<_, EntityCost>(
            r#"
            SELECT code, cost FROM entities
            WHERE event_id = $1 AND code = ANY($2) AND is_active
            "#,
        )
        .bind(event_id)
        .bind(codes)
        .fetch_all(executor)
        .await?;

        Ok(costs)
    }

    /// Find a single entity by code
    pub async fn find<'e, E: PgExecutor<'e>>(
        executor: E,
        event_id: &Uuid,
        code: &str,
    ) -> AppResult<Option<Entity>> {
        let entity = sqlx::query_as::<_, Entity>(
            r#"SELECT * FROM entities WHERE event_id = $1 AND code = $2"#,
        )
        .bind(event_id)
        .bind(code)
        .fetch_optional(executor)
        .await?;

        Ok(entity)
    }

    /// Count total entities
    pub async fn count<'e, E: PgExecutor<'e>>(executor: E) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM entities"#)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }
}
