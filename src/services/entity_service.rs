//! Entity (reference data) service

use std::collections::HashSet;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    constants::{MAX_IMPORT_BATCH, MAX_NAME_LENGTH},
    db::repositories::{ContestRepository, EntityRepository, EventRepository},
    error::{AppError, AppResult},
    handlers::{
        admin::{EntityInput, ImportEntitiesRequest},
        events::EntityResponse,
    },
    models::{Action, NewEntity},
    services::EventService,
    utils::{sanitize_string, validate_entity_code},
};

/// Entity service for business logic
pub struct EntityService;

impl EntityService {
    /// Bulk insert or update an event's entities.
    ///
    /// Refused once any contest of the event has left `setup`, so the costs
    /// behind accepted selections never move.
    pub async fn import_entities(
        pool: &PgPool,
        event_id: &Uuid,
        payload: ImportEntitiesRequest,
    ) -> AppResult<u64> {
        let entities = normalize_batch(payload.entities)?;

        let mut tx = pool.begin().await?;

        EventRepository::find_by_id(&mut *tx, event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        let states = ContestRepository::states_for_event(&mut *tx, event_id).await?;
        if let Some(state) = states.into_iter().max() {
            state.ensure_permits(Action::ImportEntities)?;
        }

        let imported = EntityRepository::upsert_many(&mut *tx, event_id, &entities).await?;
        tx.commit().await?;

        info!(event_id = %event_id, imported, "Entities imported");
        Ok(imported)
    }

    /// List an event's entities, most expensive first
    pub async fn list_entities(
        pool: &PgPool,
        event_id: &Uuid,
        is_admin: bool,
    ) -> AppResult<Vec<EntityResponse>> {
        EventService::find_visible(pool, event_id, is_admin).await?;

        let entities = EntityRepository::list_for_event(pool, event_id, is_admin).await?;
        Ok(entities.into_iter().map(EntityResponse::from).collect())
    }
}

/// Validate and normalize an import batch
fn normalize_batch(rows: Vec<EntityInput>) -> AppResult<Vec<NewEntity>> {
    if rows.is_empty() {
        return Err(AppError::Validation("Import batch is empty".to_string()));
    }
    if rows.len() > MAX_IMPORT_BATCH {
        return Err(AppError::Validation(format!(
            "Import batch has {} entities, exceeding the maximum of {}",
            rows.len(),
            MAX_IMPORT_BATCH
        )));
    }

    let mut seen = HashSet::with_capacity(rows.len());
    let mut entities = Vec::with_capacity(rows.len());

    for row in rows {
        let code = row.code.trim().to_uppercase();
        validate_entity_code(&code)
            .map_err(|e| AppError::Validation(format!("{}: '{}'", e, row.code)))?;
        if !seen.insert(code.clone()) {
            return Err(AppError::Validation(format!(
                "Duplicate entity '{}' in import batch",
                code
            )));
        }

        let name = sanitize_string(&row.name);
        if name.is_empty() || name.chars().count() as u64 > MAX_NAME_LENGTH {
            return Err(AppError::Validation(format!(
                "Entity '{}' needs a name of 1-{} characters",
                code, MAX_NAME_LENGTH
            )));
        }
        if row.cost < 1 {
            return Err(AppError::Validation(format!(
                "Entity '{}' cost must be at least 1, got {}",
                code, row.cost
            )));
        }
        let reference_score = row.reference_score.unwrap_or(0);
        if reference_score < 0 {
            return Err(AppError::Validation(format!(
                "Entity '{}' reference score must be non-negative, got {}",
                code, reference_score
            )));
        }

        entities.push(NewEntity {
            code,
            name,
            cost: row.cost,
            reference_score,
            is_active: row.is_active.unwrap_or(true),
        });
    }

    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(code: &str, cost: i32) -> EntityInput {
        EntityInput {
            code: code.to_string(),
            name: format!("Country {}", code),
            cost,
            reference_score: None,
            is_active: None,
        }
    }

    #[test]
    fn test_normalizes_codes_and_defaults() {
        let batch = normalize_batch(vec![input(" nor ", 40), input("USA", 120)]).unwrap();
        assert_eq!(batch[0].code, "NOR");
        assert_eq!(batch[0].reference_score, 0);
        assert!(batch[0].is_active);
        assert_eq!(batch[1].cost, 120);
    }

    #[test]
    fn test_rejects_duplicates_after_normalizing() {
        let err = normalize_batch(vec![input("nor", 40), input("NOR", 41)]).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("Duplicate entity 'NOR'")));
    }

    #[test]
    fn test_rejects_zero_cost_and_empty_batch() {
        assert!(normalize_batch(vec![input("NOR", 0)]).is_err());
        assert!(normalize_batch(Vec::new()).is_err());
    }
}
