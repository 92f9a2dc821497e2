//! Outcome record service

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    db::repositories::{ContestRepository, EntityRepository, EventRepository, OutcomeRepository},
    error::{AppError, AppResult},
    handlers::admin::OutcomeResponse,
    models::{Action, ContestState, OutcomeListing},
    scoring::Tally,
};

/// Outcome service for business logic
pub struct OutcomeService;

impl OutcomeService {
    /// Write one entity's tallies with their derived points.
    ///
    /// An event has no phase of its own: writes are allowed once any of its
    /// contests is locked or complete.
    pub async fn update_outcome(
        pool: &PgPool,
        event_id: &Uuid,
        entity_code: &str,
        tally: Tally,
    ) -> AppResult<OutcomeResponse> {
        let code = entity_code.trim().to_uppercase();

        let mut tx = pool.begin().await?;

        EventRepository::find_by_id(&mut *tx, event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        let states = ContestRepository::states_for_event(&mut *tx, event_id).await?;
        ensure_outcomes_writable(&states)?;

        EntityRepository::find(&mut *tx, event_id, &code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Entity '{}' not found", code)))?;

        let record = OutcomeRepository::upsert(&mut *tx, event_id, &code, tally).await?;

        tx.commit().await?;

        info!(
            event_id = %event_id,
            entity_code = %code,
            gold = record.gold,
            silver = record.silver,
            bronze = record.bronze,
            points = record.points,
            "Outcome recorded"
        );

        Ok(record.into())
    }

    /// Medal table of an event
    pub async fn list_outcomes(pool: &PgPool, event_id: &Uuid) -> AppResult<Vec<OutcomeListing>> {
        EventRepository::find_by_id(pool, event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        OutcomeRepository::list_for_event(pool, event_id).await
    }
}

/// Allowed iff some contest permits outcome writes; otherwise report the most
/// advanced state (`setup` for an event without contests)
fn ensure_outcomes_writable(states: &[ContestState]) -> AppResult<()> {
    if states.iter().any(|s| s.permits(Action::WriteOutcome)) {
        return Ok(());
    }
    let most_advanced = states.iter().copied().max().unwrap_or_default();
    Err(AppError::invalid_state(most_advanced, Action::WriteOutcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ContestState::*;

    #[test]
    fn test_writable_once_any_contest_locked() {
        assert!(ensure_outcomes_writable(&[Open, Locked]).is_ok());
        assert!(ensure_outcomes_writable(&[Complete]).is_ok());
    }

    #[test]
    fn test_rejects_with_most_advanced_state() {
        let err = ensure_outcomes_writable(&[Setup, Open, Setup]).unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidState {
                state: Open,
                action: Action::WriteOutcome
            }
        ));
    }

    #[test]
    fn test_event_without_contests_reports_setup() {
        let err = ensure_outcomes_writable(&[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "write outcome: action not allowed in state 'setup'"
        );
    }
}
