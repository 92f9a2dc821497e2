//! Pick service
//!
//! A submission replaces the caller's whole selection in one transaction:
//! state gate, validation, delete-then-insert and a final version re-check
//! all see the same share-locked contest row. The team's membership row is
//! locked for update, so two submissions of one team never interleave.

use std::collections::HashMap;

use serde_json::json;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    db::repositories::{
        ContestRepository, EntityRepository, MembershipRepository, PickRepository,
    },
    error::{AppError, AppErrorWithDetails, AppResult},
    handlers::contests::{PickedEntityResponse, PicksResponse},
    models::{Action, Contest, PickedEntity},
    scoring::{
        SelectionError, SelectionRules, standing_of,
        validator::{check_budget, check_shape, normalize_codes},
    },
};

/// Why a submission was turned down
#[derive(Debug)]
enum Rejection {
    Selection(SelectionError),
    Other(AppError),
}

impl From<SelectionError> for Rejection {
    fn from(err: SelectionError) -> Self {
        Self::Selection(err)
    }
}

impl From<AppError> for Rejection {
    fn from(err: AppError) -> Self {
        Self::Other(err)
    }
}

impl From<sqlx::Error> for Rejection {
    fn from(err: sqlx::Error) -> Self {
        Self::Other(err.into())
    }
}

impl Rejection {
    /// Attach the caller's selection, unchanged, to the error response
    fn with_selection(self, submitted: &[String]) -> AppErrorWithDetails {
        match self {
            Self::Selection(err) => {
                let details = json!({
                    "entity_codes": submitted,
                    "rule": err.rule(),
                    "value": err.offending_value(),
                });
                AppError::from(err).with_details(details)
            }
            Self::Other(err) => err.with_details(json!({ "entity_codes": submitted })),
        }
    }
}

/// Pick service for business logic
pub struct PickService;

impl PickService {
    /// Validate and store a selection, replacing any previous one
    pub async fn submit_picks(
        pool: &PgPool,
        contest_id: &Uuid,
        user_id: &Uuid,
        submitted: Vec<String>,
    ) -> Result<PicksResponse, AppErrorWithDetails> {
        Self::replace_selection(pool, contest_id, user_id, &submitted)
            .await
            .map_err(|rejection| {
                debug!(contest_id = %contest_id, user_id = %user_id, ?rejection, "Selection rejected");
                rejection.with_selection(&submitted)
            })
    }

    async fn replace_selection(
        pool: &PgPool,
        contest_id: &Uuid,
        user_id: &Uuid,
        submitted: &[String],
    ) -> Result<PicksResponse, Rejection> {
        let codes = normalize_codes(submitted);

        let mut tx = pool.begin().await?;

        let contest = ContestRepository::find_for_share(&mut *tx, contest_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))?;
        contest.ensure_permits(Action::SubmitPicks)?;

        // concurrent submissions of the same team queue here
        MembershipRepository::find_for_update(&mut *tx, contest_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::Forbidden("Join the contest before submitting picks".to_string())
            })?;

        let rules = SelectionRules::from(&contest);
        check_shape(rules, &codes)?;

        let costs: HashMap<String, i32> =
            EntityRepository::find_active_costs(&mut *tx, &contest.event_id, &codes)
                .await?
                .into_iter()
                .map(|entity| (entity.code, entity.cost))
                .collect();
        let total_cost = check_budget(rules, &codes, &costs)?;

        PickRepository::replace(&mut *tx, contest_id, &contest.event_id, user_id, &codes)
            .await?;

        let version = ContestRepository::state_version(&mut *tx, contest_id).await?;
        if version != Some(contest.state_version) {
            return Err(AppError::Conflict(
                "Contest state changed while saving picks".to_string(),
            )
            .into());
        }

        let picked = PickRepository::find_picked_entities(&mut *tx, contest_id, &[*user_id]).await?;

        tx.commit().await?;

        info!(
            contest_id = %contest_id,
            user_id = %user_id,
            count = codes.len(),
            total_cost,
            "Picks replaced"
        );

        Ok(picks_response(&contest, user_id, picked))
    }

    /// The caller's current selection, in any state; members only
    pub async fn get_my_picks(
        pool: &PgPool,
        contest_id: &Uuid,
        user_id: &Uuid,
    ) -> AppResult<PicksResponse> {
        let contest = ContestRepository::find_by_id(pool, contest_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))?;

        MembershipRepository::find(pool, contest_id, user_id)
            .await?
            .ok_or_else(|| AppError::Forbidden("Not a member of this contest".to_string()))?;

        let picked = PickRepository::find_picked_entities(pool, contest_id, &[*user_id]).await?;
        Ok(picks_response(&contest, user_id, picked))
    }
}

fn picks_response(contest: &Contest, user_id: &Uuid, picked: Vec<PickedEntity>) -> PicksResponse {
    let total_cost: i64 = picked.iter().map(|p| i64::from(p.cost)).sum();
    let total_points = standing_of(&picked).points;

    PicksResponse {
        contest_id: contest.id,
        user_id: *user_id,
        state: contest.state,
        entities: picked.into_iter().map(PickedEntityResponse::from).collect(),
        total_cost,
        total_points,
        budget: contest.budget,
        remaining_budget: i64::from(contest.budget) - total_cost,
        max_entities: contest.max_entities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_selection_rejection_echoes_input() {
        let submitted = codes(&["usa", " chn"]);
        let rejection = Rejection::from(SelectionError::OverBudget {
            total: 210,
            budget: 200,
            over: 10,
        });
        let err = rejection.with_selection(&submitted);

        assert!(matches!(err.error, AppError::Validation(ref msg) if msg.contains("exceeds budget by 10")));
        let details = err.details.unwrap();
        assert_eq!(details["entity_codes"], json!(["usa", " chn"]));
        assert_eq!(details["rule"], "over_budget");
        assert_eq!(details["value"], 210);
    }

    #[test]
    fn test_state_rejection_still_echoes_input() {
        let submitted = codes(&["NOR"]);
        let rejection = Rejection::from(AppError::invalid_state(
            crate::models::ContestState::Locked,
            Action::SubmitPicks,
        ));
        let err = rejection.with_selection(&submitted);

        assert_eq!(err.error.error_code(), "STATE_ERROR");
        let details = err.details.unwrap();
        assert_eq!(details["entity_codes"], json!(["NOR"]));
        assert!(details.get("rule").is_none());
    }
}
