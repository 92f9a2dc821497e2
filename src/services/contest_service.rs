//! Contest service
//!
//! Every check against the contest state runs in the same transaction as the
//! write that depends on it, with the contest row locked.

use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    constants::{DEFAULT_CONTEST_BUDGET, DEFAULT_MAX_ENTITIES},
    db::repositories::{ContestRepository, EventRepository, MembershipRepository},
    error::{AppError, AppResult},
    handlers::{
        admin::{CreateContestRequest, TransitionResponse, UpdateContestRequest},
        contests::{ContestResponse, ContestSummary, MembershipResponse, MyContestResponse},
    },
    models::{Action, CascadeCounts, ContestState},
    utils::{normalize_team_name, parse_deadline, validate_slug},
};

/// Contest service for business logic
pub struct ContestService;

impl ContestService {
    /// Create a new contest; contests always start in `setup`
    pub async fn create_contest(
        pool: &PgPool,
        event_id: &Uuid,
        payload: CreateContestRequest,
    ) -> AppResult<ContestResponse> {
        validate_slug(&payload.slug).map_err(|e| AppError::Validation(e.to_string()))?;
        let deadline = parse_deadline(&payload.deadline).ok_or_else(|| {
            AppError::Validation(format!("Invalid deadline '{}'", payload.deadline))
        })?;

        EventRepository::find_by_id(pool, event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        let contest = ContestRepository::create(
            pool,
            event_id,
            &payload.slug,
            payload.name.trim(),
            payload.description.as_deref(),
            payload.budget.unwrap_or(DEFAULT_CONTEST_BUDGET),
            payload.max_entities.unwrap_or(DEFAULT_MAX_ENTITIES),
            deadline,
        )
        .await
        .map_err(|e| slug_taken(e, &payload.slug))?;

        info!(contest_id = %contest.id, event_id = %event_id, "Contest created");
        Ok(contest.into())
    }

    /// Get contest by ID
    pub async fn get_contest(pool: &PgPool, id: &Uuid) -> AppResult<ContestResponse> {
        let contest = ContestRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))?;

        Ok(contest.into())
    }

    /// Get contest by event and contest slugs
    pub async fn get_contest_by_slugs(
        pool: &PgPool,
        event_slug: &str,
        contest_slug: &str,
    ) -> AppResult<ContestResponse> {
        let contest = ContestRepository::find_by_slugs(pool, event_slug, contest_slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))?;

        Ok(contest.into())
    }

    /// Update contest configuration.
    ///
    /// Budget and entity cap may not drop below what any member already holds.
    pub async fn update_contest(
        pool: &PgPool,
        id: &Uuid,
        payload: UpdateContestRequest,
    ) -> AppResult<ContestResponse> {
        if let Some(slug) = &payload.slug {
            validate_slug(slug).map_err(|e| AppError::Validation(e.to_string()))?;
        }
        let deadline = match &payload.deadline {
            Some(raw) => Some(parse_deadline(raw).ok_or_else(|| {
                AppError::Validation(format!("Invalid deadline '{}'", raw))
            })?),
            None => None,
        };

        let mut tx = pool.begin().await?;

        let contest = ContestRepository::find_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))?;
        contest.ensure_permits(Action::EditConfig)?;

        let lowers_budget = payload.budget.is_some_and(|b| b < contest.budget);
        let lowers_cap = payload.max_entities.is_some_and(|m| m < contest.max_entities);
        if lowers_budget || lowers_cap {
            let usage = ContestRepository::member_usage(&mut *tx, id).await?;
            if let Some(budget) = payload.budget
                && i64::from(budget) < usage.max_spend
            {
                return Err(AppError::Validation(format!(
                    "Budget {} is below an existing selection costing {}",
                    budget, usage.max_spend
                )));
            }
            if let Some(max) = payload.max_entities
                && i64::from(max) < usage.max_picks
            {
                return Err(AppError::Validation(format!(
                    "Maximum of {} entities is below an existing selection of {}",
                    max, usage.max_picks
                )));
            }
        }

        let slug = payload.slug.as_deref().unwrap_or(&contest.slug);
        let updated = ContestRepository::update_config(
            &mut *tx,
            id,
            payload.slug.as_deref(),
            payload.name.as_deref().map(str::trim),
            payload.description.as_deref(),
            payload.budget,
            payload.max_entities,
            deadline,
        )
        .await
        .map_err(|e| slug_taken(e, slug))?;

        tx.commit().await?;

        info!(contest_id = %id, state = %updated.state, "Contest config updated");
        Ok(updated.into())
    }

    /// Delete contest with its memberships and picks
    pub async fn delete_contest(pool: &PgPool, id: &Uuid) -> AppResult<CascadeCounts> {
        let mut tx = pool.begin().await?;

        ContestRepository::find_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))?;
        let counts = ContestRepository::delete(&mut *tx, id).await?;

        tx.commit().await?;

        info!(contest_id = %id, ?counts, "Contest deleted");
        Ok(counts)
    }

    /// List contests with member and pick counts
    pub async fn list_contests(
        pool: &PgPool,
        event_id: Option<&Uuid>,
        include_inactive: bool,
    ) -> AppResult<Vec<ContestSummary>> {
        let contests = ContestRepository::list(pool, event_id, include_inactive).await?;
        Ok(contests.into_iter().map(ContestSummary::from).collect())
    }

    /// Move a contest to its immediate successor state.
    ///
    /// A caller-supplied `expected_version` that no longer matches, or a
    /// version bump between read and write, is a conflict.
    pub async fn transition_state(
        pool: &PgPool,
        id: &Uuid,
        target: ContestState,
        expected_version: Option<i64>,
    ) -> AppResult<TransitionResponse> {
        let mut tx = pool.begin().await?;

        let contest = ContestRepository::find_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))?;

        if let Some(expected) = expected_version
            && expected != contest.state_version
        {
            warn!(
                contest_id = %id,
                expected,
                actual = contest.state_version,
                "Stale state transition rejected"
            );
            return Err(AppError::Conflict(format!(
                "Contest state changed (version {} expected, found {})",
                expected, contest.state_version
            )));
        }

        let next = contest.state.transition_to(target)?;

        let updated = ContestRepository::set_state(&mut *tx, id, next, contest.state_version)
            .await?
            .ok_or_else(|| {
                AppError::Conflict("Contest state changed during the transition".to_string())
            })?;

        tx.commit().await?;

        info!(
            contest_id = %id,
            from = %contest.state,
            to = %updated.state,
            version = updated.state_version,
            "Contest state transitioned"
        );

        Ok(TransitionResponse {
            previous_state: contest.state,
            contest: updated.into(),
        })
    }

    /// Join a contest, or rename the caller's team if already a member
    pub async fn join_contest(
        pool: &PgPool,
        contest_id: &Uuid,
        user_id: &Uuid,
        team_name: &str,
    ) -> AppResult<MembershipResponse> {
        let team_name =
            normalize_team_name(team_name).map_err(|e| AppError::Validation(e.to_string()))?;

        let mut tx = pool.begin().await?;

        let contest = ContestRepository::find_for_share(&mut *tx, contest_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))?;
        contest.ensure_permits(Action::JoinContest)?;

        let membership =
            MembershipRepository::upsert(&mut *tx, contest_id, user_id, &team_name).await?;

        tx.commit().await?;

        info!(contest_id = %contest_id, user_id = %user_id, "Membership saved");
        Ok(membership.into())
    }

    /// Contests the user has joined
    pub async fn list_my_contests(
        pool: &PgPool,
        user_id: &Uuid,
    ) -> AppResult<Vec<MyContestResponse>> {
        let contests = MembershipRepository::list_for_user(pool, user_id).await?;
        Ok(contests.into_iter().map(MyContestResponse::from).collect())
    }
}

fn slug_taken(err: AppError, slug: &str) -> AppError {
    match err {
        AppError::AlreadyExists(_) => AppError::AlreadyExists(format!(
            "Contest slug '{}' is already used in this event",
            slug
        )),
        other => other,
    }
}
