//! Leaderboard service
//!
//! Reads run in one REPEATABLE READ transaction so members, picks and
//! outcome records come from a single snapshot.

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    db::repositories::{ContestRepository, MembershipRepository, PickRepository},
    error::{AppError, AppResult},
    handlers::contests::{LeaderboardResponse, PickedEntityResponse, TeamDetailResponse, TeamRow},
    models::{Action, Contest, Membership, PickedEntity},
    scoring::{
        DisplayOrder, Standing, TeamStanding, group_by_user, mask_teams, rank_teams, standing_of,
    },
};

/// Leaderboard service for business logic
pub struct LeaderboardService;

impl LeaderboardService {
    /// Ranked leaderboard in the caller's display order.
    ///
    /// Masked while the contest is open: zero scoring, rank 1, no entities.
    pub async fn get_leaderboard(
        pool: &PgPool,
        contest_id: &Uuid,
        sort: Option<&str>,
        dir: Option<&str>,
    ) -> AppResult<LeaderboardResponse> {
        let order = DisplayOrder::resolve(sort, dir);

        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await?;

        let contest = Self::readable_contest(&mut *tx, contest_id).await?;
        let members = MembershipRepository::list_for_contest(&mut *tx, contest_id).await?;

        let teams = if contest.state.masks_standings() {
            let standings = members.into_iter().map(unscored).collect();
            mask_teams(standings, order)
                .into_iter()
                .map(|team| TeamRow::new(team, None))
                .collect()
        } else {
            let mut picks = Self::picks_by_user(&mut *tx, contest_id, &members).await?;
            let standings = members
                .into_iter()
                .map(|member| scored(member, &picks))
                .collect();
            rank_teams(standings, order)
                .into_iter()
                .map(|team| {
                    let entities = entity_rows(picks.remove(&team.user_id));
                    TeamRow::new(team, Some(entities))
                })
                .collect()
        };

        tx.commit().await?;

        Ok(LeaderboardResponse {
            contest_id: contest.id,
            state: contest.state,
            masked: contest.state.masks_standings(),
            order,
            teams,
        })
    }

    /// A single team's row; its rank is computed against the whole contest.
    ///
    /// While masked, the entity list is only shown to the team's owner.
    pub async fn get_team_detail(
        pool: &PgPool,
        contest_id: &Uuid,
        team_user_id: &Uuid,
        caller_id: &Uuid,
    ) -> AppResult<TeamDetailResponse> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await?;

        let contest = Self::readable_contest(&mut *tx, contest_id).await?;
        let masked = contest.state.masks_standings();

        let team = if masked {
            let member = MembershipRepository::find(&mut *tx, contest_id, team_user_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Team not found".to_string()))?;
            let entities = if team_user_id == caller_id {
                let picks =
                    PickRepository::find_picked_entities(&mut *tx, contest_id, &[*team_user_id])
                        .await?;
                Some(entity_rows(Some(picks)))
            } else {
                None
            };
            let ranked = mask_teams(vec![unscored(member)], DisplayOrder::default());
            ranked
                .into_iter()
                .next()
                .map(|team| TeamRow::new(team, entities))
        } else {
            let members = MembershipRepository::list_for_contest(&mut *tx, contest_id).await?;
            let mut picks = Self::picks_by_user(&mut *tx, contest_id, &members).await?;
            let standings = members
                .into_iter()
                .map(|member| scored(member, &picks))
                .collect();
            rank_teams(standings, DisplayOrder::default())
                .into_iter()
                .find(|team| team.user_id == *team_user_id)
                .map(|team| {
                    let entities = entity_rows(picks.remove(&team.user_id));
                    TeamRow::new(team, Some(entities))
                })
        };

        tx.commit().await?;

        let team = team.ok_or_else(|| AppError::NotFound("Team not found".to_string()))?;
        Ok(TeamDetailResponse {
            contest_id: contest.id,
            state: contest.state,
            masked,
            team,
        })
    }

    async fn readable_contest(conn: &mut PgConnection, contest_id: &Uuid) -> AppResult<Contest> {
        let contest = ContestRepository::find_by_id(&mut *conn, contest_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))?;
        contest.ensure_permits(Action::ReadLeaderboard)?;
        Ok(contest)
    }

    /// One fetch for every member's picks, grouped by team
    async fn picks_by_user(
        conn: &mut PgConnection,
        contest_id: &Uuid,
        members: &[Membership],
    ) -> AppResult<HashMap<Uuid, Vec<PickedEntity>>> {
        let user_ids: Vec<Uuid> = members.iter().map(|m| m.user_id).collect();
        let rows = PickRepository::find_picked_entities(&mut *conn, contest_id, &user_ids).await?;
        Ok(group_by_user(rows))
    }
}

fn unscored(member: Membership) -> TeamStanding {
    TeamStanding {
        user_id: member.user_id,
        team_name: member.team_name,
        standing: Standing::default(),
    }
}

fn scored(member: Membership, picks: &HashMap<Uuid, Vec<PickedEntity>>) -> TeamStanding {
    let standing = picks
        .get(&member.user_id)
        .map(|p| standing_of(p))
        .unwrap_or_default();
    TeamStanding {
        user_id: member.user_id,
        team_name: member.team_name,
        standing,
    }
}

fn entity_rows(picks: Option<Vec<PickedEntity>>) -> Vec<PickedEntityResponse> {
    picks
        .unwrap_or_default()
        .into_iter()
        .map(PickedEntityResponse::from)
        .collect()
}
