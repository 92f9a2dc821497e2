//! Admin service

use sqlx::PgPool;

use crate::{
    db::repositories::{
        ContestRepository, EntityRepository, EventRepository, MembershipRepository,
        PickRepository,
    },
    error::AppResult,
    handlers::{
        admin::{OverviewResponse, OverviewTotals},
        contests::ContestSummary,
    },
};

/// Admin service for business logic
pub struct AdminService;

impl AdminService {
    /// Table totals and per-contest counts, all from aggregate queries
    pub async fn get_overview(pool: &PgPool) -> AppResult<OverviewResponse> {
        let (events, contests, memberships, entities, picks) = tokio::try_join!(
            EventRepository::count(pool),
            ContestRepository::count(pool),
            MembershipRepository::count(pool),
            EntityRepository::count(pool),
            PickRepository::count(pool),
        )?;

        let listing = ContestRepository::list(pool, None, true).await?;

        Ok(OverviewResponse {
            totals: OverviewTotals {
                events,
                contests,
                memberships,
                entities,
                picks,
            },
            contests: listing.into_iter().map(ContestSummary::from).collect(),
        })
    }
}
