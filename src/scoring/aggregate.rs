//! Grouping of batch-fetched picks per team

use std::collections::HashMap;

use uuid::Uuid;

use super::{points::Tally, ranking::Standing};
use crate::models::PickedEntity;

/// Group one contest-wide pick fetch by team, keeping fetch order per team
pub fn group_by_user(rows: Vec<PickedEntity>) -> HashMap<Uuid, Vec<PickedEntity>> {
    let mut grouped: HashMap<Uuid, Vec<PickedEntity>> = HashMap::new();
    for row in rows {
        grouped.entry(row.user_id).or_default().push(row);
    }
    grouped
}

/// Sum the outcome records behind a team's picks
pub fn standing_of(picks: &[PickedEntity]) -> Standing {
    picks.iter().fold(Standing::default(), |mut standing, pick| {
        standing.add(Tally {
            gold: pick.gold,
            silver: pick.silver,
            bronze: pick.bronze,
        });
        standing
    })
}
