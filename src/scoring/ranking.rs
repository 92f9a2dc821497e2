//! Leaderboard ranking and display ordering
//!
//! Rank is computed once from the tiebreak tuple `(points, gold, silver,
//! bronze)` using competition ranking (1, 1, 3). Display order is a separate
//! sort chosen by the caller and never feeds back into rank.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::points::Tally;

/// Aggregated scoring of one team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Standing {
    pub points: i64,
    pub gold: i64,
    pub silver: i64,
    pub bronze: i64,
}

impl Standing {
    /// Ordered key used for ranking, compared descending
    pub fn tiebreak_key(&self) -> (i64, i64, i64, i64) {
        (self.points, self.gold, self.silver, self.bronze)
    }

    pub fn add(&mut self, tally: Tally) {
        self.points += i64::from(tally.points());
        self.gold += i64::from(tally.gold);
        self.silver += i64::from(tally.silver);
        self.bronze += i64::from(tally.bronze);
    }
}

/// A team before ranking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamStanding {
    pub user_id: Uuid,
    pub team_name: String,
    pub standing: Standing,
}

/// A team with its rank, in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedTeam {
    pub user_id: Uuid,
    pub team_name: String,
    pub standing: Standing,
    pub rank: u32,
}

/// Whitelisted display sort keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Points,
    Gold,
    Silver,
    Bronze,
    Name,
}

impl SortKey {
    /// Parse a caller-supplied key; anything off the whitelist is `None`
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "points" => Some(Self::Points),
            "gold" | "tiera" | "tier_a" => Some(Self::Gold),
            "silver" | "tierb" | "tier_b" => Some(Self::Silver),
            "bronze" | "tierc" | "tier_c" => Some(Self::Bronze),
            "name" => Some(Self::Name),
            _ => None,
        }
    }

    fn default_direction(&self) -> SortDir {
        match self {
            Self::Name => SortDir::Asc,
            _ => SortDir::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

impl SortDir {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Resolved display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DisplayOrder {
    pub key: SortKey,
    pub dir: SortDir,
}

impl DisplayOrder {
    /// Resolve raw query parameters.
    ///
    /// An unrecognised key falls back to `points desc` whatever the
    /// direction; a missing or unrecognised direction takes the key's default.
    pub fn resolve(key: Option<&str>, dir: Option<&str>) -> Self {
        let Some(key) = key.and_then(SortKey::parse) else {
            return Self::default();
        };
        let dir = dir
            .and_then(SortDir::parse)
            .unwrap_or_else(|| key.default_direction());
        Self { key, dir }
    }

    fn compare(&self, a: &RankedTeam, b: &RankedTeam) -> Ordering {
        let primary = match self.key {
            SortKey::Points => a.standing.points.cmp(&b.standing.points),
            SortKey::Gold => a.standing.gold.cmp(&b.standing.gold),
            SortKey::Silver => a.standing.silver.cmp(&b.standing.silver),
            SortKey::Bronze => a.standing.bronze.cmp(&b.standing.bronze),
            SortKey::Name => compare_names(a, b),
        };
        let primary = match self.dir {
            SortDir::Asc => primary,
            SortDir::Desc => primary.reverse(),
        };
        primary
            .then_with(|| compare_names(a, b))
            .then_with(|| a.user_id.cmp(&b.user_id))
    }
}

fn compare_names(a: &RankedTeam, b: &RankedTeam) -> Ordering {
    a.team_name
        .to_lowercase()
        .cmp(&b.team_name.to_lowercase())
        .then_with(|| a.team_name.cmp(&b.team_name))
}

/// Competition ranks keyed by team.
///
/// Tied tiebreak keys share the rank of the first team in the tie; the
/// next distinct key takes its 1-based position, so ranks can skip.
pub fn competition_ranks(teams: &[TeamStanding]) -> HashMap<Uuid, u32> {
    let mut sorted: Vec<&TeamStanding> = teams.iter().collect();
    sorted.sort_by(|a, b| b.standing.tiebreak_key().cmp(&a.standing.tiebreak_key()));

    let mut ranks = HashMap::with_capacity(sorted.len());
    let mut previous: Option<((i64, i64, i64, i64), u32)> = None;

    for (position, team) in sorted.into_iter().enumerate() {
        let key = team.standing.tiebreak_key();
        let rank = match previous {
            Some((prev_key, prev_rank)) if prev_key == key => prev_rank,
            _ => position as u32 + 1,
        };
        ranks.insert(team.user_id, rank);
        previous = Some((key, rank));
    }

    ranks
}

/// Rank teams, then order them for display
pub fn rank_teams(teams: Vec<TeamStanding>, order: DisplayOrder) -> Vec<RankedTeam> {
    let ranks = competition_ranks(&teams);
    let ranked = teams
        .into_iter()
        .map(|team| RankedTeam {
            rank: ranks.get(&team.user_id).copied().unwrap_or(1),
            user_id: team.user_id,
            team_name: team.team_name,
            standing: team.standing,
        })
        .collect();
    sort_for_display(ranked, order)
}

/// Open-phase view: scoring zeroed and every team ranked 1
pub fn mask_teams(teams: Vec<TeamStanding>, order: DisplayOrder) -> Vec<RankedTeam> {
    let masked = teams
        .into_iter()
        .map(|team| RankedTeam {
            user_id: team.user_id,
            team_name: team.team_name,
            standing: Standing::default(),
            rank: 1,
        })
        .collect();
    sort_for_display(masked, order)
}

fn sort_for_display(mut teams: Vec<RankedTeam>, order: DisplayOrder) -> Vec<RankedTeam> {
    teams.sort_by(|a, b| order.compare(a, b));
    teams
}
