//! Scoring core
//!
//! Storage-free rules shared by the services: medal points, entry
//! validation, and leaderboard ranking.

pub mod aggregate;
pub mod points;
pub mod ranking;
pub mod validator;

pub use aggregate::{group_by_user, standing_of};
pub use points::{Tally, TallyError};
pub use ranking::{
    DisplayOrder, RankedTeam, SortDir, SortKey, Standing, TeamStanding, competition_ranks,
    mask_teams, rank_teams,
};
pub use validator::{SelectionError, SelectionRules, validate_selection};
