//! Medal tallies and the points they are worth

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{constants::medal_points, error::AppError};

/// Largest tally accepted for a single medal tier
pub const MAX_TALLY: i64 = 100_000;

/// Medal counts of one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    pub gold: i32,
    pub silver: i32,
    pub bronze: i32,
}

/// Rejected tally input, naming the offending field
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TallyError {
    #[error("{field} must be a non-negative integer, got {value}")]
    Negative { field: &'static str, value: i64 },

    #[error("{field} must be at most {max}, got {value}", max = MAX_TALLY)]
    TooLarge { field: &'static str, value: i64 },

    #[error("{field} must be a non-negative integer, got {value}")]
    NotInteger { field: &'static str, value: Value },
}

impl Tally {
    /// Build a tally from raw caller input
    pub fn new(gold: i64, silver: i64, bronze: i64) -> Result<Self, TallyError> {
        Ok(Self {
            gold: checked("gold", gold)?,
            silver: checked("silver", silver)?,
            bronze: checked("bronze", bronze)?,
        })
    }

    /// Build a tally from untyped JSON input, naming the first non-integer field
    pub fn from_json(gold: &Value, silver: &Value, bronze: &Value) -> Result<Self, TallyError> {
        Self::new(
            integer("gold", gold)?,
            integer("silver", silver)?,
            integer("bronze", bronze)?,
        )
    }

    /// `gold*3 + silver*2 + bronze*1`
    pub fn points(&self) -> i32 {
        self.gold * medal_points::GOLD
            + self.silver * medal_points::SILVER
            + self.bronze * medal_points::BRONZE
    }
}

fn integer(field: &'static str, value: &Value) -> Result<i64, TallyError> {
    value.as_i64().ok_or_else(|| TallyError::NotInteger {
        field,
        value: value.clone(),
    })
}

fn checked(field: &'static str, value: i64) -> Result<i32, TallyError> {
    if value < 0 {
        return Err(TallyError::Negative { field, value });
    }
    if value > MAX_TALLY {
        return Err(TallyError::TooLarge { field, value });
    }
    // bounded by MAX_TALLY above
    Ok(value as i32)
}

impl From<TallyError> for AppError {
    fn from(err: TallyError) -> Self {
        AppError::Validation(err.to_string())
    }
}
