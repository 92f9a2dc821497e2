//! Entry validation for a proposed pick set
//!
//! Checks run in a fixed order and stop at the first violation:
//! empty selection, entity count, duplicates, then unknown codes and budget
//! against a single batched cost lookup.

use std::collections::{HashMap, HashSet};

use serde_json::json;

use crate::{error::AppError, models::Contest};

/// Limits a selection is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRules {
    pub budget: i32,
    pub max_entities: i32,
}

impl From<&Contest> for SelectionRules {
    fn from(contest: &Contest) -> Self {
        Self {
            budget: contest.budget,
            max_entities: contest.max_entities,
        }
    }
}

/// A violated selection rule together with the offending value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Select at least one entity")]
    Empty,

    #[error("Selection has {count} entities, exceeding the maximum of {max}")]
    TooMany { count: usize, max: i32 },

    #[error("Duplicate entity '{code}' in selection")]
    Duplicate { code: String },

    #[error("Unknown or inactive entity '{code}'")]
    UnknownEntity { code: String },

    #[error("Selection costs {total}, which exceeds budget by {over} (budget {budget})")]
    OverBudget { total: i64, budget: i32, over: i64 },
}

impl SelectionError {
    /// Stable identifier of the violated rule
    pub fn rule(&self) -> &'static str {
        match self {
            Self::Empty => "empty_selection",
            Self::TooMany { .. } => "too_many_entities",
            Self::Duplicate { .. } => "duplicate_entity",
            Self::UnknownEntity { .. } => "unknown_entity",
            Self::OverBudget { .. } => "over_budget",
        }
    }

    pub fn offending_value(&self) -> serde_json::Value {
        match self {
            Self::Empty => json!(0),
            Self::TooMany { count, .. } => json!(count),
            Self::Duplicate { code } | Self::UnknownEntity { code } => json!(code),
            Self::OverBudget { total, .. } => json!(total),
        }
    }
}

impl From<SelectionError> for AppError {
    fn from(err: SelectionError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Trim and uppercase submitted codes, preserving order and repeats
pub fn normalize_codes(codes: &[String]) -> Vec<String> {
    codes.iter().map(|c| c.trim().to_uppercase()).collect()
}

/// Checks that need no stored data: non-empty, count, duplicates
pub fn check_shape(rules: SelectionRules, codes: &[String]) -> Result<(), SelectionError> {
    if codes.is_empty() {
        return Err(SelectionError::Empty);
    }

    if codes.len() > rules.max_entities.max(0) as usize {
        return Err(SelectionError::TooMany {
            count: codes.len(),
            max: rules.max_entities,
        });
    }

    let mut seen = HashSet::with_capacity(codes.len());
    for code in codes {
        if !seen.insert(code.as_str()) {
            return Err(SelectionError::Duplicate { code: code.clone() });
        }
    }

    Ok(())
}

/// Budget check over costs fetched in one batch; returns the total cost.
///
/// `costs` holds only active entities of the contest's event, so a code
/// missing from it is unknown or inactive.
pub fn check_budget(
    rules: SelectionRules,
    codes: &[String],
    costs: &HashMap<String, i32>,
) -> Result<i64, SelectionError> {
    let mut total: i64 = 0;
    for code in codes {
        let cost = costs
            .get(code)
            .ok_or_else(|| SelectionError::UnknownEntity { code: code.clone() })?;
        total += i64::from(*cost);
    }

    let budget = i64::from(rules.budget);
    if total > budget {
        return Err(SelectionError::OverBudget {
            total,
            budget: rules.budget,
            over: total - budget,
        });
    }

    Ok(total)
}

/// Full validation in order, given the batched cost lookup
pub fn validate_selection(
    rules: SelectionRules,
    codes: &[String],
    costs: &HashMap<String, i32>,
) -> Result<i64, SelectionError> {
    check_shape(rules, codes)?;
    check_budget(rules, codes, costs)
}
