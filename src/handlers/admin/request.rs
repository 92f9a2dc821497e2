//! Admin request DTOs

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::{
    constants::{MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH},
    models::ContestState,
    scoring::{Tally, TallyError},
};

/// Create event request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,

    pub slug: String,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Defaults to true
    pub is_active: Option<bool>,
}

/// Update event request; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: Option<String>,

    pub slug: Option<String>,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

/// Create contest request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateContestRequest {
    pub slug: String,

    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    #[validate(range(min = 0))]
    pub budget: Option<i32>,

    #[validate(range(min = 1))]
    pub max_entities: Option<i32>,

    /// RFC 3339, or `YYYY-MM-DDTHH:MM` taken as UTC
    pub deadline: String,
}

/// Update contest configuration request; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateContestRequest {
    pub slug: Option<String>,

    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: Option<String>,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: Option<String>,

    #[validate(range(min = 0))]
    pub budget: Option<i32>,

    #[validate(range(min = 1))]
    pub max_entities: Option<i32>,

    pub deadline: Option<String>,
}

/// State transition request
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub target: ContestState,

    /// `state_version` the caller last observed; a mismatch is a conflict
    pub expected_version: Option<i64>,
}

/// One entity row of an import batch
#[derive(Debug, Deserialize)]
pub struct EntityInput {
    pub code: String,
    pub name: String,
    pub cost: i32,
    pub reference_score: Option<i32>,
    pub is_active: Option<bool>,
}

/// Bulk entity import request
#[derive(Debug, Deserialize)]
pub struct ImportEntitiesRequest {
    pub entities: Vec<EntityInput>,
}

/// Medal tallies for one entity.
///
/// Kept untyped so a non-integer tally is reported against its field.
#[derive(Debug, Deserialize)]
pub struct UpdateOutcomeRequest {
    #[serde(default)]
    pub gold: Value,
    #[serde(default)]
    pub silver: Value,
    #[serde(default)]
    pub bronze: Value,
}

impl UpdateOutcomeRequest {
    pub fn tally(&self) -> Result<Tally, TallyError> {
        Tally::from_json(&self.gold, &self.silver, &self.bronze)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_request_rejects_missing_tally() {
        let request: UpdateOutcomeRequest =
            serde_json::from_str(r#"{"gold": 2, "silver": 1}"#).unwrap();
        let err = request.tally().unwrap_err();
        assert!(matches!(err, TallyError::NotInteger { field: "bronze", .. }));
    }

    #[test]
    fn test_transition_request_parses_state() {
        let request: TransitionRequest =
            serde_json::from_str(r#"{"target": "open", "expected_version": 0}"#).unwrap();
        assert_eq!(request.target, ContestState::Open);
        assert_eq!(request.expected_version, Some(0));

        assert!(serde_json::from_str::<TransitionRequest>(r#"{"target": "paused"}"#).is_err());
    }

    #[test]
    fn test_contest_request_bounds() {
        let request = CreateContestRequest {
            slug: "main".to_string(),
            name: "Main pool".to_string(),
            description: None,
            budget: Some(-1),
            max_entities: Some(0),
            deadline: "2024-07-26T17:30".to_string(),
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("budget"));
        assert!(fields.contains_key("max_entities"));
    }
}
