//! Utility functions

pub mod time;
pub mod validation;

pub use time::{parse_datetime, parse_deadline};
pub use validation::{
    normalize_team_name, sanitize_string, validate_entity_code, validate_slug,
};
