//! Input validation utilities

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{MAX_ENTITY_CODE_LENGTH, MAX_SLUG_LENGTH, MAX_TEAM_NAME_LENGTH};

/// Lowercase alphanumeric runs joined by single hyphens
static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("slug pattern compiles"));

static ENTITY_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]+$").expect("entity code pattern compiles"));

/// Validate slug format: lowercase letters, digits and single hyphens
pub fn validate_slug(slug: &str) -> Result<(), &'static str> {
    if slug.is_empty() {
        return Err("Slug cannot be empty");
    }
    if slug.len() > MAX_SLUG_LENGTH {
        return Err("Slug is too long");
    }
    if !SLUG_REGEX.is_match(slug) {
        return Err(
            "Slug can only contain lowercase letters, digits, and single inner hyphens",
        );
    }
    Ok(())
}

/// Validate an already-normalized entity code (uppercase ASCII letters and digits)
pub fn validate_entity_code(code: &str) -> Result<(), &'static str> {
    if code.is_empty() {
        return Err("Entity code cannot be empty");
    }
    if code.len() > MAX_ENTITY_CODE_LENGTH {
        return Err("Entity code is too long");
    }
    if !ENTITY_CODE_REGEX.is_match(code) {
        return Err("Entity code can only contain uppercase letters and digits");
    }
    Ok(())
}

/// Trim a team name and check its length, returning the stored form
pub fn normalize_team_name(raw: &str) -> Result<String, &'static str> {
    let name = sanitize_string(raw);
    if name.is_empty() {
        return Err("Team name cannot be empty");
    }
    if name.chars().count() > MAX_TEAM_NAME_LENGTH {
        return Err("Team name must be at most 64 characters");
    }
    Ok(name)
}

/// Sanitize string input (remove control characters, trim whitespace)
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}
