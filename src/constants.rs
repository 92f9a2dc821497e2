//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default log format (`pretty` or `json`)
pub const DEFAULT_LOG_FORMAT: &str = "pretty";

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

/// Seconds to wait for a pooled connection before failing the request
pub const DATABASE_ACQUIRE_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// SCORING
// =============================================================================

/// Points awarded per medal tier
pub mod medal_points {
    pub const GOLD: i32 = 3;
    pub const SILVER: i32 = 2;
    pub const BRONZE: i32 = 1;
}

// =============================================================================
// CONTEST DEFAULTS
// =============================================================================

/// Budget used when a contest is created without one
pub const DEFAULT_CONTEST_BUDGET: i32 = 200;

/// Entity cap used when a contest is created without one
pub const DEFAULT_MAX_ENTITIES: i32 = 10;

// =============================================================================
// USER ROLES
// =============================================================================

/// Role claims carried by identity tokens
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const PARTICIPANT: &str = "participant";
}

// =============================================================================
// API VERSIONING
// =============================================================================

/// Current API version
pub const API_VERSION: &str = "v1";

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";

// =============================================================================
// RATE LIMITING
// =============================================================================

/// Rate limiting configuration
pub mod rate_limits {
    /// Pick submission - max requests
    pub const PICKS_MAX_REQUESTS: i64 = 10;
    /// Pick submission - window in seconds
    pub const PICKS_WINDOW_SECS: i64 = 60;

    /// Admin endpoints - max requests
    pub const ADMIN_MAX_REQUESTS: i64 = 120;
    /// Admin endpoints - window in seconds
    pub const ADMIN_WINDOW_SECS: i64 = 60;

    /// General API - max requests
    pub const GENERAL_MAX_REQUESTS: i64 = 100;
    /// General API - window in seconds
    pub const GENERAL_WINDOW_SECS: i64 = 60;
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum event / contest name length
pub const MAX_NAME_LENGTH: u64 = 128;

/// Maximum slug length
pub const MAX_SLUG_LENGTH: usize = 64;

/// Maximum description length
pub const MAX_DESCRIPTION_LENGTH: u64 = 4096;

/// Maximum team name length (after trimming)
pub const MAX_TEAM_NAME_LENGTH: usize = 64;

/// Maximum entity code length
pub const MAX_ENTITY_CODE_LENGTH: usize = 8;

/// Maximum entities accepted in a single import batch
pub const MAX_IMPORT_BATCH: usize = 500;
