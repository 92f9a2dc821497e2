//! Event request DTOs

use serde::Deserialize;

/// List events query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListEventsQuery {
    /// Honoured for administrators only
    pub include_inactive: Option<bool>,
}
