//! Event browsing handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Event routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_events))
        .route("/{id}", get(handler::get_event))
        .route("/{id}/entities", get(handler::list_entities))
        .route("/{id}/outcomes", get(handler::list_outcomes))
}
