//! Admin management handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Admin routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/overview", get(handler::get_overview))
        // Events
        .route("/events", post(handler::create_event))
        .route(
            "/events/{id}",
            put(handler::update_event).delete(handler::delete_event),
        )
        .route("/events/{id}/entities", put(handler::import_entities))
        .route("/events/{id}/outcomes/{code}", put(handler::update_outcome))
        .route("/events/{id}/contests", post(handler::create_contest))
        // Contests
        .route(
            "/contests/{id}",
            put(handler::update_contest).delete(handler::delete_contest),
        )
        .route("/contests/{id}/transition", post(handler::transition_contest))
}
