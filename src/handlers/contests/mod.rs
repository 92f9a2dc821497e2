//! Contest participation handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Contest routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_contests))
        .route("/mine", get(handler::list_my_contests))
        .route(
            "/by-slug/{event_slug}/{contest_slug}",
            get(handler::get_contest_by_slug),
        )
        .route("/{id}", get(handler::get_contest))
        .route("/{id}/join", post(handler::join_contest))
        .route(
            "/{id}/picks",
            get(handler::get_my_picks).put(handler::submit_picks),
        )
        .route("/{id}/leaderboard", get(handler::get_leaderboard))
        .route("/{id}/teams/{user_id}", get(handler::get_team_detail))
}
