//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod admin;
pub mod contests;
pub mod events;
pub mod health;

use axum::{Router, middleware};

use crate::{
    middleware::{auth::auth_middleware, rate_limit::rate_limit_middleware},
    state::AppState,
};

/// Create all API routes.
///
/// Everything except the health check requires a verified identity; the
/// rate limiter runs after authentication.
pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/events", events::routes())
        .nest("/contests", contests::routes())
        .nest("/admin", admin::routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new().merge(health::routes()).merge(protected)
}
