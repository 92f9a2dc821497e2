//! Rate limiting middleware
//!
//! Fixed-window counters in Redis, keyed by client IP and path bucket.
//! Redis failures let the request through.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, OriginalUri, Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use redis::AsyncCommands;
use tracing::warn;

use crate::{config::RateLimitConfig, error::AppError, state::AppState};

/// Throttling bucket a request counts against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Picks,
    Admin,
    General,
}

impl Bucket {
    /// Classify a request by method and full path
    pub fn for_request(method: &Method, path: &str) -> Self {
        if path.contains("/admin/") || path.ends_with("/admin") {
            Self::Admin
        } else if method != Method::GET && path.ends_with("/picks") {
            Self::Picks
        } else {
            Self::General
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Picks => "picks",
            Self::Admin => "admin",
            Self::General => "general",
        }
    }

    /// (max requests, window seconds)
    pub fn limits(&self, config: &RateLimitConfig) -> (i64, i64) {
        match self {
            Self::Picks => config.picks,
            Self::Admin => config.admin,
            Self::General => config.general,
        }
    }
}

/// Rate limit middleware
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let bucket = Bucket::for_request(request.method(), &path);
    let (limit, window) = bucket.limits(&state.config().rate_limit);
    let key = format!("rate_limit:{}:{}", ip, bucket.as_str());

    let mut redis = state.redis();
    let count: i64 = match redis.incr(&key, 1).await {
        Ok(count) => count,
        Err(e) => {
            warn!(error = %e, bucket = bucket.as_str(), "Rate limiter unavailable, allowing request");
            return Ok(next.run(request).await);
        }
    };

    if count == 1 {
        // Set expiry on first request of the window
        if let Err(e) = redis.expire::<_, ()>(&key, window).await {
            warn!(error = %e, key = %key, "Failed to set rate limit window");
        }
    }

    if count > limit {
        warn!(ip = %ip, bucket = bucket.as_str(), count, "Rate limit exceeded");
        return Err(AppError::TooManyRequests);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_classification() {
        assert_eq!(
            Bucket::for_request(&Method::PUT, "/api/v1/contests/abc/picks"),
            Bucket::Picks
        );
        assert_eq!(
            Bucket::for_request(&Method::GET, "/api/v1/contests/abc/picks"),
            Bucket::General
        );
        assert_eq!(
            Bucket::for_request(&Method::POST, "/api/v1/admin/events"),
            Bucket::Admin
        );
        assert_eq!(
            Bucket::for_request(&Method::GET, "/api/v1/contests/abc/leaderboard"),
            Bucket::General
        );
    }

    #[test]
    fn test_bucket_limits_follow_config() {
        let config = RateLimitConfig::default();
        assert_eq!(Bucket::Picks.limits(&config), config.picks);
        assert_eq!(Bucket::Admin.limits(&config), config.admin);
    }
}
