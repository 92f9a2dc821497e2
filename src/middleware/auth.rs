//! Authentication middleware
//!
//! Tokens are issued by the external identity provider; this service only
//! verifies them.

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{
    config::AdminConfig,
    constants::roles,
    error::{AppError, AppResult},
    state::AppState,
};

/// Identity token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Verify an HS256 identity token and return its claims
pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;

    Ok(token_data.claims)
}

/// Authenticated user extracted from the identity token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub is_admin: bool,
}

impl AuthenticatedUser {
    /// Build the request identity, resolving admin rights from role or allow-list
    pub fn from_claims(claims: Claims, admins: &AdminConfig) -> AppResult<Self> {
        let id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;
        let is_admin = claims.role == roles::ADMIN || admins.is_admin_email(&claims.email);

        Ok(Self {
            id,
            email: claims.email,
            role: claims.role,
            is_admin,
        })
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Authenticated administrator; rejects everyone else with Forbidden
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            debug!(user_id = %user.id, "Admin access denied");
            return Err(AppError::Forbidden(
                "Administrator access required".to_string(),
            ));
        }
        Ok(AdminUser(user))
    }
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let Some(auth_header) = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        debug!(path = %path, "Auth failed: No Authorization header");
        return Err(AppError::Unauthorized);
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        debug!(path = %path, "Auth failed: expected 'Bearer <token>'");
        return Err(AppError::Unauthorized);
    };

    let claims = verify_token(token, &state.config().jwt.secret).map_err(|e| {
        debug!(path = %path, error = ?e, "Auth failed: Token verification failed");
        e
    })?;

    let user = AuthenticatedUser::from_claims(claims, &state.config().admin)?;
    debug!(path = %path, user_id = %user.id, is_admin = user.is_admin, "User authenticated");

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-secret";

    fn claims(role: &str, email: &str, exp_offset: i64) -> Claims {
        let now = chrono::Utc::now().timestamp();
        Claims {
            sub: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
            exp: now + exp_offset,
            iat: now,
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_valid_token() {
        let original = claims(roles::PARTICIPANT, "ana@example.com", 3600);
        let verified = verify_token(&sign(&original, SECRET), SECRET).unwrap();
        assert_eq!(verified.sub, original.sub);
        assert_eq!(verified.email, "ana@example.com");
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = sign(&claims(roles::PARTICIPANT, "a@b.c", 3600), "other");
        assert!(matches!(
            verify_token(&token, SECRET),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token() {
        let token = sign(&claims(roles::PARTICIPANT, "a@b.c", -3600), SECRET);
        assert!(matches!(
            verify_token(&token, SECRET),
            Err(AppError::TokenExpired)
        ));
    }

    #[test]
    fn test_admin_by_role_or_allow_list() {
        let admins = AdminConfig::parse("Ops@Example.com");

        let by_role =
            AuthenticatedUser::from_claims(claims(roles::ADMIN, "x@example.com", 60), &admins)
                .unwrap();
        assert!(by_role.is_admin);

        let by_email = AuthenticatedUser::from_claims(
            claims(roles::PARTICIPANT, "ops@example.com", 60),
            &admins,
        )
        .unwrap();
        assert!(by_email.is_admin);

        let neither = AuthenticatedUser::from_claims(
            claims(roles::PARTICIPANT, "ana@example.com", 60),
            &admins,
        )
        .unwrap();
        assert!(!neither.is_admin);
    }

    #[test]
    fn test_non_uuid_subject_is_rejected() {
        let mut bad = claims(roles::PARTICIPANT, "a@b.c", 60);
        bad.sub = "user-42".to_string();
        assert!(matches!(
            AuthenticatedUser::from_claims(bad, &AdminConfig::default()),
            Err(AppError::InvalidToken)
        ));
    }
}
