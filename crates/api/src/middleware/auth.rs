//! Bearer token extractors.
//!
//! Handlers declare what they need in their signature:
//!
//! ```rust,ignore
//! async fn create_product(RequireAdmin(admin): RequireAdmin, ...) -> Result<...> { ... }
//! async fn get_cart(RequireAuth(identity): RequireAuth, ...) -> Result<...> { ... }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::Span;

use mindwhiz_core::Role;

use crate::error::{AppError, set_sentry_user};
use crate::services::auth::{Identity, TokenError, require_role};
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// Rejects with 401 "Authentication required" when no token is sent and
/// "Invalid token" when it fails verification. On success the identity is
/// also stored in the request extensions.
pub struct RequireAuth(pub Identity);

/// Extractor that requires a valid bearer token with the Admin role.
pub struct RequireAdmin(pub Identity);

/// Pull the token out of `Authorization: Bearer <token>`.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(Self(identity.clone()));
        }

        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let identity = state.tokens().verify(token).map_err(|e| {
            match e {
                TokenError::Expired => tracing::debug!("rejected expired token"),
                other => tracing::debug!(error = %other, "rejected invalid token"),
            }
            AppError::Unauthorized("Invalid token".to_string())
        })?;

        Span::current().record("user_id", identity.user_id.as_i32());
        set_sentry_user(&identity.user_id, Some(identity.email.as_str()));
        parts.extensions.insert(identity.clone());

        Ok(Self(identity))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(identity) = RequireAuth::from_request_parts(parts, state).await?;
        require_role(&identity, Role::Admin)?;
        Ok(Self(identity))
    }
}
