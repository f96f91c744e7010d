//! Token refresh and logout endpoints.
//!
//! ```ignore
//! POST /token/refresh
//! Content-Type: application/json
//!
//! {"accessToken": "...", "refreshToken": "..."}
//! ```
//!
//! Responds with `{idx, jwtToken: {accessToken, refreshToken}, profileImg, name}`.
//!
//! First pairs come from the login flow, which lives outside this crate and
//! calls [`TokenAuthority::issue`]. [`issue_handler`] exposes that call over
//! HTTP for development setups.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
};
use tracing::{debug, info, warn};

use crate::AuthResult;
use crate::error::AuthError;
use crate::token::TokenAuthority;
use crate::types::{IdentityReference, TokenIssuanceResult, TokenPair};

/// State required for the token endpoints.
#[derive(Clone)]
pub struct TokenState {
    authority: Arc<TokenAuthority>,
}

impl TokenState {
    /// Creates token state from an existing authority.
    pub fn new(authority: Arc<TokenAuthority>) -> Self {
        Self { authority }
    }

    /// Returns the shared authority.
    #[must_use]
    pub fn authority(&self) -> &Arc<TokenAuthority> {
        &self.authority
    }
}

/// Exchanges an access/refresh token pair for a new pair.
///
/// A body that is not a JSON object is reported like a blank field (400).
pub async fn refresh_handler(
    State(state): State<TokenState>,
    payload: Result<Json<TokenPair>, JsonRejection>,
) -> AuthResult<Json<TokenIssuanceResult>> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected refresh request body");
        AuthError::validation(rejection.body_text())
    })?;

    match state.authority.rotate(&request).await {
        Ok(result) => {
            info!(idx = result.idx, "Token refreshed");
            Ok(Json(result))
        }
        Err(e) => {
            warn!(error = %e, category = %e.category(), "Token refresh failed");
            Err(e)
        }
    }
}

/// Issues a fresh pair for a member, replacing any current refresh token.
///
/// Not authenticated. Only mount it where the login flow is stubbed out.
pub async fn issue_handler(
    State(state): State<TokenState>,
    Path(idx): Path<IdentityReference>,
) -> AuthResult<Json<TokenIssuanceResult>> {
    let result = state.authority.issue(idx).await?;
    info!(idx, "Token pair issued over the development route");
    Ok(Json(result))
}

/// Logs the bearer of the access token out by deleting their refresh token.
///
/// Responds with 204 No Content.
pub async fn logout_handler(
    State(state): State<TokenState>,
    headers: HeaderMap,
) -> AuthResult<StatusCode> {
    let token = bearer_token(&headers)?;
    let claims = state.authority.authenticate(token).await?;

    state.authority.invalidate(&claims.sub).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> AuthResult<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AuthError::unauthorized("Missing Authorization header"))?
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::unauthorized("Expected a Bearer token"))
}
