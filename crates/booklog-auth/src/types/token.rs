//! Token pair request/response bodies.

use serde::{Deserialize, Serialize};

use crate::AuthResult;
use crate::error::AuthError;
use crate::types::entity::{IdentityReference, Member};

/// An access/refresh token pair.
///
/// Used both as the body of a refresh request and inside every
/// [`TokenIssuanceResult`]. Missing fields deserialize to empty strings so
/// that [`TokenPair::validate`] reports them the same way as blank ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenPair {
    /// Short-lived access token (JWT).
    pub access_token: String,

    /// Long-lived refresh token (JWT).
    pub refresh_token: String,
}

impl TokenPair {
    /// Creates a new token pair.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Checks that neither token is blank.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] naming the first blank field.
    pub fn validate(&self) -> AuthResult<()> {
        if self.access_token.trim().is_empty() {
            return Err(AuthError::validation("accessToken must not be blank"));
        }
        if self.refresh_token.trim().is_empty() {
            return Err(AuthError::validation("refreshToken must not be blank"));
        }
        Ok(())
    }
}

/// Result of a successful issuance or rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenIssuanceResult {
    /// Id of the member the tokens were issued to.
    pub idx: IdentityReference,

    /// The freshly issued token pair.
    pub jwt_token: TokenPair,

    /// Member profile image.
    pub profile_img: String,

    /// Member display name.
    pub name: String,
}

impl TokenIssuanceResult {
    /// Builds the result for `member` carrying `tokens`.
    #[must_use]
    pub fn new(member: &Member, tokens: TokenPair) -> Self {
        Self {
            idx: member.idx,
            jwt_token: tokens,
            profile_img: member.profile_img.clone(),
            name: member.name.clone(),
        }
    }
}
