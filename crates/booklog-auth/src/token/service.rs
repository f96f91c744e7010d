//! Token authority: issuance, validation and rotation of token pairs.
//!
//! Every member has at most one current refresh token, stored under the
//! member id (the owner key). Issuing a pair overwrites that record;
//! rotating a pair replaces it only if it still holds the presented token,
//! so a refresh token can be exchanged exactly once.
//!
//! # Usage
//!
//! ```ignore
//! use booklog_auth::token::{TokenAuthority, TokenConfig};
//!
//! let authority = TokenAuthority::new(jwt_service, refresh_storage, identity_storage, TokenConfig::default());
//!
//! let issued = authority.issue(42).await?;
//! let rotated = authority.rotate(&issued.jwt_token).await?;
//! ```

use std::sync::Arc;

use time::Duration;
use tracing::{debug, info, warn};

use crate::AuthResult;
use crate::config::{AuthConfig, MAX_TOKEN_LIFETIME};
use crate::error::AuthError;
use crate::storage::{IdentityStorage, RefreshTokenStorage};
use crate::token::jwt::{JwtError, JwtService, TokenClaims, TokenUse};
use crate::types::{
    EntityKind, IdResponse, IdentityReference, Member, RefreshTokenRecord, TokenIssuanceResult,
    TokenPair,
};

/// Lifetimes of issued tokens.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Access token lifetime.
    pub access_token_lifetime: Duration,

    /// Refresh token lifetime.
    pub refresh_token_lifetime: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            access_token_lifetime: Duration::minutes(30),
            refresh_token_lifetime: Duration::days(14),
        }
    }
}

impl TokenConfig {
    /// Builds the token configuration from the auth configuration.
    ///
    /// Lifetimes above [`MAX_TOKEN_LIFETIME`] are clamped to it.
    #[must_use]
    pub fn from_auth_config(config: &AuthConfig) -> Self {
        Self {
            access_token_lifetime: bounded_lifetime(config.access_token_lifetime),
            refresh_token_lifetime: bounded_lifetime(config.refresh_token_lifetime),
        }
    }

    /// Sets the access token lifetime.
    #[must_use]
    pub fn with_access_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.access_token_lifetime = lifetime;
        self
    }
}

/// Issues, validates and rotates access/refresh token pairs.
pub struct TokenAuthority {
    /// JWT service for encoding/decoding tokens.
    jwt_service: Arc<JwtService>,

    /// Current refresh token per owner key.
    refresh_token_storage: Arc<dyn RefreshTokenStorage>,

    /// Members, stars and states.
    identity_storage: Arc<dyn IdentityStorage>,

    /// Token lifetimes.
    config: TokenConfig,
}

impl TokenAuthority {
    /// Creates a new token authority.
    #[must_use]
    pub fn new(
        jwt_service: Arc<JwtService>,
        refresh_token_storage: Arc<dyn RefreshTokenStorage>,
        identity_storage: Arc<dyn IdentityStorage>,
        config: TokenConfig,
    ) -> Self {
        Self {
            jwt_service,
            refresh_token_storage,
            identity_storage,
            config,
        }
    }

    /// Issues a new token pair for a member.
    ///
    /// The member's refresh token record is created, or overwritten if one
    /// already exists.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound(Member, idx)` if the member does not exist.
    pub async fn issue(&self, idx: IdentityReference) -> AuthResult<TokenIssuanceResult> {
        let member = self.load_member(idx).await?;
        let owner_key = member.owner_key();

        let tokens = self.mint_pair(&owner_key)?;
        self.refresh_token_storage
            .save(&RefreshTokenRecord::new(&owner_key, &tokens.refresh_token))
            .await?;

        info!(owner_key = %owner_key, "Token pair issued");
        Ok(TokenIssuanceResult::new(&member, tokens))
    }

    /// Looks up the stored refresh token record of an owner.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound(RefreshToken, owner_key)` if no record exists.
    pub async fn find_refresh_record(&self, owner_key: &str) -> AuthResult<RefreshTokenRecord> {
        self.refresh_token_storage
            .find_by_key(owner_key)
            .await?
            .ok_or_else(|| AuthError::entity_not_found(EntityKind::RefreshToken, owner_key))
    }

    /// Exchanges a token pair for a new one.
    ///
    /// The refresh token must be valid and current; the access token may be
    /// expired but must be signed by this authority for the same owner.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - either token is blank (`Validation`, before any store access)
    /// - a token is malformed, mis-signed or of the wrong kind (`InvalidToken`)
    /// - the refresh token has expired (`TokenExpired`)
    /// - the member or its refresh record does not exist (`EntityNotFound`)
    /// - the refresh token was already replaced (`InvalidToken`)
    pub async fn rotate(&self, request: &TokenPair) -> AuthResult<TokenIssuanceResult> {
        request.validate()?;

        let refresh_claims = self
            .jwt_service
            .decode::<TokenClaims>(&request.refresh_token)
            .map_err(token_error)?
            .claims;
        expect_use(&refresh_claims, TokenUse::Refresh)?;

        let access_claims = self
            .jwt_service
            .decode_allow_expired::<TokenClaims>(&request.access_token)
            .map_err(token_error)?
            .claims;
        expect_use(&access_claims, TokenUse::Access)?;

        if access_claims.sub != refresh_claims.sub {
            warn!("Access and refresh token belong to different owners");
            return Err(AuthError::invalid_token(
                "access and refresh token were not issued together",
            ));
        }

        let idx: IdentityReference = refresh_claims
            .sub
            .parse()
            .map_err(|_| AuthError::invalid_token("token subject is not a member id"))?;

        let member = self.load_member(idx).await?;
        let owner_key = member.owner_key();
        let record = self.find_refresh_record(&owner_key).await?;

        if !record.matches(&request.refresh_token) {
            warn!(owner_key = %owner_key, "Stale refresh token presented");
            return Err(AuthError::invalid_token(
                "refresh token is no longer current",
            ));
        }

        let tokens = self.mint_pair(&owner_key)?;
        let replaced = self
            .refresh_token_storage
            .replace_if_current(
                &request.refresh_token,
                &RefreshTokenRecord::new(&owner_key, &tokens.refresh_token),
            )
            .await?;

        if !replaced {
            warn!(owner_key = %owner_key, "Refresh token was rotated concurrently");
            return Err(AuthError::invalid_token(
                "refresh token is no longer current",
            ));
        }

        info!(owner_key = %owner_key, "Token pair rotated");
        Ok(TokenIssuanceResult::new(&member, tokens))
    }

    /// Validates an access token and returns its claims.
    ///
    /// The owner must still hold a refresh token record, so access tokens
    /// stop working once their owner has logged out.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for a blank token, `TokenExpired` or
    /// `InvalidToken` for a bad one.
    pub async fn authenticate(&self, access_token: &str) -> AuthResult<TokenClaims> {
        if access_token.trim().is_empty() {
            return Err(AuthError::unauthorized("Empty Bearer token"));
        }

        let claims = self
            .jwt_service
            .decode::<TokenClaims>(access_token)
            .map_err(token_error)?
            .claims;
        expect_use(&claims, TokenUse::Access)?;

        if self
            .refresh_token_storage
            .find_by_key(&claims.sub)
            .await?
            .is_none()
        {
            debug!(owner_key = %claims.sub, "Access token of a logged out owner");
            return Err(AuthError::invalid_token("session has been logged out"));
        }

        Ok(claims)
    }

    /// Deletes the refresh token record of an owner (logout).
    ///
    /// Returns `true` if a record existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    pub async fn invalidate(&self, owner_key: &str) -> AuthResult<bool> {
        let removed = self.refresh_token_storage.delete(owner_key).await?;
        info!(owner_key = %owner_key, removed, "Refresh token invalidated");
        Ok(removed)
    }

    /// Confirms that an entity exists and echoes its id.
    ///
    /// # Errors
    ///
    /// Returns `EntityNotFound(kind, idx)` if it does not exist.
    pub async fn resolve(
        &self,
        kind: EntityKind,
        idx: IdentityReference,
    ) -> AuthResult<IdResponse> {
        let exists = match kind {
            EntityKind::RefreshToken => self
                .refresh_token_storage
                .find_by_key(&idx.to_string())
                .await?
                .is_some(),
            _ => self.identity_storage.exists(kind, idx).await?,
        };

        if exists {
            Ok(IdResponse::new(idx))
        } else {
            Err(AuthError::entity_not_found(kind, idx))
        }
    }

    async fn load_member(&self, idx: IdentityReference) -> AuthResult<Member> {
        self.identity_storage
            .find_member(idx)
            .await?
            .ok_or_else(|| AuthError::entity_not_found(EntityKind::Member, idx))
    }

    fn mint_pair(&self, owner_key: &str) -> AuthResult<TokenPair> {
        let issuer = self.jwt_service.issuer();

        let access = TokenClaims::new(
            issuer,
            owner_key,
            TokenUse::Access,
            self.config.access_token_lifetime.whole_seconds(),
        );
        let refresh = TokenClaims::new(
            issuer,
            owner_key,
            TokenUse::Refresh,
            self.config.refresh_token_lifetime.whole_seconds(),
        );

        let access_token = self
            .jwt_service
            .encode(&access)
            .map_err(|e| AuthError::internal(format!("Failed to encode access token: {}", e)))?;
        let refresh_token = self
            .jwt_service
            .encode(&refresh)
            .map_err(|e| AuthError::internal(format!("Failed to encode refresh token: {}", e)))?;

        Ok(TokenPair::new(access_token, refresh_token))
    }

    /// Gets the JWT service reference.
    #[must_use]
    pub fn jwt_service(&self) -> &Arc<JwtService> {
        &self.jwt_service
    }

    /// Gets the token configuration.
    #[must_use]
    pub fn config(&self) -> &TokenConfig {
        &self.config
    }
}

fn bounded_lifetime(lifetime: std::time::Duration) -> Duration {
    Duration::try_from(lifetime.min(MAX_TOKEN_LIFETIME)).unwrap_or(Duration::ZERO)
}

fn expect_use(claims: &TokenClaims, expected: TokenUse) -> AuthResult<()> {
    if claims.token_use != expected {
        return Err(AuthError::invalid_token(format!(
            "expected a {} token",
            expected.as_str()
        )));
    }
    Ok(())
}

fn token_error(err: JwtError) -> AuthError {
    match err {
        JwtError::Expired => AuthError::TokenExpired,
        other => AuthError::invalid_token(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{InMemoryIdentityStorage, InMemoryRefreshTokenStorage};
    use crate::token::jwt::SigningKeyPair;

    const ISSUER: &str = "https://booklog.example.com";

    fn create_test_authority() -> (
        TokenAuthority,
        Arc<InMemoryRefreshTokenStorage>,
        Arc<InMemoryIdentityStorage>,
    ) {
        let key_pair = SigningKeyPair::generate_ec().unwrap();
        let jwt_service = Arc::new(JwtService::new(key_pair, ISSUER));

        let refresh_storage = Arc::new(InMemoryRefreshTokenStorage::new());
        let identity_storage = Arc::new(InMemoryIdentityStorage::new());
        identity_storage.insert_member(Member::new(42, "Alice", "p.png"));
        identity_storage.insert_member(Member::new(7, "Bob", "b.png"));

        let authority = TokenAuthority::new(
            jwt_service,
            refresh_storage.clone(),
            identity_storage.clone(),
            TokenConfig::default(),
        );

        (authority, refresh_storage, identity_storage)
    }

    fn encode(authority: &TokenAuthority, claims: &TokenClaims) -> String {
        authority.jwt_service().encode(claims).unwrap()
    }

    #[tokio::test]
    async fn test_issue_returns_member_and_tokens() {
        let (authority, storage, _) = create_test_authority();

        let result = authority.issue(42).await.unwrap();

        assert_eq!(result.idx, 42);
        assert_eq!(result.name, "Alice");
        assert_eq!(result.profile_img, "p.png");
        assert!(!result.jwt_token.access_token.is_empty());
        assert!(!result.jwt_token.refresh_token.is_empty());
        assert_ne!(result.jwt_token.access_token, result.jwt_token.refresh_token);

        let record = storage.find_by_key("42").await.unwrap().unwrap();
        assert_eq!(record.token, result.jwt_token.refresh_token);
    }

    #[tokio::test]
    async fn test_issue_unknown_member() {
        let (authority, storage, _) = create_test_authority();

        let err = authority.issue(99).await.unwrap_err();
        assert_eq!(err.to_string(), "Member ID[99] is not found");
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_issue_twice_keeps_one_record() {
        let (authority, storage, _) = create_test_authority();

        authority.issue(42).await.unwrap();
        let second = authority.issue(42).await.unwrap();

        assert_eq!(storage.len(), 1);
        let record = authority.find_refresh_record("42").await.unwrap();
        assert_eq!(record.token, second.jwt_token.refresh_token);
    }

    #[tokio::test]
    async fn test_find_refresh_record_missing() {
        let (authority, _, _) = create_test_authority();

        let err = authority.find_refresh_record("42").await.unwrap_err();
        match err {
            AuthError::EntityNotFound { kind, id } => {
                assert_eq!(kind, EntityKind::RefreshToken);
                assert_eq!(id, "42");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rotate_replaces_pair_and_record() {
        let (authority, _, _) = create_test_authority();

        let issued = authority.issue(42).await.unwrap();
        let rotated = authority.rotate(&issued.jwt_token).await.unwrap();

        assert_eq!(rotated.idx, 42);
        assert_eq!(rotated.name, "Alice");
        assert_ne!(
            rotated.jwt_token.access_token,
            issued.jwt_token.access_token
        );
        assert_ne!(
            rotated.jwt_token.refresh_token,
            issued.jwt_token.refresh_token
        );

        let record = authority.find_refresh_record("42").await.unwrap();
        assert_eq!(record.token, rotated.jwt_token.refresh_token);
    }

    #[tokio::test]
    async fn test_rotate_blank_field_leaves_record_unchanged() {
        let (authority, _, _) = create_test_authority();
        let issued = authority.issue(42).await.unwrap();

        let request = TokenPair::new("", issued.jwt_token.refresh_token.clone());
        let err = authority.rotate(&request).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation { .. }));

        let request = TokenPair::new(issued.jwt_token.access_token.clone(), " ");
        let err = authority.rotate(&request).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation { .. }));

        let record = authority.find_refresh_record("42").await.unwrap();
        assert_eq!(record.token, issued.jwt_token.refresh_token);
    }

    #[tokio::test]
    async fn test_rotate_rejects_replaced_refresh_token() {
        let (authority, _, _) = create_test_authority();

        let issued = authority.issue(42).await.unwrap();
        let rotated = authority.rotate(&issued.jwt_token).await.unwrap();

        let err = authority.rotate(&issued.jwt_token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken { .. }));

        // The current pair is untouched by the failed attempt
        let record = authority.find_refresh_record("42").await.unwrap();
        assert_eq!(record.token, rotated.jwt_token.refresh_token);
    }

    /// Holds every `find_by_key` caller until all parties have read the
    /// record, so concurrent rotations all pass the current-token check.
    struct GatedRefreshTokenStorage {
        inner: InMemoryRefreshTokenStorage,
        gate: tokio::sync::Barrier,
    }

    #[async_trait::async_trait]
    impl RefreshTokenStorage for GatedRefreshTokenStorage {
        async fn find_by_key(&self, owner_key: &str) -> AuthResult<Option<RefreshTokenRecord>> {
            let record = self.inner.find_by_key(owner_key).await?;
            self.gate.wait().await;
            Ok(record)
        }

        async fn save(&self, record: &RefreshTokenRecord) -> AuthResult<RefreshTokenRecord> {
            self.inner.save(record).await
        }

        async fn replace_if_current(
            &self,
            expected_token: &str,
            record: &RefreshTokenRecord,
        ) -> AuthResult<bool> {
            self.inner.replace_if_current(expected_token, record).await
        }

        async fn delete(&self, owner_key: &str) -> AuthResult<bool> {
            self.inner.delete(owner_key).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_rotation_has_one_winner() {
        let (_, _, identities) = create_test_authority();
        let storage = Arc::new(GatedRefreshTokenStorage {
            inner: InMemoryRefreshTokenStorage::new(),
            gate: tokio::sync::Barrier::new(2),
        });
        let authority = TokenAuthority::new(
            Arc::new(JwtService::new(SigningKeyPair::generate_ec().unwrap(), ISSUER)),
            storage.clone(),
            identities,
            TokenConfig::default(),
        );
        let issued = authority.issue(42).await.unwrap();

        // Both calls read the same current record before either swaps it
        let (first, second) = tokio::join!(
            authority.rotate(&issued.jwt_token),
            authority.rotate(&issued.jwt_token)
        );

        let (winner, loser) = match (first, second) {
            (Ok(winner), Err(loser)) | (Err(loser), Ok(winner)) => (winner, loser),
            (first, second) => panic!("expected one winner, got {first:?} and {second:?}"),
        };
        match loser {
            AuthError::InvalidToken { message } => {
                assert_eq!(message, "refresh token is no longer current");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(storage.inner.len(), 1);
        let record = storage.inner.find_by_key("42").await.unwrap().unwrap();
        assert_eq!(record.token, winner.jwt_token.refresh_token);
    }

    #[tokio::test]
    async fn test_rotate_accepts_expired_access_token() {
        let (authority, storage, _) = create_test_authority();
        let issued = authority.issue(42).await.unwrap();

        let expired_access = encode(
            &authority,
            &TokenClaims::new(ISSUER, "42", TokenUse::Access, -3600),
        );
        let request = TokenPair::new(expired_access, issued.jwt_token.refresh_token.clone());

        let rotated = authority.rotate(&request).await.unwrap();
        assert_eq!(
            storage.find_by_key("42").await.unwrap().unwrap().token,
            rotated.jwt_token.refresh_token
        );
    }

    #[tokio::test]
    async fn test_rotate_rejects_expired_refresh_token() {
        let (authority, storage, _) = create_test_authority();
        let issued = authority.issue(42).await.unwrap();

        let expired_refresh = encode(
            &authority,
            &TokenClaims::new(ISSUER, "42", TokenUse::Refresh, -3600),
        );
        storage
            .save(&RefreshTokenRecord::new("42", &expired_refresh))
            .await
            .unwrap();

        let request = TokenPair::new(issued.jwt_token.access_token, expired_refresh);
        let err = authority.rotate(&request).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn test_rotate_rejects_refresh_token_expired_seconds_ago() {
        let (authority, storage, _) = create_test_authority();
        let issued = authority.issue(42).await.unwrap();

        let expired_refresh = encode(
            &authority,
            &TokenClaims::new(ISSUER, "42", TokenUse::Refresh, -5),
        );
        storage
            .save(&RefreshTokenRecord::new("42", &expired_refresh))
            .await
            .unwrap();

        let request = TokenPair::new(issued.jwt_token.access_token, expired_refresh);
        let err = authority.rotate(&request).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn test_rotate_rejects_swapped_tokens() {
        let (authority, _, _) = create_test_authority();
        let issued = authority.issue(42).await.unwrap();

        let swapped = TokenPair::new(
            issued.jwt_token.refresh_token.clone(),
            issued.jwt_token.access_token.clone(),
        );
        let err = authority.rotate(&swapped).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken { .. }));
    }

    #[tokio::test]
    async fn test_rotate_rejects_mismatched_owners() {
        let (authority, _, _) = create_test_authority();
        let alice = authority.issue(42).await.unwrap();
        let bob = authority.issue(7).await.unwrap();

        let request = TokenPair::new(
            bob.jwt_token.access_token.clone(),
            alice.jwt_token.refresh_token.clone(),
        );
        let err = authority.rotate(&request).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken { .. }));
    }

    #[tokio::test]
    async fn test_rotate_rejects_garbage() {
        let (authority, _, _) = create_test_authority();

        let err = authority
            .rotate(&TokenPair::new("A", "R"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken { .. }));
    }

    #[tokio::test]
    async fn test_rotate_unknown_member() {
        let (authority, _, _) = create_test_authority();

        let access = encode(&authority, &TokenClaims::new(ISSUER, "99", TokenUse::Access, 60));
        let refresh = encode(&authority, &TokenClaims::new(ISSUER, "99", TokenUse::Refresh, 60));

        let err = authority
            .rotate(&TokenPair::new(access, refresh))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Member ID[99] is not found");
    }

    #[tokio::test]
    async fn test_rotate_after_invalidate() {
        let (authority, _, _) = create_test_authority();
        let issued = authority.issue(42).await.unwrap();

        assert!(authority.invalidate("42").await.unwrap());
        assert!(!authority.invalidate("42").await.unwrap());

        let err = authority.rotate(&issued.jwt_token).await.unwrap_err();
        assert_eq!(err.to_string(), "RefreshToken ID[42] is not found");

        // Invalidated --issue--> Issued
        let reissued = authority.issue(42).await.unwrap();
        assert!(authority.rotate(&reissued.jwt_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_authenticate() {
        let (authority, _, _) = create_test_authority();
        let issued = authority.issue(42).await.unwrap();

        let claims = authority
            .authenticate(&issued.jwt_token.access_token)
            .await
            .unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.iss, ISSUER);

        let err = authority
            .authenticate(&issued.jwt_token.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken { .. }));

        let err = authority.authenticate("").await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_after_logout() {
        let (authority, _, _) = create_test_authority();
        let issued = authority.issue(42).await.unwrap();

        authority.invalidate("42").await.unwrap();

        let err = authority
            .authenticate(&issued.jwt_token.access_token)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_expired() {
        let (authority, _, _) = create_test_authority();
        authority.issue(42).await.unwrap();

        let expired = encode(
            &authority,
            &TokenClaims::new(ISSUER, "42", TokenUse::Access, -3600),
        );
        let err = authority.authenticate(&expired).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn test_resolve() {
        let (authority, _, identity) = create_test_authority();
        identity.insert_entity(EntityKind::Star, 7);

        assert_eq!(
            authority.resolve(EntityKind::Star, 7).await.unwrap(),
            IdResponse::new(7)
        );
        assert_eq!(
            authority.resolve(EntityKind::Member, 42).await.unwrap().idx,
            42
        );

        let err = authority.resolve(EntityKind::State, 5).await.unwrap_err();
        assert_eq!(err.to_string(), "State ID[5] is not found");

        let err = authority.resolve(EntityKind::Star, 8).await.unwrap_err();
        assert_eq!(err.to_string(), "Star ID[8] is not found");

        let err = authority
            .resolve(EntityKind::RefreshToken, 42)
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        authority.issue(42).await.unwrap();
        assert!(authority.resolve(EntityKind::RefreshToken, 42).await.is_ok());
    }

    #[test]
    fn test_token_config_from_auth_config() {
        let config = TokenConfig::from_auth_config(&AuthConfig::default());
        assert_eq!(config.access_token_lifetime, Duration::minutes(30));
        assert_eq!(config.refresh_token_lifetime, Duration::days(14));

        let config = TokenConfig::default().with_access_token_lifetime(Duration::minutes(5));
        assert_eq!(config.access_token_lifetime, Duration::minutes(5));
    }

    #[test]
    fn test_token_config_clamps_oversized_lifetimes() {
        let mut auth_config = AuthConfig::default();
        auth_config.refresh_token_lifetime = std::time::Duration::from_secs(u64::MAX);

        let config = TokenConfig::from_auth_config(&auth_config);
        assert_eq!(config.refresh_token_lifetime, Duration::days(366));
        assert!(config.refresh_token_lifetime.is_positive());
    }

    #[tokio::test]
    async fn test_rotate_with_oversized_lifetime() {
        let (_, storage, identities) = create_test_authority();
        let mut auth_config = AuthConfig::default();
        auth_config.refresh_token_lifetime = std::time::Duration::from_secs(u64::MAX);

        let authority = TokenAuthority::new(
            Arc::new(JwtService::new(SigningKeyPair::generate_ec().unwrap(), ISSUER)),
            storage,
            identities,
            TokenConfig::from_auth_config(&auth_config),
        );

        let issued = authority.issue(42).await.unwrap();
        let rotated = authority.rotate(&issued.jwt_token).await.unwrap();
        assert_eq!(rotated.idx, 42);
    }
}
