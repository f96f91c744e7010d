//! # booklog-auth
//!
//! Token lifecycle for the booklog service.
//!
//! This crate provides:
//! - Issuance of signed access/refresh token pairs for members
//! - Refresh token rotation with single-use refresh tokens
//! - Lookup of stored refresh token records
//! - A uniform not-found error for members, stars, states and refresh tokens
//!
//! ## Modules
//!
//! - [`config`] - Token lifetimes and signing key configuration
//! - [`token`] - JWT signing and the [`TokenAuthority`]
//! - [`storage`] - Storage traits and in-memory implementations
//! - [`types`] - Wire and record types
//! - [`http`] - Axum handlers for the token endpoints

pub mod config;
pub mod error;
pub mod http;
pub mod storage;
pub mod token;
pub mod types;

pub use config::{AuthConfig, ConfigError, MAX_TOKEN_LIFETIME, SigningConfig};
pub use error::{AuthError, ErrorCategory};
pub use http::{TokenState, issue_handler, logout_handler, refresh_handler};
pub use storage::{
    IdentityStorage, InMemoryIdentityStorage, InMemoryRefreshTokenStorage, RefreshTokenStorage,
};
pub use token::{
    JwtError, JwtService, SigningAlgorithm, SigningKeyPair, TokenAuthority, TokenClaims,
    TokenConfig, TokenUse,
};
pub use types::{
    EntityKind, IdResponse, IdentityReference, Member, RefreshTokenRecord, TokenIssuanceResult,
    TokenPair,
};

/// Type alias for token authority results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use booklog_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::config::{AuthConfig, ConfigError};
    pub use crate::error::{AuthError, ErrorCategory};
    pub use crate::storage::{IdentityStorage, RefreshTokenStorage};
    pub use crate::token::{TokenAuthority, TokenClaims, TokenConfig};
    pub use crate::types::{
        EntityKind, IdResponse, IdentityReference, Member, RefreshTokenRecord,
        TokenIssuanceResult, TokenPair,
    };
}
