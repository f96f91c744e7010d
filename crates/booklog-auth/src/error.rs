//! Authentication error types.
//!
//! Every failure the token authority can report is a variant of
//! [`AuthError`]. Lookups that find nothing share a single
//! [`AuthError::EntityNotFound`] variant tagged with the [`EntityKind`]
//! that was being resolved.

use std::fmt;

use crate::types::EntityKind;

/// Errors that can occur while issuing, validating or rotating tokens.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A member, star, state or refresh token record could not be resolved.
    #[error("{kind} ID[{id}] is not found")]
    EntityNotFound {
        /// Kind of entity that was looked up.
        kind: EntityKind,
        /// The identifier that could not be resolved.
        id: String,
    },

    /// The request is malformed (e.g. a blank token field).
    #[error("Validation failed: {message}")]
    Validation {
        /// Description of the violated precondition.
        message: String,
    },

    /// The presented token is invalid, malformed or no longer current.
    #[error("Invalid token: {message}")]
    InvalidToken {
        /// Description of why the token is invalid.
        message: String,
    },

    /// The request lacks valid authentication credentials.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Description of why the request is unauthorized.
        message: String,
    },

    /// The presented token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// An error occurred while storing or retrieving auth data.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `EntityNotFound` error.
    #[must_use]
    pub fn entity_not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::EntityNotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Creates a new `Validation` error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidToken` error.
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a client error (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::EntityNotFound { .. }
                | Self::Validation { .. }
                | Self::InvalidToken { .. }
                | Self::Unauthorized { .. }
                | Self::TokenExpired
        )
    }

    /// Returns `true` if this is a server error (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Internal { .. })
    }

    /// Returns `true` if this is a not-found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EntityNotFound { .. })
    }

    /// Returns `true` if this is a token-related error.
    #[must_use]
    pub fn is_token_error(&self) -> bool {
        matches!(self, Self::InvalidToken { .. } | Self::TokenExpired)
    }

    /// Returns the error category for logging purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EntityNotFound { .. } => ErrorCategory::NotFound,
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::InvalidToken { .. } => ErrorCategory::Token,
            Self::Unauthorized { .. } => ErrorCategory::Authentication,
            Self::TokenExpired => ErrorCategory::Token,
            Self::Storage { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the short machine-readable error code used in HTTP bodies.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EntityNotFound { .. } => "not_found",
            Self::Validation { .. } => "invalid_request",
            Self::InvalidToken { .. } => "invalid_token",
            Self::Unauthorized { .. } => "unauthorized",
            Self::TokenExpired => "invalid_token",
            Self::Storage { .. } | Self::Internal { .. } => "server_error",
        }
    }
}

/// Categories of authentication errors for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A referenced entity does not exist.
    NotFound,
    /// Request validation errors.
    Validation,
    /// Token-related errors (validation, expiration).
    Token,
    /// Missing or malformed credentials.
    Authentication,
    /// Infrastructure/storage errors.
    Infrastructure,
    /// Internal server errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Validation => write!(f, "validation"),
            Self::Token => write!(f, "token"),
            Self::Authentication => write!(f, "authentication"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
