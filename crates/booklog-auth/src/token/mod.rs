//! Token generation, validation, and rotation.
//!
//! This module provides:
//!
//! - JWT encoding and decoding ([`jwt`])
//! - The [`TokenAuthority`] that issues and rotates access/refresh pairs

pub mod jwt;
pub mod service;

pub use jwt::{JwtError, JwtService, SigningAlgorithm, SigningKeyPair, TokenClaims, TokenUse};
pub use service::{TokenAuthority, TokenConfig};
