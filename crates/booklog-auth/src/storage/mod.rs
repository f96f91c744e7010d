//! Storage traits for auth-related data.
//!
//! The token authority consumes two collaborators through these traits:
//!
//! - [`RefreshTokenStorage`] - one refresh token record per owner key
//! - [`IdentityStorage`] - members, stars and states by id
//!
//! [`memory`] provides `DashMap`-backed implementations used by the server
//! binary and the tests.

pub mod identity;
pub mod memory;
pub mod refresh_token;

pub use identity::IdentityStorage;
pub use memory::{InMemoryIdentityStorage, InMemoryRefreshTokenStorage};
pub use refresh_token::RefreshTokenStorage;
