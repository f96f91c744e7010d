//! Domain types shared by the token authority, its storage and HTTP layer.

pub mod entity;
pub mod refresh_token;
pub mod token;

pub use entity::{EntityKind, IdResponse, IdentityReference, Member};
pub use refresh_token::RefreshTokenRecord;
pub use token::{TokenIssuanceResult, TokenPair};
