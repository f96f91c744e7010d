//! Identity types.
//!
//! Members own credentials. Stars and states are only ever referenced by id,
//! either to echo that id back in an [`IdResponse`] or to report that it could
//! not be resolved.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric identifier of a member, star or state.
pub type IdentityReference = i64;

/// Kinds of entity that can be looked up by id or key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A registered member.
    Member,
    /// A star rating left by a member.
    Star,
    /// A reading state of a book for a member.
    State,
    /// A stored refresh token record, keyed by owner.
    RefreshToken,
}

impl EntityKind {
    /// Returns the kind name as it appears in error messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Star => "Star",
            Self::State => "State",
            Self::RefreshToken => "RefreshToken",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A member identity, as needed to build token responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Member id. Its decimal form is the owner key of the member's
    /// refresh token record.
    pub idx: IdentityReference,

    /// Display name.
    pub name: String,

    /// Profile image URL or path.
    pub profile_img: String,
}

impl Member {
    /// Creates a new member.
    #[must_use]
    pub fn new(
        idx: IdentityReference,
        name: impl Into<String>,
        profile_img: impl Into<String>,
    ) -> Self {
        Self {
            idx,
            name: name.into(),
            profile_img: profile_img.into(),
        }
    }

    /// Returns the key under which this member's refresh token is stored.
    #[must_use]
    pub fn owner_key(&self) -> String {
        self.idx.to_string()
    }
}

/// Response body that only echoes an entity id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdResponse {
    /// The resolved id.
    pub idx: IdentityReference,
}

impl IdResponse {
    /// Creates a new id response.
    #[must_use]
    pub fn new(idx: IdentityReference) -> Self {
        Self { idx }
    }
}
