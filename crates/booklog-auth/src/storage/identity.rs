//! Identity storage trait.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::{EntityKind, IdentityReference, Member};

/// Read access to the entities that tokens and responses refer to.
#[async_trait]
pub trait IdentityStorage: Send + Sync {
    /// Finds a member by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_member(&self, idx: IdentityReference) -> AuthResult<Option<Member>>;

    /// Returns `true` if an entity of `kind` with `idx` exists.
    ///
    /// Refresh token records are not identities; implementations return
    /// `false` for [`EntityKind::RefreshToken`].
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn exists(&self, kind: EntityKind, idx: IdentityReference) -> AuthResult<bool>;
}
