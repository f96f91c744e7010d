//! Refresh token storage trait.
//!
//! Records are keyed by owner key (the member id). Writes to one key must be
//! serialized by the implementation; writes to different keys are
//! independent.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::RefreshTokenRecord;

/// Storage trait for refresh token records.
///
/// # Implementations
///
/// - [`InMemoryRefreshTokenStorage`](super::InMemoryRefreshTokenStorage)
#[async_trait]
pub trait RefreshTokenStorage: Send + Sync {
    /// Finds the record stored for `owner_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_key(&self, owner_key: &str) -> AuthResult<Option<RefreshTokenRecord>>;

    /// Inserts the record, replacing any record with the same owner key.
    ///
    /// Returns the record as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be stored.
    async fn save(&self, record: &RefreshTokenRecord) -> AuthResult<RefreshTokenRecord>;

    /// Replaces the record for `record.owner_key` only if the stored token is
    /// still `expected_token`.
    ///
    /// The check and the write must happen atomically. Returns `false` when
    /// no record exists or it holds a different token.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn replace_if_current(
        &self,
        expected_token: &str,
        record: &RefreshTokenRecord,
    ) -> AuthResult<bool>;

    /// Deletes the record for `owner_key`.
    ///
    /// Returns `true` if a record was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn delete(&self, owner_key: &str) -> AuthResult<bool>;
}
