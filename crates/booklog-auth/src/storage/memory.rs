//! In-memory storage backends.

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};

use crate::AuthResult;
use crate::storage::identity::IdentityStorage;
use crate::storage::refresh_token::RefreshTokenStorage;
use crate::types::{EntityKind, IdentityReference, Member, RefreshTokenRecord};

/// Refresh token records held in a `DashMap`.
///
/// Each key lives in one shard, so the shard lock serializes all writes to a
/// given owner key.
#[derive(Debug, Default)]
pub struct InMemoryRefreshTokenStorage {
    records: DashMap<String, RefreshTokenRecord>,
}

impl InMemoryRefreshTokenStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RefreshTokenStorage for InMemoryRefreshTokenStorage {
    async fn find_by_key(&self, owner_key: &str) -> AuthResult<Option<RefreshTokenRecord>> {
        Ok(self.records.get(owner_key).map(|r| r.value().clone()))
    }

    async fn save(&self, record: &RefreshTokenRecord) -> AuthResult<RefreshTokenRecord> {
        self.records.insert(record.owner_key.clone(), record.clone());
        Ok(record.clone())
    }

    async fn replace_if_current(
        &self,
        expected_token: &str,
        record: &RefreshTokenRecord,
    ) -> AuthResult<bool> {
        // get_mut holds the shard write lock until the guard drops
        match self.records.get_mut(&record.owner_key) {
            Some(mut current) if current.matches(expected_token) => {
                *current = record.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, owner_key: &str) -> AuthResult<bool> {
        Ok(self.records.remove(owner_key).is_some())
    }
}

/// Members, stars and states held in memory.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStorage {
    members: DashMap<IdentityReference, Member>,
    entities: DashSet<(EntityKind, IdentityReference)>,
}

impl InMemoryIdentityStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a member.
    pub fn insert_member(&self, member: Member) {
        self.members.insert(member.idx, member);
    }

    /// Registers a star or state id.
    ///
    /// Members go through [`insert_member`](Self::insert_member); other kinds
    /// are ignored.
    pub fn insert_entity(&self, kind: EntityKind, idx: IdentityReference) {
        if matches!(kind, EntityKind::Star | EntityKind::State) {
            self.entities.insert((kind, idx));
        }
    }
}

#[async_trait]
impl IdentityStorage for InMemoryIdentityStorage {
    async fn find_member(&self, idx: IdentityReference) -> AuthResult<Option<Member>> {
        Ok(self.members.get(&idx).map(|m| m.value().clone()))
    }

    async fn exists(&self, kind: EntityKind, idx: IdentityReference) -> AuthResult<bool> {
        Ok(match kind {
            EntityKind::Member => self.members.contains_key(&idx),
            EntityKind::Star | EntityKind::State => self.entities.contains(&(kind, idx)),
            EntityKind::RefreshToken => false,
        })
    }
}
