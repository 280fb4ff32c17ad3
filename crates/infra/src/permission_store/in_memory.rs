//! In-memory permission store.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use txgate_auth::PermissionStore;
use txgate_core::{OperationKey, ProfileId, StoreError};

/// Grant storage held in memory with set semantics.
///
/// Intended for tests/dev. Insert and delete are naturally idempotent.
#[derive(Debug, Default)]
pub struct InMemoryPermissionStore {
    grants: RwLock<HashSet<(ProfileId, OperationKey)>>,
}

impl InMemoryPermissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grants(grants: impl IntoIterator<Item = (ProfileId, OperationKey)>) -> Self {
        Self {
            grants: RwLock::new(grants.into_iter().collect()),
        }
    }

    /// Number of persisted rows (duplicate-row assertions in tests).
    pub fn grant_count(&self) -> usize {
        self.grants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl PermissionStore for InMemoryPermissionStore {
    async fn load_grants(&self) -> Result<Vec<(ProfileId, OperationKey)>, StoreError> {
        let grants = self
            .grants
            .read()
            .map_err(|_| StoreError::unavailable("permission store lock poisoned"))?;
        Ok(grants.iter().cloned().collect())
    }

    async fn insert_grant(
        &self,
        profile: ProfileId,
        key: &OperationKey,
    ) -> Result<(), StoreError> {
        self.grants
            .write()
            .map_err(|_| StoreError::unavailable("permission store lock poisoned"))?
            .insert((profile, key.clone()));
        Ok(())
    }

    async fn delete_grant(
        &self,
        profile: ProfileId,
        key: &OperationKey,
    ) -> Result<(), StoreError> {
        self.grants
            .write()
            .map_err(|_| StoreError::unavailable("permission store lock poisoned"))?
            .remove(&(profile, key.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> OperationKey {
        OperationKey::parse(s).unwrap()
    }

    #[tokio::test]
    async fn insert_is_idempotent() {
        let store = InMemoryPermissionStore::new();
        let p = ProfileId::new(1);
        let k = key("Users.create");

        store.insert_grant(p, &k).await.unwrap();
        store.insert_grant(p, &k).await.unwrap();
        assert_eq!(store.grant_count(), 1);
    }

    #[tokio::test]
    async fn delete_of_absent_grant_succeeds() {
        let store = InMemoryPermissionStore::new();
        store
            .delete_grant(ProfileId::new(1), &key("Users.create"))
            .await
            .unwrap();
        assert_eq!(store.grant_count(), 0);
    }

    #[tokio::test]
    async fn load_returns_all_grants() {
        let store = InMemoryPermissionStore::with_grants(vec![
            (ProfileId::new(1), key("Users.create")),
            (ProfileId::new(2), key("Orders.approve")),
        ]);

        let loaded = store.load_grants().await.unwrap();
        assert_eq!(loaded.len(), 2);
    }
}
