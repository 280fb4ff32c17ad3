//! Permission persistence port.

use std::sync::Arc;

use async_trait::async_trait;

use txgate_core::{OperationKey, ProfileId, StoreError};

/// Authoritative storage for permission grants.
///
/// Storage is the durable source of truth across restarts; the in-memory
/// matrix is rebuilt from it on every load. `insert_grant` and
/// `delete_grant` must be idempotent at the storage layer (no duplicate
/// rows, deleting an absent row succeeds).
#[async_trait]
pub trait PermissionStore: Send + Sync {
    async fn load_grants(&self) -> Result<Vec<(ProfileId, OperationKey)>, StoreError>;

    async fn insert_grant(&self, profile: ProfileId, key: &OperationKey)
    -> Result<(), StoreError>;

    async fn delete_grant(&self, profile: ProfileId, key: &OperationKey)
    -> Result<(), StoreError>;
}

#[async_trait]
impl<S> PermissionStore for Arc<S>
where
    S: PermissionStore + ?Sized,
{
    async fn load_grants(&self) -> Result<Vec<(ProfileId, OperationKey)>, StoreError> {
        (**self).load_grants().await
    }

    async fn insert_grant(
        &self,
        profile: ProfileId,
        key: &OperationKey,
    ) -> Result<(), StoreError> {
        (**self).insert_grant(profile, key).await
    }

    async fn delete_grant(
        &self,
        profile: ProfileId,
        key: &OperationKey,
    ) -> Result<(), StoreError> {
        (**self).delete_grant(profile, key).await
    }
}
