//! Postgres-backed permission store.
//!
//! Idempotency is enforced at the database level: inserts use
//! `ON CONFLICT DO NOTHING` against the composite primary key, deletes of
//! absent rows are ordinary no-op deletes. The same grant therefore never
//! produces a duplicate row no matter how often it is written.
//!
//! Error mapping is shared with the route store (see `sqlx_support`).

use sqlx::{PgPool, Row};
use std::sync::Arc;
use tracing::instrument;

use txgate_auth::PermissionStore;
use txgate_core::{OperationKey, ProfileId, StoreError};

use crate::sqlx_support::map_sqlx_error;

/// Reads and writes the `permission_grants` table.
///
/// Schema (owned by provisioning tooling, not migrated here):
///
/// ```sql
/// CREATE TABLE permission_grants (
///     profile_id  BIGINT NOT NULL,
///     object_name TEXT NOT NULL,
///     method_name TEXT NOT NULL,
///     PRIMARY KEY (profile_id, object_name, method_name)
/// );
/// ```
#[derive(Debug, Clone)]
pub struct PostgresPermissionStore {
    pool: Arc<PgPool>,
}

impl PostgresPermissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl PermissionStore for PostgresPermissionStore {
    #[instrument(skip(self), err)]
    async fn load_grants(&self) -> Result<Vec<(ProfileId, OperationKey)>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT profile_id, object_name, method_name
            FROM permission_grants
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_grants", e))?;

        let mut grants = Vec::with_capacity(rows.len());
        for row in rows {
            let profile_id: i64 = row
                .try_get("profile_id")
                .map_err(|e| StoreError::query(format!("failed to read profile_id: {e}")))?;
            let object_name: String = row
                .try_get("object_name")
                .map_err(|e| StoreError::query(format!("failed to read object_name: {e}")))?;
            let method_name: String = row
                .try_get("method_name")
                .map_err(|e| StoreError::query(format!("failed to read method_name: {e}")))?;

            let key = OperationKey::new(object_name, method_name).map_err(|e| {
                StoreError::integrity(format!("grant for profile {profile_id}: {e}"))
            })?;
            grants.push((ProfileId::new(profile_id), key));
        }

        Ok(grants)
    }

    #[instrument(
        skip(self, key),
        fields(profile = %profile, operation = %key),
        err
    )]
    async fn insert_grant(
        &self,
        profile: ProfileId,
        key: &OperationKey,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO permission_grants (profile_id, object_name, method_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (profile_id, object_name, method_name) DO NOTHING
            "#,
        )
        .bind(profile.value())
        .bind(key.object())
        .bind(key.method())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_grant", e))?;

        Ok(())
    }

    #[instrument(
        skip(self, key),
        fields(profile = %profile, operation = %key),
        err
    )]
    async fn delete_grant(
        &self,
        profile: ProfileId,
        key: &OperationKey,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            DELETE FROM permission_grants
            WHERE profile_id = $1 AND object_name = $2 AND method_name = $3
            "#,
        )
        .bind(profile.value())
        .bind(key.object())
        .bind(key.method())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete_grant", e))?;

        Ok(())
    }
}
