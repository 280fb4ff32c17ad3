//! Permission guard: dual-write owner of the permission matrix.

use std::sync::RwLock;

use thiserror::Error;
use tracing::{error, info};

use txgate_core::{OperationKey, ProfileId, StoreError};

use crate::matrix::PermissionMatrix;
use crate::store::PermissionStore;

/// Failure of a guard mutation.
#[derive(Debug, Error)]
pub enum GuardError {
    /// The persistent write failed; the in-memory matrix was not touched.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The persistent write succeeded but the in-memory mirror could not be
    /// applied. Memory and storage may diverge until the process restarts
    /// and rebuilds the matrix from storage.
    #[error("permission matrix integrity fault: {0}")]
    IntegrityFault(String),
}

/// Loads, queries, and mutates the permission matrix.
///
/// ## Dual-write ordering
///
/// `grant`/`revoke` write the persistent store first and mirror to memory
/// only after that write succeeds. Storage is the durable source of truth;
/// the matrix is a cache rebuilt from it on every [`load`](Self::load). A
/// crash between the two steps leaves storage correct and memory
/// stale-but-safe after the next restart, never the reverse.
///
/// ## Concurrency
///
/// [`check`](Self::check) takes a read lock and never performs I/O or
/// crosses an await point. Writers serialize on an async mutex held across
/// the whole persist-then-mirror sequence, so a concurrent `check` during
/// the persist await observes the pre-write state (bounded staleness) and
/// never a torn one.
#[derive(Debug)]
pub struct PermissionGuard<S> {
    store: S,
    matrix: RwLock<PermissionMatrix>,
    write_gate: tokio::sync::Mutex<()>,
}

impl<S> PermissionGuard<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            matrix: RwLock::new(PermissionMatrix::empty()),
            write_gate: tokio::sync::Mutex::new(()),
        }
    }
}

impl<S: PermissionStore> PermissionGuard<S> {
    /// Load all grants from the store, rebuilding the matrix wholesale.
    ///
    /// Returns the number of grants loaded. Callers must treat a failure as
    /// a startup abort condition.
    pub async fn load(&self) -> Result<usize, GuardError> {
        let _gate = self.write_gate.lock().await;

        let grants = self.store.load_grants().await?;
        let matrix = PermissionMatrix::from_grants(grants);
        let count = matrix.grant_count();
        let profiles = matrix.profile_count();

        let mut current = self
            .matrix
            .write()
            .map_err(|_| GuardError::IntegrityFault("permission matrix lock poisoned".into()))?;
        *current = matrix;
        drop(current);

        info!(grant_count = count, profile_count = profiles, "permission matrix loaded");
        Ok(count)
    }

    /// O(1) membership test against the in-memory matrix only.
    ///
    /// Never touches persistent storage; this is the hot path executed on
    /// every dispatch. A poisoned lock denies (deny-by-default) and logs.
    pub fn check(&self, profile: ProfileId, key: &OperationKey) -> bool {
        match self.matrix.read() {
            Ok(matrix) => matrix.contains(profile, key),
            Err(_) => {
                error!(%profile, operation = %key, "permission matrix lock poisoned, denying");
                false
            }
        }
    }

    /// Persist a grant, then mirror it into the matrix.
    ///
    /// Idempotent: returns `Ok(false)` when the permission was already
    /// present, without a duplicate persisted row.
    pub async fn grant(&self, profile: ProfileId, key: &OperationKey) -> Result<bool, GuardError> {
        let _gate = self.write_gate.lock().await;

        self.store.insert_grant(profile, key).await?;

        let mut matrix = self.matrix.write().map_err(|_| {
            error!(%profile, operation = %key, "matrix mirror failed after persisted grant");
            GuardError::IntegrityFault(format!(
                "grant {profile}:{key} persisted but not mirrored (lock poisoned)"
            ))
        })?;
        let changed = matrix.insert(profile, key.clone());
        drop(matrix);

        if changed {
            info!(%profile, operation = %key, "permission granted");
        }
        Ok(changed)
    }

    /// Persist a revocation, then mirror it. Symmetric to [`grant`](Self::grant).
    pub async fn revoke(&self, profile: ProfileId, key: &OperationKey) -> Result<bool, GuardError> {
        let _gate = self.write_gate.lock().await;

        self.store.delete_grant(profile, key).await?;

        let mut matrix = self.matrix.write().map_err(|_| {
            error!(%profile, operation = %key, "matrix mirror failed after persisted revoke");
            GuardError::IntegrityFault(format!(
                "revoke {profile}:{key} persisted but not mirrored (lock poisoned)"
            ))
        })?;
        let changed = matrix.remove(profile, key);
        drop(matrix);

        if changed {
            info!(%profile, operation = %key, "permission revoked");
        }
        Ok(changed)
    }

    /// Sorted snapshot of one profile's effective grants.
    pub fn permissions_for(&self, profile: ProfileId) -> Vec<OperationKey> {
        match self.matrix.read() {
            Ok(matrix) => matrix.permissions_for(profile),
            Err(_) => Vec::new(),
        }
    }

    pub fn grant_count(&self) -> usize {
        self.matrix.read().map(|m| m.grant_count()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use proptest::prelude::*;
    use tokio::sync::Notify;

    use super::*;

    /// Set-semantics store with togglable write failures.
    #[derive(Default)]
    struct FakePermissionStore {
        rows: Mutex<HashSet<(ProfileId, OperationKey)>>,
        fail_writes: Mutex<bool>,
    }

    impl FakePermissionStore {
        fn set_fail_writes(&self, fail: bool) {
            *self.fail_writes.lock().unwrap() = fail;
        }

        fn row_count(&self) -> usize {
            self.rows.lock().unwrap().len()
        }

        fn check_writable(&self) -> Result<(), StoreError> {
            if *self.fail_writes.lock().unwrap() {
                Err(StoreError::unavailable("injected write failure"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl PermissionStore for FakePermissionStore {
        async fn load_grants(&self) -> Result<Vec<(ProfileId, OperationKey)>, StoreError> {
            Ok(self.rows.lock().unwrap().iter().cloned().collect())
        }

        async fn insert_grant(
            &self,
            profile: ProfileId,
            key: &OperationKey,
        ) -> Result<(), StoreError> {
            self.check_writable()?;
            self.rows.lock().unwrap().insert((profile, key.clone()));
            Ok(())
        }

        async fn delete_grant(
            &self,
            profile: ProfileId,
            key: &OperationKey,
        ) -> Result<(), StoreError> {
            self.check_writable()?;
            self.rows.lock().unwrap().remove(&(profile, key.clone()));
            Ok(())
        }
    }

    /// Store whose `insert_grant` parks until released, exposing the window
    /// between persist and mirror.
    #[derive(Default)]
    struct GatedPermissionStore {
        entered: Notify,
        release: Notify,
        rows: Mutex<HashSet<(ProfileId, OperationKey)>>,
    }

    #[async_trait]
    impl PermissionStore for GatedPermissionStore {
        async fn load_grants(&self) -> Result<Vec<(ProfileId, OperationKey)>, StoreError> {
            Ok(self.rows.lock().unwrap().iter().cloned().collect())
        }

        async fn insert_grant(
            &self,
            profile: ProfileId,
            key: &OperationKey,
        ) -> Result<(), StoreError> {
            self.entered.notify_one();
            self.release.notified().await;
            self.rows.lock().unwrap().insert((profile, key.clone()));
            Ok(())
        }

        async fn delete_grant(
            &self,
            profile: ProfileId,
            key: &OperationKey,
        ) -> Result<(), StoreError> {
            self.rows.lock().unwrap().remove(&(profile, key.clone()));
            Ok(())
        }
    }

    fn key(s: &str) -> OperationKey {
        OperationKey::parse(s).unwrap()
    }

    #[tokio::test]
    async fn grant_then_check_round_trip() {
        let guard = PermissionGuard::new(FakePermissionStore::default());
        guard.load().await.unwrap();

        let p = ProfileId::new(1);
        let k = key("Users.create");

        assert!(!guard.check(p, &k));
        assert!(guard.grant(p, &k).await.unwrap());
        assert!(guard.check(p, &k));
        assert!(guard.revoke(p, &k).await.unwrap());
        assert!(!guard.check(p, &k));
    }

    #[tokio::test]
    async fn grant_is_idempotent() {
        let store = Arc::new(FakePermissionStore::default());
        let guard = PermissionGuard::new(store.clone());
        guard.load().await.unwrap();

        let p = ProfileId::new(1);
        let k = key("Users.create");

        assert!(guard.grant(p, &k).await.unwrap());
        assert!(!guard.grant(p, &k).await.unwrap());

        assert_eq!(store.row_count(), 1);
        assert!(guard.check(p, &k));
    }

    #[tokio::test]
    async fn revoke_of_absent_grant_is_a_no_op() {
        let guard = PermissionGuard::new(FakePermissionStore::default());
        guard.load().await.unwrap();

        let changed = guard
            .revoke(ProfileId::new(1), &key("Users.create"))
            .await
            .unwrap();
        assert!(!changed);
    }

    #[tokio::test]
    async fn failed_persist_leaves_matrix_untouched() {
        let store = Arc::new(FakePermissionStore::default());
        let guard = PermissionGuard::new(store.clone());
        guard.load().await.unwrap();

        let p = ProfileId::new(1);
        let k = key("Users.create");

        store.set_fail_writes(true);
        let err = guard.grant(p, &k).await.unwrap_err();
        assert!(matches!(err, GuardError::Store(_)));
        assert!(!guard.check(p, &k));
        assert_eq!(store.row_count(), 0);

        // Symmetric for revoke.
        store.set_fail_writes(false);
        guard.grant(p, &k).await.unwrap();
        store.set_fail_writes(true);
        assert!(guard.revoke(p, &k).await.is_err());
        assert!(guard.check(p, &k));
    }

    #[tokio::test]
    async fn load_rebuilds_matrix_from_storage() {
        let store = Arc::new(FakePermissionStore::default());
        store
            .rows
            .lock()
            .unwrap()
            .insert((ProfileId::new(2), key("Orders.approve")));

        let guard = PermissionGuard::new(store);
        let loaded = guard.load().await.unwrap();

        assert_eq!(loaded, 1);
        assert!(guard.check(ProfileId::new(2), &key("Orders.approve")));
    }

    #[tokio::test]
    async fn permissions_snapshot_reflects_mutations() {
        let guard = PermissionGuard::new(FakePermissionStore::default());
        guard.load().await.unwrap();

        let p = ProfileId::new(1);
        guard.grant(p, &key("Users.update")).await.unwrap();
        guard.grant(p, &key("Users.create")).await.unwrap();

        let keys: Vec<String> = guard
            .permissions_for(p)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(keys, vec!["Users.create", "Users.update"]);
        assert_eq!(guard.grant_count(), 2);
    }

    #[tokio::test]
    async fn check_during_inflight_grant_observes_pre_grant_state() {
        let store = Arc::new(GatedPermissionStore::default());
        let guard = Arc::new(PermissionGuard::new(store.clone()));
        guard.load().await.unwrap();

        let p = ProfileId::new(1);
        let k = key("Users.create");

        let inflight = {
            let guard = Arc::clone(&guard);
            let k = k.clone();
            tokio::spawn(async move { guard.grant(p, &k).await })
        };

        // The grant is parked inside its persistent write: readers still see
        // the pre-grant matrix, not a torn one.
        store.entered.notified().await;
        assert!(!guard.check(p, &k));

        store.release.notify_one();
        assert!(inflight.await.unwrap().unwrap());

        // After the grant resolves, every check observes the new state.
        assert!(guard.check(p, &k));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Law: grant → check true → revoke → check false, for any key, and
        /// a double grant never writes a duplicate row.
        #[test]
        fn grant_revoke_round_trip_law(
            object in "[A-Z][a-z]{1,8}",
            method in "[a-z]{1,8}",
            profile in 1i64..1000,
        ) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();

            rt.block_on(async {
                let store = Arc::new(FakePermissionStore::default());
                let guard = PermissionGuard::new(store.clone());
                guard.load().await.unwrap();

                let p = ProfileId::new(profile);
                let k = OperationKey::new(object, method).unwrap();

                prop_assert!(!guard.check(p, &k));
                prop_assert!(guard.grant(p, &k).await.unwrap());
                prop_assert!(guard.check(p, &k));
                prop_assert!(!guard.grant(p, &k).await.unwrap());
                prop_assert_eq!(store.row_count(), 1);

                prop_assert!(guard.revoke(p, &k).await.unwrap());
                prop_assert!(!guard.check(p, &k));
                prop_assert_eq!(store.row_count(), 0);
                Ok(())
            })?;
        }
    }
}
