//! In-memory permission matrix.

use std::collections::{HashMap, HashSet};

use txgate_core::{OperationKey, ProfileId};

/// Profile → set of granted operations.
///
/// A performance cache over the authoritative store, rebuilt wholesale on
/// every load. Mutated only through [`crate::PermissionGuard`].
#[derive(Debug, Default, Clone)]
pub struct PermissionMatrix {
    grants: HashMap<ProfileId, HashSet<OperationKey>>,
}

impl PermissionMatrix {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_grants(grants: impl IntoIterator<Item = (ProfileId, OperationKey)>) -> Self {
        let mut matrix = Self::empty();
        for (profile, key) in grants {
            matrix.insert(profile, key);
        }
        matrix
    }

    /// O(1) set-membership test.
    pub fn contains(&self, profile: ProfileId, key: &OperationKey) -> bool {
        self.grants
            .get(&profile)
            .is_some_and(|keys| keys.contains(key))
    }

    /// Returns `true` if the matrix changed (idempotent).
    pub fn insert(&mut self, profile: ProfileId, key: OperationKey) -> bool {
        self.grants.entry(profile).or_default().insert(key)
    }

    /// Returns `true` if the matrix changed (idempotent). Drops the profile
    /// entry once its last grant is gone.
    pub fn remove(&mut self, profile: ProfileId, key: &OperationKey) -> bool {
        let Some(keys) = self.grants.get_mut(&profile) else {
            return false;
        };
        let removed = keys.remove(key);
        if keys.is_empty() {
            self.grants.remove(&profile);
        }
        removed
    }

    /// Sorted snapshot of one profile's grants.
    pub fn permissions_for(&self, profile: ProfileId) -> Vec<OperationKey> {
        let mut keys: Vec<_> = self
            .grants
            .get(&profile)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    pub fn profile_count(&self) -> usize {
        self.grants.len()
    }

    pub fn grant_count(&self) -> usize {
        self.grants.values().map(HashSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> OperationKey {
        OperationKey::parse(s).unwrap()
    }

    #[test]
    fn membership_is_per_profile() {
        let mut matrix = PermissionMatrix::empty();
        matrix.insert(ProfileId::new(1), key("Users.create"));

        assert!(matrix.contains(ProfileId::new(1), &key("Users.create")));
        assert!(!matrix.contains(ProfileId::new(2), &key("Users.create")));
        assert!(!matrix.contains(ProfileId::new(1), &key("Users.delete")));
    }

    #[test]
    fn insert_and_remove_report_change() {
        let mut matrix = PermissionMatrix::empty();
        assert!(matrix.insert(ProfileId::new(1), key("Users.create")));
        assert!(!matrix.insert(ProfileId::new(1), key("Users.create")));

        assert!(matrix.remove(ProfileId::new(1), &key("Users.create")));
        assert!(!matrix.remove(ProfileId::new(1), &key("Users.create")));
        assert_eq!(matrix.profile_count(), 0);
    }

    #[test]
    fn permissions_snapshot_is_sorted() {
        let mut matrix = PermissionMatrix::empty();
        matrix.insert(ProfileId::new(1), key("Users.update"));
        matrix.insert(ProfileId::new(1), key("Orders.create"));
        matrix.insert(ProfileId::new(1), key("Users.create"));

        let keys: Vec<String> = matrix
            .permissions_for(ProfileId::new(1))
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(keys, vec!["Orders.create", "Users.create", "Users.update"]);
    }
}
