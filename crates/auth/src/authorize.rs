//! Authorization decision point.

use txgate_core::{OperationKey, ProfileId};

use crate::guard::PermissionGuard;
use crate::store::PermissionStore;

/// May `profile` invoke `key`?
///
/// Delegates to the guard's membership check. Kept as a distinct, named
/// decision point so cross-cutting policy (object-level deny lists,
/// time-bounded grants) can be added here without touching the guard's
/// storage-consistency logic.
///
/// - No IO
/// - No side effects
pub fn is_authorized<S: PermissionStore>(
    guard: &PermissionGuard<S>,
    profile: ProfileId,
    key: &OperationKey,
) -> bool {
    guard.check(profile, key)
}
