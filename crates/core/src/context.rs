//! Caller context for a dispatch.

use crate::id::{ProfileId, RequestId, UserId};

/// Resolved caller identity for one dispatch.
///
/// Identity resolution (sessions, tokens) happens upstream; the engine only
/// consumes the result. An absent profile id is a valid, defined case and
/// resolves to [`ProfileId::PUBLIC`] at the authorization step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    pub request_id: RequestId,
    pub profile_id: Option<ProfileId>,
    pub user_id: Option<UserId>,
}

impl CallerContext {
    pub fn new(profile_id: ProfileId, user_id: Option<UserId>) -> Self {
        Self {
            request_id: RequestId::new(),
            profile_id: Some(profile_id),
            user_id,
        }
    }

    /// Context for a caller with no resolvable identity.
    pub fn anonymous() -> Self {
        Self {
            request_id: RequestId::new(),
            profile_id: None,
            user_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }

    /// The profile the authorization check runs against.
    pub fn effective_profile(&self) -> ProfileId {
        self.profile_id.unwrap_or(ProfileId::PUBLIC)
    }
}
