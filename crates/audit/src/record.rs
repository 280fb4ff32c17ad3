//! Audit record schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use txgate_core::{CallerContext, ProfileId, RequestId, TransactionRoute, TxCode, UserId};

/// What happened to a dispatch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// The transaction code was not mapped.
    Rejected,
    /// The route exists but the caller's profile was denied.
    Denied,
    /// The operation was invoked (whatever its business outcome).
    Invoked,
    /// The route pointed at an unknown operation, or infrastructure failed.
    Failed,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Rejected => "rejected",
            AuditAction::Denied => "denied",
            AuditAction::Invoked => "invoked",
            AuditAction::Failed => "failed",
        }
    }
}

/// One dispatch attempt, as recorded for the trail.
///
/// Append-only and write-once; the engine never updates or deletes records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub request_id: RequestId,
    pub user_id: Option<UserId>,
    pub profile_id: Option<ProfileId>,
    pub object_name: Option<String>,
    pub method_name: Option<String>,
    pub tx: TxCode,
    pub action: AuditAction,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    /// Build a record for a dispatch that resolved to a route.
    pub fn for_route(
        ctx: &CallerContext,
        route: &TransactionRoute,
        action: AuditAction,
        details: impl Into<String>,
    ) -> Self {
        Self {
            request_id: ctx.request_id,
            user_id: ctx.user_id,
            profile_id: ctx.profile_id,
            object_name: Some(route.object_name().to_string()),
            method_name: Some(route.method_name().to_string()),
            tx: route.tx,
            action,
            details: details.into(),
            timestamp: Utc::now(),
        }
    }

    /// Build a record for a dispatch rejected before resolution produced a
    /// route (unmapped transaction code).
    pub fn for_unmapped(ctx: &CallerContext, tx: TxCode, details: impl Into<String>) -> Self {
        Self {
            request_id: ctx.request_id,
            user_id: ctx.user_id,
            profile_id: ctx.profile_id,
            object_name: None,
            method_name: None,
            tx,
            action: AuditAction::Rejected,
            details: details.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_record_carries_operation_names() {
        let ctx = CallerContext::new(ProfileId::new(1), Some(UserId::new(10)));
        let route = TransactionRoute::new(TxCode::new(1001), "Users", "create").unwrap();

        let record = AuditRecord::for_route(&ctx, &route, AuditAction::Invoked, "ok");
        assert_eq!(record.object_name.as_deref(), Some("Users"));
        assert_eq!(record.method_name.as_deref(), Some("create"));
        assert_eq!(record.tx, TxCode::new(1001));
        assert_eq!(record.action, AuditAction::Invoked);
    }

    #[test]
    fn unmapped_record_has_no_operation_names() {
        let ctx = CallerContext::anonymous();
        let record = AuditRecord::for_unmapped(&ctx, TxCode::new(9999), "no route");

        assert!(record.object_name.is_none());
        assert!(record.method_name.is_none());
        assert_eq!(record.action, AuditAction::Rejected);
    }

    #[test]
    fn action_serializes_snake_case() {
        let json = serde_json::to_string(&AuditAction::Denied).unwrap();
        assert_eq!(json, "\"denied\"");
    }
}
