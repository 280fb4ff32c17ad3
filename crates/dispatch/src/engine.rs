//! Dispatch orchestration pipeline.
//!
//! One incoming transaction request moves through
//! `Received → Resolved → Authorized → Invoked → Audited` and terminates in
//! a structured response:
//!
//! ```text
//! (tx, params, caller)
//!   ↓
//! 1. Resolve tx against the route table (miss → rejected, audited)
//!   ↓
//! 2. Authorize the caller's profile for the route (deny → audited)
//!   ↓
//! 3. Invoke the operation through the registry
//!   ↓
//! 4. Audit the terminal outcome (always, best-effort)
//!   ↓
//! 5. Respond with { result_code, message, data? }
//! ```
//!
//! The audit step runs for every terminal outcome; a failed audit write is
//! logged and never alters the response already determined by the prior
//! steps. `NotMapped` and `Forbidden` are expected outcomes, never retried.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use txgate_audit::{AuditAction, AuditRecord, AuditSink};
use txgate_auth::{GuardError, PermissionGuard, PermissionStore, is_authorized};
use txgate_core::{CallerContext, StoreError, TxCode};
use txgate_registry::OperationRegistry;
use txgate_routing::{RouteStore, TransactionResolver};

use crate::invoker::OperationInvoker;
use crate::response::DispatchResponse;

/// The engine composed from its collaborators.
///
/// Construct with [`new`](Self::new), then call [`load`](Self::load) once
/// before accepting traffic; a load failure is a startup abort condition.
/// `dispatch` is safe to call concurrently from many tasks.
pub struct DispatchEngine {
    route_store: Arc<dyn RouteStore>,
    resolver: TransactionResolver,
    guard: PermissionGuard<Arc<dyn PermissionStore>>,
    invoker: OperationInvoker,
    audit: Arc<dyn AuditSink>,
}

impl DispatchEngine {
    pub fn new(
        route_store: Arc<dyn RouteStore>,
        permission_store: Arc<dyn PermissionStore>,
        registry: Arc<dyn OperationRegistry>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            route_store,
            resolver: TransactionResolver::new(),
            guard: PermissionGuard::new(permission_store),
            invoker: OperationInvoker::new(registry),
            audit,
        }
    }

    /// Load the route table and permission matrix in full.
    ///
    /// The engine must not accept traffic until this returns `Ok`.
    pub async fn load(&self) -> Result<(), StoreError> {
        let routes = self.resolver.load(&self.route_store).await?;
        let grants = self.guard.load().await.map_err(|e| match e {
            GuardError::Store(e) => e,
            GuardError::IntegrityFault(msg) => StoreError::Integrity(msg),
        })?;

        info!(route_count = routes, grant_count = grants, "dispatch engine loaded");
        Ok(())
    }

    /// The guard, for grant/revoke administration. All permission matrix
    /// mutations go through here; nothing else writes it.
    pub fn guard(&self) -> &PermissionGuard<Arc<dyn PermissionStore>> {
        &self.guard
    }

    pub fn resolver(&self) -> &TransactionResolver {
        &self.resolver
    }

    /// Dispatch one transaction request.
    #[instrument(
        skip(self, params, ctx),
        fields(tx = %tx, request_id = %ctx.request_id)
    )]
    pub async fn dispatch(
        &self,
        tx: TxCode,
        params: Value,
        ctx: &CallerContext,
    ) -> DispatchResponse {
        // 1) Resolve. A miss rejects before authorization or invocation.
        let Some(route) = self.resolver.resolve(tx) else {
            debug!("transaction code not mapped");
            self.audit(AuditRecord::for_unmapped(ctx, tx, "no route for transaction code"))
                .await;
            return DispatchResponse::not_mapped();
        };

        // 2) Authorize. Absent caller identity resolves to the public
        //    profile; deny-by-default either way.
        let profile = ctx.effective_profile();
        if !is_authorized(&self.guard, profile, &route.operation) {
            warn!(%profile, operation = %route.operation, "dispatch denied");
            self.audit(AuditRecord::for_route(
                ctx,
                &route,
                AuditAction::Denied,
                format!("profile {profile} holds no grant for {}", route.operation),
            ))
            .await;
            return DispatchResponse::forbidden();
        }

        // 3) Invoke. The handler's own failure envelope passes through; a
        //    registry miss is an internal inconsistency, logged louder than
        //    a denial.
        let outcome = self.invoker.invoke(&route.operation, params, ctx).await;

        // 4) Audit the terminal outcome, then respond.
        match outcome {
            Err(err) => {
                error!(operation = %route.operation, %err, "route references unknown operation");
                self.audit(AuditRecord::for_route(
                    ctx,
                    &route,
                    AuditAction::Failed,
                    err.to_string(),
                ))
                .await;
                DispatchResponse::unknown_operation()
            }
            Ok(Err(failure)) if failure.is_internal() => {
                error!(operation = %route.operation, %failure, "operation reported internal failure");
                self.audit(AuditRecord::for_route(
                    ctx,
                    &route,
                    AuditAction::Failed,
                    failure.to_string(),
                ))
                .await;
                DispatchResponse::system_error()
            }
            Ok(Err(failure)) => {
                self.audit(AuditRecord::for_route(
                    ctx,
                    &route,
                    AuditAction::Invoked,
                    format!("operation failure: {failure}"),
                ))
                .await;
                DispatchResponse::operation_failed(&failure)
            }
            Ok(Ok(data)) => {
                self.audit(AuditRecord::for_route(
                    ctx,
                    &route,
                    AuditAction::Invoked,
                    "completed",
                ))
                .await;
                DispatchResponse::ok(data)
            }
        }
    }

    /// Best-effort audit write. Failure is logged, never escalated.
    async fn audit(&self, record: AuditRecord) {
        if let Err(err) = self.audit.log(record).await {
            warn!(%err, "audit write failed");
        }
    }
}
