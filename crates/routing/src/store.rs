//! Route persistence port.

use std::sync::Arc;

use async_trait::async_trait;

use txgate_core::{StoreError, TransactionRoute};

/// Read side of the authoritative route storage.
///
/// The engine only ever loads routes in full; provisioning tooling owns the
/// write side. Implementations live in `txgate-infra`.
#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Load every route. A failure here is a startup abort condition, not a
    /// retryable runtime error.
    async fn load_routes(&self) -> Result<Vec<TransactionRoute>, StoreError>;
}

#[async_trait]
impl<S> RouteStore for Arc<S>
where
    S: RouteStore + ?Sized,
{
    async fn load_routes(&self) -> Result<Vec<TransactionRoute>, StoreError> {
        (**self).load_routes().await
    }
}
